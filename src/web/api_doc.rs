use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::settings::{SettingsUpdate, ThresholdInput};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::contacts::list,
        super::api::contacts::table,
        super::api::contacts::map,
        super::api::feed::status,
        super::api::settings::get_settings,
        super::api::settings::put_settings,
    ),
    components(
        schemas(
            ErrorResponse,
            SettingsUpdate,
            ThresholdInput,
            crate::view::ContactTable,
            crate::view::TableRow,
            crate::view::MapScene,
            crate::view::OrientedMarker,
            crate::view::IconDescriptor,
            crate::view::Glyph,
            crate::view::Rotation,
            crate::view::Popup,
            crate::contact::Contact,
            crate::contact::Position,
            crate::geo::GeoPoint,
            crate::feed::FeedStatus,
            crate::feed::ConnectionState,
            crate::session::SessionConfig,
        )
    ),
    info(
        title = "ADS-B Monitor API",
        description = "Live aircraft contacts from an ADS-B telemetry feed",
        version = "0.1.0"
    ),
    tags(
        (name = "contacts", description = "Table and map views of fresh contacts"),
        (name = "feed", description = "Feed connectivity"),
        (name = "settings", description = "Session settings")
    )
)]
pub struct ApiDoc;

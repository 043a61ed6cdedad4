use axum::{routing::get, routing::post, Router};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::contact::ContactStore;
use crate::feed::{FeedConnector, FeedError};
use crate::geo::resolve_initial_center;

use super::api::contacts as contact_handlers;
use super::api::feed as feed_handlers;
use super::api::settings as settings_handlers;
use super::api_doc::ApiDoc;
use super::config::{Config, ConfigError};
use super::state::AppState;
use super::ui::handlers as ui_handlers;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_dir = state.config.web.static_dir.clone();

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        .route("/table", get(ui_handlers::table))
        .route("/settings", post(ui_handlers::update_settings))
        // Views as JSON
        .route("/api/contacts", get(contact_handlers::list))
        .route("/api/contacts/table", get(contact_handlers::table))
        .route("/api/contacts/map", get(contact_handlers::map))
        .route("/api/feed/status", get(feed_handlers::status))
        .route(
            "/api/settings",
            get(settings_handlers::get_settings).put(settings_handlers::put_settings),
        )
        // Static files
        .nest_service("/static", ServeDir::new(static_dir))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();
    let session = config.session_config()?;
    let location = config.location.source();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    let store = ContactStore::new();
    let mut feed = FeedConnector::new(config.feed.clone(), store.clone());
    feed.activate()?;

    let state = AppState::new(config, store, session, feed.status());

    // the map stays hidden until this lands
    let session = state.session.clone();
    tokio::spawn(async move {
        let center = resolve_initial_center(&location).await;
        session.write().await.init_center(center);
    });

    log::info!("Starting server on {}", bind_addr);

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    feed.deactivate().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutting down"),
        Err(e) => {
            log::error!("Cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

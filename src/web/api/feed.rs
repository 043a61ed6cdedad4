use axum::{extract::State, Json};

use crate::feed::FeedStatus;
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/feed/status",
    responses(
        (status = 200, description = "Feed connection state and counters", body = FeedStatus)
    ),
    tag = "feed"
)]
pub async fn status(State(state): State<AppState>) -> Json<FeedStatus> {
    Json(state.feed_status())
}

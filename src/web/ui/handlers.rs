use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::view::table;
use crate::web::state::AppState;

use super::templates::{DashboardTemplate, TableTemplate};

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub staleness_threshold_s: String,
}

async fn dashboard_page(state: &AppState) -> DashboardTemplate {
    let (snapshot, session) = state.view_inputs().await;
    let map = &state.config.map;
    DashboardTemplate {
        table: table::derive(snapshot.as_deref(), session.staleness_threshold_s),
        status: state.feed_status(),
        threshold: session.staleness_threshold_s,
        center: session.initial_center,
        tile_url: map.tile_url.clone(),
        attribution: map.attribution.clone(),
        error: None,
    }
}

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    dashboard_page(&state).await
}

pub async fn table(State(state): State<AppState>) -> impl IntoResponse {
    let (snapshot, session) = state.view_inputs().await;
    TableTemplate {
        table: table::derive(snapshot.as_deref(), session.staleness_threshold_s),
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let result = state
        .session
        .write()
        .await
        .set_threshold_from_input(&form.staleness_threshold_s);

    match result {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            log::debug!("rejected threshold {:?}: {}", form.staleness_threshold_s, e);
            let mut page = dashboard_page(&state).await;
            page.error = Some(e.to_string());
            (StatusCode::BAD_REQUEST, page).into_response()
        }
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use http::header;

use crate::{AppState, error::ApiError, page::Page};

#[utoipa::path(get, path = "/", tag = "event-overview")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Event Overview API",
        "endpoints": {
            "/page": "Current content of every event overview region",
            "/page/{region}": "HTML fragment of the route, aid-stations or schedule region",
            "/schedule.ics": "Download the event schedule as iCal file"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "event-overview")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "event-overview")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/page",
    responses(
        (status = 200, description = "Current page regions; absent regions are null", body = Page)
    ),
    tag = "event-overview"
)]
pub async fn get_page(State(state): State<AppState>) -> Json<Page> {
    Json(state.page.read().await.clone())
}

#[utoipa::path(
    get,
    path = "/page/{region}",
    params(
        ("region" = String, Path, description = "One of route, aid-stations, schedule")
    ),
    responses(
        (status = 200, description = "HTML fragment", content_type = "text/html"),
        (status = 404, description = "Unknown region or container not on the page")
    ),
    tag = "event-overview"
)]
pub async fn get_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Html<String>, ApiError> {
    let page = state.page.read().await;
    let content = match region.as_str() {
        "route" => &page.route_html,
        "aid-stations" => &page.aid_html,
        "schedule" => &page.schedule_html,
        _ => return Err(ApiError::NotFound(format!("Unknown region {region:?}"))),
    };
    content
        .clone()
        .map(Html)
        .ok_or_else(|| ApiError::NotFound(format!("Region {region:?} is not on the page")))
}

#[utoipa::path(
    get,
    path = "/schedule.ics",
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 404, description = "No schedule loaded")
    ),
    tag = "event-overview"
)]
pub async fn get_schedule_ical(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = {
        let page = state.page.read().await;
        state.exporter.generate(page.schedule())
    };
    if body.is_empty() {
        return Err(ApiError::NotFound("No schedule loaded".into()));
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=event_schedule.ics",
            ),
        ],
        body,
    ))
}

pub mod client;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod openapi;
pub mod page;
pub mod render;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use handlers::{get_page, get_region, get_schedule_ical, healthz_live, healthz_ready, root};
use tokio::sync::RwLock;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::client::EventClient;
use crate::controller::{PageController, SharedPage};
use crate::ical::ScheduleExporter;
use crate::openapi::ApiDoc;
use crate::page::Page;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub page: SharedPage,
    pub exporter: Arc<ScheduleExporter>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let html = tokio::fs::read_to_string(&settings.page_path).await?;
    let Some((endpoints, page)) = Page::locate(&html, &settings.site_base_url) else {
        warn!(path = %settings.page_path, "page has no event overview, nothing to render");
        return Ok(());
    };
    info!(
        detail = ?endpoints.detail.as_ref().map(|u| u.as_str()),
        availability = ?endpoints.availability.as_ref().map(|u| u.as_str()),
        "located event overview"
    );

    let timezone = settings.timezone()?;
    let page: SharedPage = Arc::new(RwLock::new(page));
    let controller = PageController::new(
        EventClient::new(settings.request_timeout())?,
        endpoints,
        Arc::clone(&page),
    )
    .with_poll_interval(settings.poll_interval())
    .with_timezone(timezone);
    let mut poll_handle = controller.start();

    let state = AppState {
        settings: settings.clone(),
        page,
        exporter: Arc::new(ScheduleExporter::default().with_timezone(timezone)),
    };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("Starting Event Overview API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    poll_handle.stop().await;
    info!("event overview controller stopped");
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/page", get(get_page))
        .route("/page/{region}", get(get_region))
        .route("/schedule.ics", get(get_schedule_ical))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}

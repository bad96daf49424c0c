use utoipa::OpenApi;

use crate::page::{Page, Progress};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_page,
        crate::handlers::get_region,
        crate::handlers::get_schedule_ical
    ),
    components(schemas(Page, Progress)),
    tags(
        (name = "event-overview", description = "Live event overview regions")
    ),
)]
pub struct ApiDoc;

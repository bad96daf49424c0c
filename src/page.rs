//! Anchors of an event overview page and the live content of its regions.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::warn;
use url::Url;
use utoipa::ToSchema;

use crate::models::{Availability, EventDetail, ScheduleItem};
use crate::render::{
    AVAILABILITY_UNAVAILABLE, DETAIL_UNAVAILABLE, capacity_ratio_text, registration_label,
    remaining_text, render_aid_stations, render_schedule, render_segments,
};

/// Endpoint URLs read from the overview root. `None` disables that fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoints {
    pub detail: Option<Url>,
    pub availability: Option<Url>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Progress {
    /// `aria-valuenow` of the progress bar.
    pub value_now: Option<String>,
    /// CSS width of the progress fill.
    pub fill_width: Option<String>,
}

/// Current content of every region. `None` means the element is not on the
/// page, so writes to it are skipped.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Page {
    pub route_html: Option<String>,
    pub aid_html: Option<String>,
    pub schedule_html: Option<String>,
    pub capacity_remaining: Option<String>,
    pub capacity_ratio: Option<String>,
    pub availability_label: Option<String>,
    pub progress: Option<Progress>,
    pub detail_loaded_at: Option<DateTime<Utc>>,
    pub availability_refreshed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    schedule: Vec<ScheduleItem>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector parses")
}

fn first<'a>(root: &ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    root.select(&selector(css)).next()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn style_width(style: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        (property.trim() == "width").then(|| value.trim().to_string())
    })
}

fn resolve_endpoint(base_url: &Url, attr: &str, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base_url
        .join(href)
        .map_err(|err| warn!(attr, href, error = %err, "ignoring unresolvable endpoint"))
        .ok()
}

fn set(region: &mut Option<String>, value: impl Into<String>) {
    if let Some(content) = region.as_mut() {
        *content = value.into();
    }
}

impl Page {
    /// Finds the `.event-overview` root in `html` and the regions inside it.
    /// Returns `None` when the page has no event overview.
    pub fn locate(html: &str, base_url: &Url) -> Option<(Endpoints, Page)> {
        let document = Html::parse_document(html);
        let root = document.select(&selector(".event-overview")).next()?;

        let endpoint = |attr: &str| {
            root.value()
                .attr(attr)
                .and_then(|href| resolve_endpoint(base_url, attr, href))
        };
        let endpoints = Endpoints {
            detail: endpoint("data-detail-endpoint"),
            availability: endpoint("data-availability-endpoint"),
        };

        let progress = match (first(&root, ".progress-bar"), first(&root, ".progress-fill")) {
            (Some(bar), Some(fill)) => Some(Progress {
                value_now: bar.value().attr("aria-valuenow").map(str::to_string),
                fill_width: fill.value().attr("style").and_then(style_width),
            }),
            _ => None,
        };

        let page = Page {
            route_html: first(&root, "[data-route-container]").map(|e| e.inner_html()),
            aid_html: first(&root, "[data-aid-container]").map(|e| e.inner_html()),
            schedule_html: first(&root, "[data-schedule-container]").map(|e| e.inner_html()),
            capacity_remaining: first(&root, "[data-capacity-remaining]").map(text_of),
            capacity_ratio: first(&root, "[data-capacity-ratio]").map(text_of),
            availability_label: first(&root, "[data-availability-label]").map(text_of),
            progress,
            ..Page::default()
        };
        Some((endpoints, page))
    }

    pub fn apply_detail(&mut self, detail: EventDetail, tz: Tz) {
        set(&mut self.route_html, render_segments(&detail.route_segments));
        set(&mut self.aid_html, render_aid_stations(&detail.aid_stations));
        set(&mut self.schedule_html, render_schedule(&detail.schedules, tz));
        self.schedule = detail.schedules;
        self.detail_loaded_at = Some(Utc::now());
    }

    /// Only the route container reports a failed detail fetch.
    pub fn apply_detail_failure(&mut self) {
        set(&mut self.route_html, DETAIL_UNAVAILABLE);
    }

    pub fn apply_availability(&mut self, availability: &Availability) {
        set(&mut self.capacity_remaining, remaining_text(availability));
        set(&mut self.capacity_ratio, capacity_ratio_text(availability));
        if let Some(progress) = self.progress.as_mut() {
            progress.value_now = Some(availability.capacity_ratio.to_string());
            progress.fill_width = Some(format!("{}%", availability.capacity_ratio));
        }
        set(&mut self.availability_label, registration_label(availability));
        self.availability_refreshed_at = Some(Utc::now());
    }

    pub fn apply_availability_failure(&mut self) {
        set(&mut self.availability_label, AVAILABILITY_UNAVAILABLE);
    }

    /// Schedule items from the last successful detail fetch.
    pub fn schedule(&self) -> &[ScheduleItem] {
        &self.schedule
    }
}

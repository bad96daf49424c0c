//! Markup and text rendered into the event overview regions.
//!
//! Every interpolated string from an endpoint payload is HTML-escaped before
//! it is inserted into markup.

use chrono_tz::Tz;

use crate::models::{Availability, EventTime, ScheduleItem, Segment, Station};

pub const NO_SEGMENTS: &str = "<p>No route segments recorded yet.</p>";
pub const NO_AID_STATIONS: &str = "<p>No aid stations posted yet.</p>";
pub const NO_SCHEDULE: &str = "<li>No schedule details available yet.</li>";
pub const DETAIL_UNAVAILABLE: &str =
    "<p>Unable to load detailed route information at the moment.</p>";

pub const UNLIMITED_SLOTS: &str = "Unlimited slots";
pub const REGISTRATION_OPEN: &str = "Registration is open. Secure your bib today!";
pub const REGISTRATION_CLOSED: &str = "Registration is currently closed.";
pub const AVAILABILITY_UNAVAILABLE: &str = "Unable to refresh registration status at the moment.";

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn render_segments(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return NO_SEGMENTS.to_string();
    }
    segments
        .iter()
        .map(|segment| {
            format!(
                r#"<article><div class="segment-order">{}</div><div><h3>{}</h3><p class="distance">{} KM &middot; {} m elevation</p><p>{}</p></div></article>"#,
                segment.order,
                html_escape(&segment.title),
                segment.distance_km,
                segment.elevation_gain,
                html_escape(&segment.description),
            )
        })
        .collect()
}

pub fn render_aid_stations(stations: &[Station]) -> String {
    if stations.is_empty() {
        return NO_AID_STATIONS.to_string();
    }
    stations
        .iter()
        .map(|station| {
            let badge = if station.is_medical {
                r#"<span class="badge accent">Medical</span>"#
            } else {
                ""
            };
            format!(
                r#"<article class="station"><h3>{}</h3><p class="marker">{} KM</p><p>{}</p>{badge}</article>"#,
                html_escape(&station.name),
                station.kilometer_marker,
                html_escape(&station.supplies),
            )
        })
        .collect()
}

/// Start times read like "Nov 23, 05:00 AM", end times like "09:30 AM".
pub fn render_schedule(items: &[ScheduleItem], tz: Tz) -> String {
    if items.is_empty() {
        return NO_SCHEDULE.to_string();
    }
    items
        .iter()
        .map(|item| {
            let time_range = item
                .end_time
                .map(|end| {
                    format!(
                        r#"<p class="time-range">{}</p>"#,
                        format_time(end, tz, "%I:%M %p")
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<li><div class="time">{}</div><div><h3>{}</h3>{time_range}<p>{}</p></div></li>"#,
                format_time(item.start_time, tz, "%b %-d, %I:%M %p"),
                html_escape(&item.title),
                html_escape(item.description.as_deref().unwrap_or("")),
            )
        })
        .collect()
}

fn format_time(time: EventTime, tz: Tz, pattern: &str) -> String {
    time.in_zone(tz).format(pattern).to_string()
}

pub fn remaining_text(availability: &Availability) -> String {
    match availability.remaining {
        Some(remaining) => format!("{remaining} slots remaining"),
        None => UNLIMITED_SLOTS.to_string(),
    }
}

pub fn capacity_ratio_text(availability: &Availability) -> String {
    format!("{}% capacity", availability.capacity_ratio)
}

pub fn registration_label(availability: &Availability) -> &'static str {
    if availability.is_registration_open {
        REGISTRATION_OPEN
    } else {
        REGISTRATION_CLOSED
    }
}

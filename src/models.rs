use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Payload of the detail endpoint. Keys other than the three lists are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventDetail {
    #[serde(default)]
    pub route_segments: Vec<Segment>,
    #[serde(default)]
    pub aid_stations: Vec<Station>,
    #[serde(default)]
    pub schedules: Vec<ScheduleItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub order: i64,
    pub title: String,
    pub distance_km: f64,
    pub elevation_gain: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub name: String,
    pub kilometer_marker: f64,
    pub supplies: String,
    pub is_medical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleItem {
    pub start_time: EventTime,
    #[serde(default)]
    pub end_time: Option<EventTime>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An ISO-8601 timestamp from the detail payload. Values without an offset
/// are wall-clock times in the display time zone; a bare date means midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventTime {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
    Date(NaiveDate),
}

impl EventTime {
    pub fn in_zone(&self, tz: Tz) -> DateTime<Tz> {
        match self {
            EventTime::Zoned(time) => time.with_timezone(&tz),
            EventTime::Local(naive) => local_in_zone(*naive, tz),
            EventTime::Date(date) => local_in_zone(date.and_time(NaiveTime::MIN), tz),
        }
    }
}

// Wall-clock times skipped by a DST jump are read as UTC.
fn local_in_zone(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

impl From<DateTime<FixedOffset>> for EventTime {
    fn from(time: DateTime<FixedOffset>) -> Self {
        EventTime::Zoned(time)
    }
}

/// Payload of the availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    /// `None` means the event has no participant limit. The key itself is required.
    #[serde(deserialize_with = "Option::deserialize")]
    pub remaining: Option<u32>,
    pub capacity_ratio: f64,
    pub is_registration_open: bool,
}

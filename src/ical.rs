use chrono::{Duration, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::ScheduleItem;

#[derive(Clone)]
pub struct ScheduleExporter {
    calendar_name: String,
    timezone: Tz,
}

impl ScheduleExporter {
    pub fn new(calendar_name: impl Into<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
            timezone: Tz::UTC,
        }
    }

    /// Zone that offset-less schedule times belong to.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Items without an end time are exported as one-hour events.
    pub fn generate(&self, items: &[ScheduleItem]) -> Vec<u8> {
        if items.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&self.calendar_name);

        for item in items {
            let start = item.start_time.in_zone(self.timezone).with_timezone(&Utc);
            let end = item
                .end_time
                .map(|end| end.in_zone(self.timezone).with_timezone(&Utc))
                .unwrap_or(start + Duration::hours(1));

            let mut event = Event::new();
            event.summary(&item.title);
            event.starts(start);
            event.ends(end);
            if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                event.description(description);
            }
            event.uid(&format!(
                "{}-{}-event-overview",
                start.format("%Y%m%dT%H%M%SZ"),
                item.title.replace(' ', "-")
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

impl Default for ScheduleExporter {
    fn default() -> Self {
        Self::new("Event schedule")
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn item(title: &str, end: Option<&str>) -> ScheduleItem {
        ScheduleItem {
            start_time: DateTime::parse_from_rfc3339("2025-11-23T05:00:00+07:00")
                .unwrap()
                .into(),
            end_time: end.map(|e| DateTime::parse_from_rfc3339(e).unwrap().into()),
            title: title.to_string(),
            description: Some("Cemoro Lawang gate".to_string()),
        }
    }

    #[test]
    fn test_generate_schedule() {
        let exporter = ScheduleExporter::default();
        let bytes = exporter.generate(&[
            item("Flag off", Some("2025-11-23T06:00:00+07:00")),
            item("Cut off", None),
        ]);
        let body = String::from_utf8(bytes).unwrap();
        assert_eq!(body.matches("BEGIN:VEVENT").count(), 2);
        assert!(body.contains("SUMMARY:Flag off"));
        assert!(body.contains("20251122T220000Z-Flag-off-event-overview"));
    }

    #[test]
    fn test_generate_wall_clock_items_in_zone() {
        let exporter = ScheduleExporter::default().with_timezone(chrono_tz::Asia::Jakarta);
        let item: ScheduleItem = serde_json::from_str(
            r#"{"title": "Briefing", "start_time": "2025-11-22T19:00:00"}"#,
        )
        .unwrap();
        let body = String::from_utf8(exporter.generate(&[item])).unwrap();
        assert!(body.contains("20251122T120000Z-Briefing-event-overview"));
    }

    #[test]
    fn test_generate_empty() {
        let exporter = ScheduleExporter::default();
        assert!(exporter.generate(&[]).is_empty());
    }
}

use chrono_tz::Tz;

use crate::client::FetchError;
use crate::models::{Availability, EventDetail, EventTime};

pub fn validate_capacity_ratio(value: f64) -> Result<f64, FetchError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(FetchError::Invalid(format!(
            "capacity_ratio must be between 0 and 100, got {value}"
        )))
    }
}

pub fn validate_availability(availability: Availability) -> Result<Availability, FetchError> {
    validate_capacity_ratio(availability.capacity_ratio)?;
    Ok(availability)
}

/// Zoned and wall-clock times are only compared with their own kind.
fn ends_before_start(start: EventTime, end: EventTime) -> bool {
    match (start, end) {
        (EventTime::Zoned(start), EventTime::Zoned(end)) => end < start,
        (EventTime::Zoned(_), _) | (_, EventTime::Zoned(_)) => false,
        (start, end) => end.in_zone(Tz::UTC) < start.in_zone(Tz::UTC),
    }
}

pub fn validate_detail(detail: EventDetail) -> Result<EventDetail, FetchError> {
    if let Some(segment) = detail.route_segments.iter().find(|s| s.distance_km < 0.0) {
        return Err(FetchError::Invalid(format!(
            "segment {} has a negative distance",
            segment.order
        )));
    }
    if let Some(station) = detail
        .aid_stations
        .iter()
        .find(|s| s.kilometer_marker < 0.0)
    {
        return Err(FetchError::Invalid(format!(
            "aid station {:?} has a negative kilometer marker",
            station.name
        )));
    }
    for item in &detail.schedules {
        if let Some(end) = item.end_time
            && ends_before_start(item.start_time, end)
        {
            return Err(FetchError::Invalid(format!(
                "schedule item {:?} ends before it starts",
                item.title
            )));
        }
    }
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScheduleItem, Segment};
    use chrono::DateTime;

    #[test]
    fn test_validate_capacity_ratio() {
        assert!(validate_capacity_ratio(0.0).is_ok());
        assert!(validate_capacity_ratio(73.0).is_ok());
        assert!(validate_capacity_ratio(100.0).is_ok());
        assert!(validate_capacity_ratio(-1.0).is_err());
        assert!(validate_capacity_ratio(100.5).is_err());
    }

    #[test]
    fn test_validate_detail_negative_distance() {
        let detail = EventDetail {
            route_segments: vec![Segment {
                order: 1,
                title: "Start".into(),
                distance_km: -2.0,
                elevation_gain: 0.0,
                description: String::new(),
            }],
            ..EventDetail::default()
        };
        let err = validate_detail(detail).unwrap_err();
        assert!(matches!(err, FetchError::Invalid(_)));
    }

    #[test]
    fn test_validate_detail_schedule_order() {
        let detail = EventDetail {
            schedules: vec![ScheduleItem {
                start_time: DateTime::parse_from_rfc3339("2025-11-23T08:00:00+07:00")
                    .unwrap()
                    .into(),
                end_time: Some(
                    DateTime::parse_from_rfc3339("2025-11-23T07:00:00+07:00")
                        .unwrap()
                        .into(),
                ),
                title: "Race briefing".into(),
                description: None,
            }],
            ..EventDetail::default()
        };
        assert!(validate_detail(detail).is_err());
    }

    #[test]
    fn test_validate_detail_wall_clock_schedule_order() {
        let detail: EventDetail = serde_json::from_str(
            r#"{"schedules": [{"title": "Cut off", "start_time": "2025-11-23T21:00:00", "end_time": "2025-11-23"}]}"#,
        )
        .unwrap();
        assert!(validate_detail(detail).is_err());

        let mixed: EventDetail = serde_json::from_str(
            r#"{"schedules": [{"title": "Cut off", "start_time": "2025-11-23T21:00:00+07:00", "end_time": "2025-11-23T22:00:00"}]}"#,
        )
        .unwrap();
        assert!(validate_detail(mixed).is_ok());
    }
}

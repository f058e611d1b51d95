//! Analytics Aggregator - turns a raw event log into summary metrics.
//!
//! Pure and total over any event list. Filtering by content kind is a
//! query-time concern and happens before events reach this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of event recorded against a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    View,
    Click,
    Scroll,
    Time,
    Read,
}

impl EventType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(EventType::View),
            "click" => Some(EventType::Click),
            "scroll" => Some(EventType::Scroll),
            "time" => Some(EventType::Time),
            "read" => Some(EventType::Read),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Click => "click",
            EventType::Scroll => "scroll",
            EventType::Time => "time",
            EventType::Read => "read",
        }
    }
}

/// Which record family the event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Profile,
    Business,
}

impl ContentKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(ContentKind::Profile),
            "business" => Some(ContentKind::Business),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Profile => "profile",
            ContentKind::Business => "business",
        }
    }
}

/// One append-only analytics event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub profile_id: Uuid,
    pub event_type: EventType,
    #[serde(default)]
    pub event_data: Value,
    pub content_type: ContentKind,
    pub created_at: DateTime<Utc>,
}

/// Summary metrics over an event log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub views: u64,
    pub clicks: u64,
    pub avg_scroll_depth: i64,
    pub avg_time_spent: i64,
    /// Percent of views that read at least half the page.
    pub read_rate: i64,
    /// Percent of views that clicked anything.
    pub click_rate: i64,
}

/// Aggregate a raw event log.
///
/// Averages only count strictly positive samples, so a zero or missing
/// `scrollDepth`/`timeSpent` contributes to neither numerator nor
/// denominator. Rates are 0 when there are no views; this guards the
/// divide-by-zero without an error path.
pub fn aggregate(events: &[AnalyticsEvent]) -> Metrics {
    let views = count(events, EventType::View);
    let clicks = count(events, EventType::Click);

    let avg_scroll_depth = positive_mean(events, EventType::Scroll, "scrollDepth");
    let avg_time_spent = positive_mean(events, EventType::Time, "timeSpent");

    let reads = events
        .iter()
        .filter(|e| e.event_type == EventType::Read)
        .filter(|e| number_field(&e.event_data, "readPercentage").unwrap_or(0.0) >= 50.0)
        .count() as u64;

    Metrics {
        views,
        clicks,
        avg_scroll_depth,
        avg_time_spent,
        read_rate: rate(reads, views),
        click_rate: rate(clicks, views),
    }
}

fn count(events: &[AnalyticsEvent], kind: EventType) -> u64 {
    events.iter().filter(|e| e.event_type == kind).count() as u64
}

fn rate(numerator: u64, views: u64) -> i64 {
    if views == 0 {
        return 0;
    }
    (100.0 * numerator as f64 / views as f64).round() as i64
}

/// Mean of the named numeric payload field over strictly positive
/// samples, rounded to the nearest integer; 0 with no qualifying
/// samples.
fn positive_mean(events: &[AnalyticsEvent], kind: EventType, field: &str) -> i64 {
    let samples: Vec<f64> = events
        .iter()
        .filter(|e| e.event_type == kind)
        .filter_map(|e| number_field(&e.event_data, field))
        .filter(|v| *v > 0.0)
        .collect();
    if samples.is_empty() {
        return 0;
    }
    (samples.iter().sum::<f64>() / samples.len() as f64).round() as i64
}

/// Payloads come from historical client builds; numbers were sometimes
/// stored as strings.
fn number_field(data: &Value, field: &str) -> Option<f64> {
    match data.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: EventType, data: Value) -> AnalyticsEvent {
        AnalyticsEvent {
            profile_id: Uuid::nil(),
            event_type: kind,
            event_data: data,
            content_type: ContentKind::Profile,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_log_yields_all_zero_metrics() {
        assert_eq!(aggregate(&[]), Metrics::default());
    }

    #[test]
    fn test_click_rate_ten_views_three_clicks() {
        let mut events: Vec<_> = (0..10).map(|_| event(EventType::View, json!({}))).collect();
        events.extend((0..3).map(|_| event(EventType::Click, json!({}))));
        let metrics = aggregate(&events);
        assert_eq!(metrics.views, 10);
        assert_eq!(metrics.clicks, 3);
        assert_eq!(metrics.click_rate, 30);
    }

    #[test]
    fn test_read_rate_rounds_to_nearest_percent() {
        let mut events: Vec<_> = (0..3).map(|_| event(EventType::View, json!({}))).collect();
        for pct in [80, 40, 60] {
            events.push(event(EventType::Read, json!({ "readPercentage": pct })));
        }
        // Two of three reads pass the 50% bar: round(100 * 2/3) = 67.
        assert_eq!(aggregate(&events).read_rate, 67);
    }

    #[test]
    fn test_rates_guard_zero_views() {
        let events = vec![
            event(EventType::Click, json!({})),
            event(EventType::Read, json!({ "readPercentage": 90 })),
        ];
        let metrics = aggregate(&events);
        assert_eq!(metrics.click_rate, 0);
        assert_eq!(metrics.read_rate, 0);
    }

    #[test]
    fn test_scroll_mean_excludes_zero_and_missing() {
        let events = vec![
            event(EventType::Scroll, json!({ "scrollDepth": 80 })),
            event(EventType::Scroll, json!({ "scrollDepth": 0 })),
            event(EventType::Scroll, json!({})),
            event(EventType::Scroll, json!({ "scrollDepth": 30 })),
        ];
        // Mean over [80, 30] only.
        assert_eq!(aggregate(&events).avg_scroll_depth, 55);
    }

    #[test]
    fn test_time_mean_rounds() {
        let events = vec![
            event(EventType::Time, json!({ "timeSpent": 10 })),
            event(EventType::Time, json!({ "timeSpent": 11 })),
            event(EventType::Time, json!({ "timeSpent": "12" })),
        ];
        assert_eq!(aggregate(&events).avg_time_spent, 11);
    }

    #[test]
    fn test_event_type_parse_round_trip() {
        for kind in [
            EventType::View,
            EventType::Click,
            EventType::Scroll,
            EventType::Time,
            EventType::Read,
        ] {
            assert_eq!(EventType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventType::parse("hover"), None);
    }
}

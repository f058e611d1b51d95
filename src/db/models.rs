//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::content::analytics::{AnalyticsEvent, ContentKind, EventType};
use crate::content::quiz::{Quiz, QuizLayout, QuizMode};

/// Page record row: a profile or business landing page. `content` is
/// the raw persisted block array; reads migrate it to the current Block
/// Model before it leaves the routes layer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRow {
    pub id: Uuid,
    pub slug: String,
    pub kind: String,
    pub content: Value,
    pub settings: Value,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quiz row. `questions` and `results` are JSONB; conversion to the
/// typed [`Quiz`] is tolerant of historical shapes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub questions: Value,
    pub results: Value,
    pub mode: String,
    pub color: String,
    pub layout: String,
    pub image_url: Option<String>,
    pub views_count: i64,
    pub clicks_count: i64,
    pub likes_count: i64,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizRow {
    /// Build the typed quiz definition the core consumes. Unparseable
    /// question/result arrays degrade to empty lists rather than
    /// failing the whole record.
    pub fn into_quiz(self) -> Quiz {
        Quiz {
            id: Some(self.id),
            slug: self.slug,
            title: self.title,
            description: self.description,
            questions: serde_json::from_value(self.questions).unwrap_or_default(),
            results: serde_json::from_value(self.results).unwrap_or_default(),
            mode: serde_json::from_value(Value::String(self.mode)).unwrap_or(QuizMode::Type),
            color: self.color,
            layout: serde_json::from_value(Value::String(self.layout)).unwrap_or(QuizLayout::Card),
            image_url: self.image_url,
            views_count: self.views_count,
            clicks_count: self.clicks_count,
            likes_count: self.likes_count,
            user_id: self.user_id,
        }
    }
}

/// Append-only analytics event row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEventRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub event_type: String,
    pub event_data: Value,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsEventRow {
    /// Rows with an event or content type outside the known sets are
    /// skipped by the aggregation path.
    pub fn into_event(self) -> Option<AnalyticsEvent> {
        Some(AnalyticsEvent {
            profile_id: self.profile_id,
            event_type: EventType::parse(&self.event_type)?,
            event_data: self.event_data,
            content_type: ContentKind::parse(&self.content_type)?,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_row_tolerates_bad_json_columns() {
        let row = QuizRow {
            id: Uuid::nil(),
            slug: "q".into(),
            title: "Quiz".into(),
            description: String::new(),
            questions: Value::String("not an array".into()),
            results: Value::Null,
            mode: "tarot".into(),
            color: String::new(),
            layout: "spiral".into(),
            image_url: None,
            views_count: 0,
            clicks_count: 0,
            likes_count: 0,
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let quiz = row.into_quiz();
        assert!(quiz.questions.is_empty());
        assert!(quiz.results.is_empty());
        assert_eq!(quiz.mode, QuizMode::Type);
        assert_eq!(quiz.layout, QuizLayout::Card);
    }

    #[test]
    fn test_event_row_with_unknown_type_is_skipped() {
        let row = AnalyticsEventRow {
            id: Uuid::nil(),
            profile_id: Uuid::nil(),
            event_type: "hover".into(),
            event_data: Value::Null,
            content_type: "profile".into(),
            created_at: Utc::now(),
        };
        assert!(row.into_event().is_none());
    }

    #[test]
    fn test_event_row_converts() {
        let row = AnalyticsEventRow {
            id: Uuid::nil(),
            profile_id: Uuid::nil(),
            event_type: "scroll".into(),
            event_data: serde_json::json!({ "scrollDepth": 40 }),
            content_type: "business".into(),
            created_at: Utc::now(),
        };
        let event = row.into_event().unwrap();
        assert_eq!(event.event_type, EventType::Scroll);
        assert_eq!(event.content_type, ContentKind::Business);
    }
}

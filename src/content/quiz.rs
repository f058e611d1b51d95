//! Quiz data shapes shared by the scoring engine and the exporter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Scoring mode. `type` accumulates per-tag scores and the highest tag
/// wins; `test` maps a correctness ratio onto a best-to-worst ranked
/// result list; `fortune` picks a uniformly random result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    #[default]
    Type,
    Test,
    Fortune,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizLayout {
    #[default]
    Card,
    Chat,
}

/// A full quiz definition as persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quiz {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub results: Vec<QuizResult>,
    pub mode: QuizMode,
    pub color: String,
    pub layout: QuizLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub views_count: i64,
    pub clicks_count: i64,
    pub likes_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// Questions always carry at least one option in editor-produced data;
/// the engine still tolerates empty lists rather than panicking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    pub text: String,
    pub options: Vec<QuizOption>,
}

/// One selectable answer. `score` maps result-type tag letters (A..J)
/// to points. Values are kept as raw JSON because historical records
/// hold numbers, numeric strings and occasional junk; coercion happens
/// at scoring time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizOption {
    pub label: String,
    pub score: BTreeMap<String, Value>,
}

/// One diagnostic outcome. `type` is the tag letter matched in `type`
/// mode and ignored by the other modes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizResult {
    #[serde(rename = "type")]
    pub result_type: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_text: Option<String>,
}

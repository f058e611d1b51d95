/**
 * Analytics Routes
 * Append-only event collection and on-demand aggregation
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::content::analytics::{aggregate, ContentKind, EventType};
use crate::db::{self, models::AnalyticsEventRow};
use crate::routes::{ErrorResponse, SuccessResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /api/analytics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectEventRequest {
    /// Must be a canonical UUID string.
    pub profile_id: String,
    pub event_type: String,
    #[serde(default)]
    pub event_data: Value,
    pub content_type: String,
}

/// Query parameters for GET /api/analytics/:profile_id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub content_type: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/analytics - Append one event. Events are never mutated or
/// deleted afterwards.
pub async fn collect_event(Json(payload): Json<CollectEventRequest>) -> impl IntoResponse {
    let profile_id = match Uuid::parse_str(&payload.profile_id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "Invalid profileId",
                    "profileId must be a canonical UUID string",
                )),
            )
                .into_response();
        }
    };

    let event_type = match EventType::parse(&payload.event_type) {
        Some(t) => t,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "Invalid eventType",
                    "eventType must be one of: view, click, scroll, time, read",
                )),
            )
                .into_response();
        }
    };

    let content_type = match ContentKind::parse(&payload.content_type) {
        Some(k) => k,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "Invalid contentType",
                    "contentType must be 'profile' or 'business'",
                )),
            )
                .into_response();
        }
    };

    let pool = match db::get_pool() {
        Some(p) => p,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Database not available")),
            )
                .into_response();
        }
    };

    match sqlx::query(
        r#"
        INSERT INTO analytics_events (profile_id, event_type, event_data, content_type, created_at)
        VALUES ($1, $2, $3, $4, now())
        "#,
    )
    .bind(profile_id)
    .bind(event_type.as_str())
    .bind(&payload.event_data)
    .bind(content_type.as_str())
    .execute(pool.as_ref())
    .await
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(SuccessResponse { success: true }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database error inserting analytics event: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to record event")),
            )
                .into_response()
        }
    }
}

/// GET /api/analytics/:profile_id?contentType=profile|business
///
/// The content-kind filter is applied here at query time; aggregation
/// itself is the pure function in `content/analytics.rs`.
pub async fn summary(
    Path(profile_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let profile_id = match Uuid::parse_str(&profile_id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "Invalid profile id",
                    "Profile id must be a canonical UUID string",
                )),
            )
                .into_response();
        }
    };

    let content_kind = match &query.content_type {
        Some(raw) => match ContentKind::parse(raw) {
            Some(kind) => Some(kind),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::with_message(
                        "Invalid contentType",
                        "contentType must be 'profile' or 'business'",
                    )),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let pool = match db::get_pool() {
        Some(p) => p,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Database not available")),
            )
                .into_response();
        }
    };

    let rows: Result<Vec<AnalyticsEventRow>, sqlx::Error> = match content_kind {
        Some(kind) => {
            sqlx::query_as(
                r#"
                SELECT id, profile_id, event_type, event_data, content_type, created_at
                FROM analytics_events
                WHERE profile_id = $1 AND content_type = $2
                "#,
            )
            .bind(profile_id)
            .bind(kind.as_str())
            .fetch_all(pool.as_ref())
            .await
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT id, profile_id, event_type, event_data, content_type, created_at
                FROM analytics_events
                WHERE profile_id = $1
                "#,
            )
            .bind(profile_id)
            .fetch_all(pool.as_ref())
            .await
        }
    };

    match rows {
        Ok(rows) => {
            let events: Vec<_> = rows
                .into_iter()
                .filter_map(AnalyticsEventRow::into_event)
                .collect();
            (StatusCode::OK, Json(aggregate(&events))).into_response()
        }
        Err(e) => {
            tracing::error!("Database error fetching analytics events: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error")),
            )
                .into_response()
        }
    }
}

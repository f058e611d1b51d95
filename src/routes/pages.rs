/**
 * Page Routes
 * CRUD and static export for profile/business landing pages
 */
use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::content::analytics::ContentKind;
use crate::content::blocks::{Block, PageRecord, PageSettings};
use crate::content::export::generate_profile_html;
use crate::content::migrate::migrate_old_content;
use crate::db::{self, models::PageRow};
use crate::routes::{is_valid_slug, ErrorResponse, SuccessResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Full page response. `content` is always the migrated, current-shape
/// block list regardless of what generation of editor wrote the row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub id: Uuid,
    pub slug: String,
    pub kind: ContentKind,
    pub content: Vec<Block>,
    pub settings: PageSettings,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for PUT /api/pages/:kind/:slug. Saves are full-content
/// replaces; there is no partial patching of the block list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPageRequest {
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub settings: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

fn page_response(row: PageRow) -> PageResponse {
    PageResponse {
        id: row.id,
        slug: row.slug,
        kind: ContentKind::parse(&row.kind).unwrap_or(ContentKind::Profile),
        content: migrate_old_content(&row.content),
        settings: serde_json::from_value(row.settings).unwrap_or_default(),
        user_id: row.user_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn parse_path(
    kind: &str,
    slug: &str,
) -> Result<ContentKind, (StatusCode, Json<ErrorResponse>)> {
    let kind = ContentKind::parse(kind).ok_or((
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_message(
            "Invalid page kind",
            "Kind must be 'profile' or 'business'",
        )),
    ))?;
    if !is_valid_slug(slug) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_message(
                "Invalid slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            )),
        ));
    }
    Ok(kind)
}

const SELECT_PAGE: &str = r#"
    SELECT id, slug, kind, content, settings, user_id, created_at, updated_at
    FROM pages
    WHERE slug = $1 AND kind = $2
"#;

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/pages/:kind/:slug - Fetch a page with migrated content
pub async fn get_page(Path((kind, slug)): Path<(String, String)>) -> impl IntoResponse {
    let kind = match parse_path(&kind, &slug) {
        Ok(k) => k,
        Err(err) => return err.into_response(),
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

    match sqlx::query_as::<_, PageRow>(SELECT_PAGE)
        .bind(&slug)
        .bind(kind.as_str())
        .fetch_optional(pool.as_ref())
        .await
    {
        Ok(Some(row)) => (StatusCode::OK, Json(page_response(row))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database error fetching page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error")),
            )
                .into_response()
        }
    }
}

/// PUT /api/pages/:kind/:slug - Create or replace a page
///
/// One upsert discipline for both record kinds: insert, on slug
/// conflict replace content/settings in place. The block list is
/// normalized through migration before it is stored, so every persisted
/// element carries an id.
pub async fn upsert_page(
    Path((kind, slug)): Path<(String, String)>,
    Json(payload): Json<UpsertPageRequest>,
) -> impl IntoResponse {
    let kind = match parse_path(&kind, &slug) {
        Ok(k) => k,
        Err(err) => return err.into_response(),
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

    let blocks = migrate_old_content(&payload.content);
    let content = serde_json::to_value(&blocks).unwrap_or_else(|_| Value::Array(Vec::new()));
    let settings = payload
        .settings
        .unwrap_or_else(|| serde_json::json!({}));

    match sqlx::query_as::<_, PageRow>(
        r#"
        INSERT INTO pages (slug, kind, content, settings, user_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, now(), now())
        ON CONFLICT (slug) DO UPDATE SET
            kind = EXCLUDED.kind,
            content = EXCLUDED.content,
            settings = EXCLUDED.settings,
            user_id = EXCLUDED.user_id,
            updated_at = now()
        RETURNING id, slug, kind, content, settings, user_id, created_at, updated_at
        "#,
    )
    .bind(&slug)
    .bind(kind.as_str())
    .bind(&content)
    .bind(&settings)
    .bind(payload.user_id)
    .fetch_one(pool.as_ref())
    .await
    {
        Ok(row) => (StatusCode::OK, Json(page_response(row))).into_response(),
        Err(e) => {
            tracing::error!("Database error upserting page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save page")),
            )
                .into_response()
        }
    }
}

/// DELETE /api/pages/:kind/:slug - Delete a page
pub async fn delete_page(Path((kind, slug)): Path<(String, String)>) -> impl IntoResponse {
    let kind = match parse_path(&kind, &slug) {
        Ok(k) => k,
        Err(err) => return err.into_response(),
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

    match sqlx::query("DELETE FROM pages WHERE slug = $1 AND kind = $2")
        .bind(&slug)
        .bind(kind.as_str())
        .execute(pool.as_ref())
        .await
    {
        Ok(result) if result.rows_affected() == 0 => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Not found")),
        )
            .into_response(),
        Ok(_) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!("Database error deleting page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete page")),
            )
                .into_response()
        }
    }
}

/// GET /api/pages/:kind/:slug/export - Standalone HTML document
pub async fn export_page(Path((kind, slug)): Path<(String, String)>) -> Response {
    let kind = match parse_path(&kind, &slug) {
        Ok(k) => k,
        Err(err) => return err.into_response(),
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

    let row = match sqlx::query_as::<_, PageRow>(SELECT_PAGE)
        .bind(&slug)
        .bind(kind.as_str())
        .fetch_optional(pool.as_ref())
        .await
    {
        Ok(Some(row)) => row,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Database error exporting page: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error")),
            )
                .into_response();
        }
    };

    let record = PageRecord {
        slug: row.slug,
        content: migrate_old_content(&row.content),
        settings: serde_json::from_value(row.settings).unwrap_or_default(),
    };
    let html = generate_profile_html(&record);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.html\"", record.slug),
        )
        .body(Body::from(html))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

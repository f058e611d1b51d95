/**
 * Quiz Routes
 * CRUD, counters and static export for quiz funnels
 */
use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::content::export::generate_quiz_html;
use crate::content::quiz::{QuizLayout, QuizMode};
use crate::db::{self, models::QuizRow};
use crate::routes::{is_valid_slug, ErrorResponse, SuccessResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for PUT /api/quizzes/:slug. Saves are full replaces.
/// `mode` and `layout` are validated by their typed enums; `questions`
/// and `results` are stored as given and parsed tolerantly on read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertQuizRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Value,
    #[serde(default)]
    pub results: Value,
    #[serde(default)]
    pub mode: QuizMode,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub layout: QuizLayout,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

fn check_slug(slug: &str) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_message(
                "Invalid slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            )),
        ))
    }
}

/// Wire value of a lowercase-renamed enum, e.g. `QuizMode::Test` -> "test".
fn enum_str<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

const SELECT_QUIZ: &str = r#"
    SELECT id, slug, title, description, questions, results, mode, color, layout,
           image_url, views_count, clicks_count, likes_count, user_id, created_at, updated_at
    FROM quizzes
    WHERE slug = $1
"#;

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/quizzes/:slug - Fetch a quiz definition
pub async fn get_quiz(Path(slug): Path<String>) -> impl IntoResponse {
    if let Err(err) = check_slug(&slug) {
        return err.into_response();
    }

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

    match sqlx::query_as::<_, QuizRow>(SELECT_QUIZ)
        .bind(&slug)
        .fetch_optional(pool.as_ref())
        .await
    {
        Ok(Some(row)) => (StatusCode::OK, Json(row.into_quiz())).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database error fetching quiz: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error")),
            )
                .into_response()
        }
    }
}

/// PUT /api/quizzes/:slug - Create or replace a quiz
pub async fn upsert_quiz(
    Path(slug): Path<String>,
    Json(payload): Json<UpsertQuizRequest>,
) -> impl IntoResponse {
    if let Err(err) = check_slug(&slug) {
        return err.into_response();
    }

    if !payload.questions.is_array() || !payload.results.is_array() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_message(
                "Invalid quiz body",
                "questions and results must be arrays",
            )),
        )
            .into_response();
    }

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

    match sqlx::query_as::<_, QuizRow>(
        r#"
        INSERT INTO quizzes
            (slug, title, description, questions, results, mode, color, layout, image_url, user_id,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now())
        ON CONFLICT (slug) DO UPDATE SET
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            questions = EXCLUDED.questions,
            results = EXCLUDED.results,
            mode = EXCLUDED.mode,
            color = EXCLUDED.color,
            layout = EXCLUDED.layout,
            image_url = EXCLUDED.image_url,
            user_id = EXCLUDED.user_id,
            updated_at = now()
        RETURNING id, slug, title, description, questions, results, mode, color, layout,
                  image_url, views_count, clicks_count, likes_count, user_id, created_at, updated_at
        "#,
    )
    .bind(&slug)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.questions)
    .bind(&payload.results)
    .bind(enum_str(&payload.mode))
    .bind(&payload.color)
    .bind(enum_str(&payload.layout))
    .bind(&payload.image_url)
    .bind(payload.user_id)
    .fetch_one(pool.as_ref())
    .await
    {
        Ok(row) => (StatusCode::OK, Json(row.into_quiz())).into_response(),
        Err(e) => {
            tracing::error!("Database error upserting quiz: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save quiz")),
            )
                .into_response()
        }
    }
}

/// DELETE /api/quizzes/:slug - Delete a quiz
pub async fn delete_quiz(Path(slug): Path<String>) -> impl IntoResponse {
    if let Err(err) = check_slug(&slug) {
        return err.into_response();
    }

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

    match sqlx::query("DELETE FROM quizzes WHERE slug = $1")
        .bind(&slug)
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
            tracing::error!("Database error deleting quiz: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete quiz")),
            )
                .into_response()
        }
    }
}

/// GET /api/quizzes/:slug/export - Standalone interactive HTML document
pub async fn export_quiz(Path(slug): Path<String>) -> Response {
    if let Err(err) = check_slug(&slug) {
        return err.into_response();
    }

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

    let row = match sqlx::query_as::<_, QuizRow>(SELECT_QUIZ)
        .bind(&slug)
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
            tracing::error!("Database error exporting quiz: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error")),
            )
                .into_response();
        }
    };

    let quiz = row.into_quiz();
    let html = generate_quiz_html(&quiz);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.html\"", quiz.slug),
        )
        .body(Body::from(html))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// POST /api/quizzes/:slug/view - Bump the view counter
pub async fn record_view(Path(slug): Path<String>) -> impl IntoResponse {
    bump_counter(slug, "views_count").await
}

/// POST /api/quizzes/:slug/click - Bump the click counter
pub async fn record_click(Path(slug): Path<String>) -> impl IntoResponse {
    bump_counter(slug, "clicks_count").await
}

async fn bump_counter(slug: String, column: &'static str) -> Response {
    if let Err(err) = check_slug(&slug) {
        return err.into_response();
    }

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

    // `column` is one of two compile-time literals, never user input.
    let sql = format!(
        "UPDATE quizzes SET {column} = {column} + 1 WHERE slug = $1",
        column = column
    );
    match sqlx::query(&sql).bind(&slug).execute(pool.as_ref()).await {
        Ok(result) if result.rows_affected() == 0 => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Not found")),
        )
            .into_response(),
        Ok(_) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!("Database error bumping quiz counter: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update counter")),
            )
                .into_response()
        }
    }
}

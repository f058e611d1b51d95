/**
 * Logs Route Handler
 * Endpoint for receiving client logs from the editor frontend
 */
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use tower_http::request_id::RequestId;

use crate::logging::config::{ClientLogBatch, ClientLogEntry, LogLevel, LogResponse};

/// POST /api/logs - Receive a batch of client logs
#[tracing::instrument(skip(logs), fields(batch_size = logs.logs.len()))]
pub async fn receive_client_logs(
    request_id: Option<Extension<RequestId>>,
    Json(logs): Json<ClientLogBatch>,
) -> impl IntoResponse {
    let req_id = request_id
        .as_ref()
        .and_then(|ext| ext.0.header_value().to_str().ok())
        .unwrap_or("unknown");

    tracing::info!(
        request_id = %req_id,
        batch_size = logs.logs.len(),
        "received client logs"
    );

    let mut processed = 0;
    for log in &logs.logs {
        forward_client_log(log, req_id);
        processed += 1;
    }

    let response = LogResponse {
        success: true,
        received: logs.logs.len(),
        processed,
        error: None,
    };

    (StatusCode::ACCEPTED, Json(response))
}

/// Re-emit one client log entry through the server's tracing pipeline.
/// Unknown levels degrade to info rather than dropping the entry.
fn forward_client_log(log: &ClientLogEntry, request_id: &str) {
    let level = LogLevel::parse(&log.level).unwrap_or(LogLevel::Info);

    let span = tracing::info_span!(
        "client_log",
        request_id = %request_id,
        timestamp = %log.timestamp,
        source = "client",
    );
    let _enter = span.enter();

    match level {
        LogLevel::Trace => tracing::trace!(
            message = %log.message,
            context = ?log.context,
            "client log"
        ),
        LogLevel::Debug => tracing::debug!(
            message = %log.message,
            context = ?log.context,
            "client log"
        ),
        LogLevel::Info => tracing::info!(
            message = %log.message,
            context = ?log.context,
            "client log"
        ),
        LogLevel::Warn => tracing::warn!(
            message = %log.message,
            context = ?log.context,
            "client log"
        ),
        LogLevel::Error => tracing::error!(
            message = %log.message,
            context = ?log.context,
            "client log"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_batch_is_accepted() {
        let app = Router::new().route("/api/logs", post(receive_client_logs));
        let body = serde_json::json!({
            "logs": [
                { "timestamp": "2026-01-01T00:00:00Z", "level": "warn", "message": "slow save" },
                { "timestamp": "2026-01-01T00:00:01Z", "level": "banana", "message": "odd level" }
            ]
        });
        let req = Request::post("/api/logs")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }
}

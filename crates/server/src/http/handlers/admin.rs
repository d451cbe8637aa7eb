use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::state::AppState;

fn authorize(headers: &HeaderMap, admin_token: &str) -> Result<(), (StatusCode, String)> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".into(),
        ))?;
    let expected_token = format!("Bearer {}", admin_token);
    if auth_header != expected_token {
        return Err((StatusCode::FORBIDDEN, "Invalid Admin Token".into()));
    }
    Ok(())
}

pub async fn run_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    authorize(&headers, &state.admin_token)?;

    tracing::info!("Sweep requested via admin API");
    let inserted = state.pipeline.sweep().await.map_err(|e| {
        tracing::error!("On-demand sweep failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(json!({ "inserted": inserted })))
}

pub async fn get_watermark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, String)> {
    authorize(&headers, &state.admin_token)?;

    let watermark = state
        .pipeline
        .resolve_watermark(post_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(json!({ "post_id": post_id, "last_mention_id": watermark })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_authorize() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            authorize(&headers, "s3cret").unwrap_err().0,
            StatusCode::UNAUTHORIZED
        );

        headers.insert("Authorization", HeaderValue::from_static("Bearer nope"));
        assert_eq!(
            authorize(&headers, "s3cret").unwrap_err().0,
            StatusCode::FORBIDDEN
        );

        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(authorize(&headers, "s3cret").is_ok());
    }
}

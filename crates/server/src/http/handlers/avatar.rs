use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct AvatarQuery {
    pub default: String,
}

pub async fn get_avatar(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Query(query): Query<AvatarQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let internal = |e: anyhow::Error| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());

    let comment = state
        .pipeline
        .comments()
        .get_comment(comment_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, format!("Comment {} not found", comment_id)))?;

    let avatar = state
        .pipeline
        .filter_avatar(&query.default, &comment)
        .await
        .map_err(internal)?;

    Ok(Json(json!({ "avatar": avatar })))
}

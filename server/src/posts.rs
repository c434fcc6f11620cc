use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub post_id: String,
}

/// POST /api/posts
/// Requires a valid session cookie: the AuthUser extractor rejects with 401
/// before anything touches the database. The author is taken from the
/// verified claims, never from the body.
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let title = req.title.unwrap_or_default().trim().to_string();
    let content = req.content.unwrap_or_default().trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::Validation(
            "title and content are required".to_string(),
        ));
    }

    let db = state.db.clone();
    let author = user.username.clone();
    let post_id = tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| ApiError::Internal(format!("DB lock: {e}")))?;
        Ok::<_, ApiError>(db::posts::insert(&conn, &title, &content, &author)?)
    })
    .await??;

    tracing::info!(author = %user.username, post_id = %post_id, "Post created");

    Ok((StatusCode::CREATED, Json(CreatePostResponse { post_id })))
}

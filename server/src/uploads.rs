use std::path::Path;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub saved: Vec<String>,
}

/// POST /api/uploads
/// Save each file part of a multipart body under the uploads directory.
/// Downloads are served back at GET /uploads/{filename}.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut saved = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {e}")))?
    {
        // Only file parts carry a filename; skip plain form fields.
        let Some(filename) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        if filename.is_empty() {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read file data: {e}")))?;

        let path = state.uploads_dir.join(&filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ApiError::Internal(format!("Write {}: {e}", path.display())))?;

        tracing::info!(file = %filename, bytes = data.len(), "Upload saved");
        saved.push(filename);
    }

    if saved.is_empty() {
        return Err(ApiError::Validation("no file parts in request".to_string()));
    }

    Ok((StatusCode::CREATED, Json(UploadResponse { saved })))
}

/// Strip any path components from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("note.txt"), "note.txt");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/inner.png"), "inner.png");
        assert_eq!(sanitize_filename(""), "");
    }
}

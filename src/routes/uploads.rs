use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tokio::fs;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    upload,
};

#[utoipa::path(
    get,
    path = "/uploads/products/{file}",
    params(("file" = String, Path, description = "Stored image filename")),
    responses(
        (status = 200, description = "Image bytes with the mapped content type"),
        (status = 404, description = "File not found"),
    ),
    tag = "Uploads"
)]
pub async fn product_image(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<Response> {
    // Generated filenames never contain separators; anything else is not ours.
    if file.contains("..") || file.contains('/') || file.contains('\\') {
        return Err(AppError::NotFound("File not found.".into()));
    }

    let path = upload::storage_dir(&state.config.upload_root).join(&file);
    let bytes = fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound("File not found.".into()))?;

    let content_type = upload::content_type_for(&file);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

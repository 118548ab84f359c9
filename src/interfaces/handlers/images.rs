use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{
    constants::PROJECT_IMAGES_URL_PREFIX,
    errors::AppError,
    repositories::store::Store,
    AppState,
};

/// Serves a stored project image. Names that could leave the images
/// directory are treated as missing.
#[instrument(skip_all, fields(file = %file_name))]
pub async fn project_image<S: Store>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    file_name: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let url = format!("{PROJECT_IMAGES_URL_PREFIX}{file_name}");
    let path = state
        .images
        .path_for(&url)
        .ok_or_else(|| AppError::not_found("Image"))?;

    let file = NamedFile::open_async(&path)
        .await
        .map_err(|_| AppError::not_found("Image"))?;
    Ok(file.into_response(&req))
}

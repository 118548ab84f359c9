use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{project::ProjectForm, responses::ActionResponse},
    errors::AppError,
    handlers::records::DeleteParams,
    repositories::store::Store,
    storage::images::ImageUpload,
    use_cases::{extractors::AdminClaims, projects::ProjectHandler},
    utils::valid_uuid::valid_uuid,
    AppState,
};

/// Project create/edit form, `multipart/form-data` with an optional image.
#[derive(Debug, MultipartForm)]
pub struct ProjectUpload {
    #[multipart(limit = "20MB")]
    pub image_file: Option<TempFile>,
    pub title: Text<String>,
    pub description: Text<String>,
    pub technologies: Option<Text<String>>,
    pub github_url: Option<Text<String>>,
    pub live_url: Option<Text<String>>,
    pub is_featured: Option<Text<String>>,
}

impl ProjectUpload {
    /// Splits the request into the validated fields and the file, if any.
    /// The returned upload points into the temp file, so `self` must outlive it.
    pub fn parts(&self) -> (ProjectForm, Option<ImageUpload>) {
        let form = ProjectForm {
            title: self.title.0.clone(),
            description: self.description.0.clone(),
            technologies: self.technologies.as_ref().map(|t| t.0.clone()),
            github_url: self.github_url.as_ref().map(|t| t.0.clone()),
            live_url: self.live_url.as_ref().map(|t| t.0.clone()),
            is_featured: self
                .is_featured
                .as_ref()
                .is_some_and(|t| is_checked(&t.0)),
        };

        let upload = self.image_file.as_ref().map(|file| ImageUpload {
            file_name: file.file_name.clone().unwrap_or_default(),
            content_type: file.content_type.as_ref().map(|m| m.essence_str().to_string()),
            size: file.size as u64,
            source: file.file.path().to_path_buf(),
        });

        (form, upload)
    }
}

fn is_checked(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "on" | "1")
}

#[instrument(skip_all)]
pub async fn list<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let projects = ProjectHandler::new(&mut uow, &state.images).list().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn details<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let project = ProjectHandler::new(&mut uow, &state.images).get(id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip_all)]
pub async fn create<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    MultipartForm(upload): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let (form, image) = upload.parts();
    let mut uow = state.unit_of_work().await?;
    let project = ProjectHandler::new(&mut uow, &state.images)
        .create(form, image.as_ref())
        .await?;

    Ok(HttpResponse::Created().json(ActionResponse::with_data(
        "Project created successfully.",
        project.meta.id,
        project,
    )))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
    MultipartForm(upload): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let (form, image) = upload.parts();
    let mut uow = state.unit_of_work().await?;
    let project = ProjectHandler::new(&mut uow, &state.images)
        .update(id, form, image.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(ActionResponse::with_data(
        "Project updated successfully.",
        id,
        project,
    )))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
    params: web::Query<DeleteParams>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    ProjectHandler::new(&mut uow, &state.images)
        .delete(id, params.hard_delete)
        .await?;

    Ok(HttpResponse::Ok().json(ActionResponse::message("Project deleted successfully.")))
}

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::project::Project,
    errors::AppError,
    repositories::store::Store,
    use_cases::{crud, pages},
    utils::valid_uuid::valid_uuid,
    AppState,
};

/// Featured projects and the About Me section.
#[instrument(skip_all)]
pub async fn home<S: Store>(state: web::Data<AppState<S>>) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let view = pages::home_view(&mut uow).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[instrument(skip_all)]
pub async fn projects<S: Store>(state: web::Data<AppState<S>>) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let projects = crud::list(&mut uow, crud::newest_first::<Project>).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn project_details<S: Store>(
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let project = crud::get::<Project, _>(&mut uow, id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip_all)]
pub async fn resume<S: Store>(state: web::Data<AppState<S>>) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let view = pages::resume_view(&mut uow).await?;
    Ok(HttpResponse::Ok().json(view))
}

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        about_me::{AboutMe, AboutMeForm, AboutMeResponse},
        responses::ActionResponse,
    },
    errors::AppError,
    handlers::records::DeleteParams,
    repositories::store::Store,
    use_cases::{about, crud, extractors::AdminClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

/// The current record, or `null` when none was created yet.
#[instrument(skip_all)]
pub async fn current<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let about_me = about::current_about_me(&mut uow).await?.map(AboutMeResponse::from);
    Ok(HttpResponse::Ok().json(about_me))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn details<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let about_me = crud::get::<AboutMe, _>(&mut uow, id).await?;
    Ok(HttpResponse::Ok().json(AboutMeResponse::from(about_me)))
}

#[instrument(skip_all)]
pub async fn create<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    form: web::Json<AboutMeForm>,
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let created = about::create_about_me(&mut uow, form.into_inner()).await?;
    Ok(HttpResponse::Created().json(ActionResponse::with_data(
        "About Me created successfully.",
        created.meta.id,
        AboutMeResponse::from(created),
    )))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
    form: web::Json<AboutMeForm>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let updated = about::update_about_me(&mut uow, id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::with_data(
        "About Me updated successfully.",
        id,
        AboutMeResponse::from(updated),
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
    crud::delete::<AboutMe, _>(&mut uow, id, params.hard_delete).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::message("About Me deleted successfully.")))
}

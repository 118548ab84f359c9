//! Admin CRUD shared by record types without extra workflow
//! (resume items and skills).

use actix_web::{web, HttpResponse};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::instrument;

use crate::{
    entities::{base::Entity, responses::ActionResponse},
    errors::AppError,
    repositories::store::Store,
    use_cases::{
        crud::{self, AdminListing},
        extractors::AdminClaims,
    },
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[derive(Debug, Deserialize, Default)]
pub struct DeleteParams {
    #[serde(default)]
    pub hard_delete: bool,
}

#[instrument(skip_all, fields(entity = T::LABEL))]
pub async fn list<T: AdminListing, S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let records = crud::list(&mut uow, T::admin_order).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[instrument(skip_all, fields(entity = T::LABEL, id = %id))]
pub async fn details<T: AdminListing, S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let record = crud::get::<T, _>(&mut uow, id).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[instrument(skip_all, fields(entity = T::LABEL))]
pub async fn create<T, S>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    form: web::Json<T::Form>,
) -> Result<HttpResponse, AppError>
where
    T: AdminListing,
    T::Form: DeserializeOwned + 'static,
    S: Store,
{
    let mut uow = state.unit_of_work().await?;
    let created = crud::create::<T, _>(&mut uow, form.into_inner()).await?;
    Ok(HttpResponse::Created().json(ActionResponse::with_data(
        format!("{} created successfully.", T::LABEL),
        created.id(),
        created,
    )))
}

#[instrument(skip_all, fields(entity = T::LABEL, id = %id))]
pub async fn update<T, S>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
    form: web::Json<T::Form>,
) -> Result<HttpResponse, AppError>
where
    T: AdminListing,
    T::Form: DeserializeOwned + 'static,
    S: Store,
{
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let updated = crud::update::<T, _>(&mut uow, id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::with_data(
        format!("{} updated successfully.", T::LABEL),
        id,
        updated,
    )))
}

#[instrument(skip_all, fields(entity = T::LABEL, id = %id))]
pub async fn delete<T: AdminListing, S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
    params: web::Query<DeleteParams>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    crud::delete::<T, _>(&mut uow, id, params.hard_delete).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::message(format!(
        "{} deleted successfully.",
        T::LABEL
    ))))
}

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        contact_message::{ContactMessage, ContactMessageForm},
        responses::ActionResponse,
    },
    errors::AppError,
    handlers::records::DeleteParams,
    repositories::store::Store,
    use_cases::{contact, crud, extractors::AdminClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

/// Public contact form.
#[instrument(skip_all)]
pub async fn submit<S: Store>(
    state: web::Data<AppState<S>>,
    form: web::Json<ContactMessageForm>,
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let message = contact::submit_message(&mut uow, form.into_inner()).await?;
    tracing::info!(id = %message.meta.id, "Contact message received");

    Ok(HttpResponse::Created().json(ActionResponse::<()>::message(
        "Thank you for your message! I'll get back to you soon.",
    )))
}

#[instrument(skip_all)]
pub async fn list<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let messages = contact::list_messages(&mut uow).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// Opening a message marks it read.
#[instrument(skip_all, fields(id = %id))]
pub async fn details<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let message = contact::mark_message_read(&mut uow, id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn mark_read<S: Store>(
    _admin: AdminClaims,
    state: web::Data<AppState<S>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(&id)?;
    let mut uow = state.unit_of_work().await?;
    let message = contact::mark_message_read(&mut uow, id).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::with_data(
        "Message marked as read.",
        id,
        message,
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
    crud::delete::<ContactMessage, _>(&mut uow, id, params.hard_delete).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::message("Message deleted successfully.")))
}

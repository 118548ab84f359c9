use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::domain::entities::user::LoginUser;
use crate::entities::responses::DashboardStats;
use crate::errors::AppError;
use crate::repositories::store::Store;
use crate::use_cases::{dashboard, extractors::AdminClaims};
use crate::AppState;

#[instrument(skip_all)]
pub async fn login<S: Store>(
    state: web::Data<AppState<S>>,
    user: web::Json<LoginUser>
) -> impl Responder {
    match state.auth_handler.login(user.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            actix_web::ResponseError::error_response(&e)
        }
    }
}

#[instrument(skip_all, fields(admin = %admin.0.email))]
pub async fn admin_dashboard<S: Store>(
    admin: AdminClaims,
    state: web::Data<AppState<S>>
) -> Result<HttpResponse, AppError> {
    let mut uow = state.unit_of_work().await?;
    let stats: DashboardStats = dashboard::dashboard_stats(&mut uow).await?;
    Ok(HttpResponse::Ok().json(stats))
}

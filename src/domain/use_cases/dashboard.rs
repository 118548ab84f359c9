use crate::{
    entities::responses::DashboardStats,
    errors::AppError,
    repositories::{store::Session, unit_of_work::UnitOfWork},
};

pub async fn dashboard_stats<S: Session>(uow: &mut UnitOfWork<S>) -> Result<DashboardStats, AppError> {
    Ok(DashboardStats {
        total_projects: uow.projects().count(|_| true).await?,
        featured_projects: uow.projects().count(|p| p.is_featured).await?,
        total_messages: uow.contact_messages().count(|_| true).await?,
        unread_messages: uow.contact_messages().count(|m| !m.is_read).await?,
    })
}

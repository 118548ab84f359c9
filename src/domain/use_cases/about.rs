use uuid::Uuid;

use crate::{
    entities::{
        about_me::{AboutMe, AboutMeForm},
        base::Editable,
    },
    errors::AppError,
    repositories::{store::Session, unit_of_work::UnitOfWork},
    use_cases::crud,
};

/// The current "About Me" record, newest first if several ever exist.
pub async fn current_about_me<S: Session>(
    uow: &mut UnitOfWork<S>,
) -> Result<Option<AboutMe>, AppError> {
    let mut records = crud::list(uow, crud::newest_first::<AboutMe>).await?;
    Ok(if records.is_empty() { None } else { Some(records.swap_remove(0)) })
}

/// Creates the single "About Me" record.
///
/// The existence check and the insert share one transaction; the storage
/// layer's unique index catches a concurrent create that slips past the check.
pub async fn create_about_me<S: Session>(
    uow: &mut UnitOfWork<S>,
    form: AboutMeForm,
) -> Result<AboutMe, AppError> {
    let form = crud::checked_form::<AboutMe>(form)?;

    uow.begin_transaction().await?;
    match insert_singleton(uow, form).await {
        Ok(created) => {
            uow.commit().await?;
            tracing::info!(id = %created.meta.id, "About Me created");
            Ok(created)
        }
        Err(e) => {
            uow.rollback().await?;
            Err(e)
        }
    }
}

async fn insert_singleton<S: Session>(
    uow: &mut UnitOfWork<S>,
    form: AboutMeForm,
) -> Result<AboutMe, AppError> {
    if uow.about_me().any(|_| true).await? {
        return Err(AppError::Conflict(
            "About Me already exists. Edit the existing record instead.".to_string(),
        ));
    }

    let created = uow.about_me().add(AboutMe::from_form(form))?;
    uow.save_changes().await?;
    Ok(created)
}

pub async fn update_about_me<S: Session>(
    uow: &mut UnitOfWork<S>,
    id: Uuid,
    form: AboutMeForm,
) -> Result<AboutMe, AppError> {
    crud::update::<AboutMe, S>(uow, id, form).await
}

use uuid::Uuid;

use crate::{
    entities::contact_message::{ContactMessage, ContactMessageForm},
    errors::AppError,
    repositories::{store::Session, unit_of_work::UnitOfWork},
    use_cases::crud,
};

/// Stores a message from the public contact form. It starts unread.
pub async fn submit_message<S: Session>(
    uow: &mut UnitOfWork<S>,
    form: ContactMessageForm,
) -> Result<ContactMessage, AppError> {
    crud::create::<ContactMessage, S>(uow, form).await
}

pub async fn list_messages<S: Session>(
    uow: &mut UnitOfWork<S>,
) -> Result<Vec<ContactMessage>, AppError> {
    crud::list(uow, crud::newest_first::<ContactMessage>).await
}

/// Loads a message and marks it read the first time it is opened.
pub async fn mark_message_read<S: Session>(
    uow: &mut UnitOfWork<S>,
    id: Uuid,
) -> Result<ContactMessage, AppError> {
    let message = crud::get::<ContactMessage, S>(uow, id).await?;
    if message.is_read {
        return Ok(message);
    }
    mark_read(uow, message).await
}

async fn mark_read<S: Session>(
    uow: &mut UnitOfWork<S>,
    mut message: ContactMessage,
) -> Result<ContactMessage, AppError> {
    message.is_read = true;
    let updated = uow.contact_messages().update(message)?;
    uow.save_changes().await?;
    tracing::debug!(id = %updated.meta.id, "Contact message marked read");
    Ok(updated)
}

use std::cmp::Ordering;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        about_me::AboutMe,
        base::{Editable, Entity},
        contact_message::ContactMessage,
        project::Project,
        resume_item::ResumeItem,
        skill::Skill,
    },
    errors::AppError,
    repositories::{
        store::Session,
        unit_of_work::{Tracked, UnitOfWork},
    },
};

/// Every non-deleted record, sorted with `order`.
pub async fn list<T, S, F>(uow: &mut UnitOfWork<S>, order: F) -> Result<Vec<T>, AppError>
where
    T: Tracked,
    S: Session,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut records = uow.repository::<T>().get_all().await?;
    records.sort_by(order);
    Ok(records)
}

pub async fn get<T: Tracked, S: Session>(uow: &mut UnitOfWork<S>, id: Uuid) -> Result<T, AppError> {
    uow.repository::<T>()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(T::LABEL))
}

/// Normalizes and validates the form, then returns it ready to apply.
pub fn checked_form<T: Editable>(form: T::Form) -> Result<T::Form, AppError> {
    let form = T::normalize(form);
    form.validate()?;
    Ok(form)
}

pub async fn create<T, S>(uow: &mut UnitOfWork<S>, form: T::Form) -> Result<T, AppError>
where
    T: Tracked + Editable,
    S: Session,
{
    let form = checked_form::<T>(form)?;
    let created = uow.repository::<T>().add(T::from_form(form))?;
    uow.save_changes().await?;

    tracing::info!(id = %created.id(), "{} created", T::LABEL);
    Ok(created)
}

/// Load, apply the form field by field, save.
pub async fn update<T, S>(uow: &mut UnitOfWork<S>, id: Uuid, form: T::Form) -> Result<T, AppError>
where
    T: Tracked + Editable,
    S: Session,
{
    let form = checked_form::<T>(form)?;
    let mut record = get::<T, S>(uow, id).await?;
    record.apply_form(form);

    let updated = uow.repository::<T>().update(record)?;
    uow.save_changes().await?;

    tracing::info!(%id, "{} updated", T::LABEL);
    Ok(updated)
}

/// Soft delete by default. A hard delete also purges soft-deleted rows.
/// Either way an id with nothing to delete is reported as not found.
pub async fn delete<T: Tracked, S: Session>(
    uow: &mut UnitOfWork<S>,
    id: Uuid,
    hard: bool,
) -> Result<(), AppError> {
    if hard {
        uow.repository::<T>().delete_hard(id).await?;
    } else {
        uow.repository::<T>().delete_soft(id).await?;
    }

    if uow.save_changes().await? == 0 {
        return Err(AppError::not_found(T::LABEL));
    }

    tracing::info!(%id, hard, "{} deleted", T::LABEL);
    Ok(())
}

pub fn newest_first<T: Entity>(a: &T, b: &T) -> Ordering {
    b.meta().created_at.cmp(&a.meta().created_at)
}

/// How a record type is ordered on its admin list page.
pub trait AdminListing: Tracked + Editable {
    fn admin_order(a: &Self, b: &Self) -> Ordering {
        newest_first(a, b)
    }
}

impl AdminListing for Project {}

impl AdminListing for ContactMessage {}

impl AdminListing for AboutMe {}

impl AdminListing for ResumeItem {
    fn admin_order(a: &Self, b: &Self) -> Ordering {
        a.item_type
            .cmp(&b.item_type)
            .then_with(|| b.display_order.cmp(&a.display_order))
            .then_with(|| b.start_date.cmp(&a.start_date))
    }
}

impl AdminListing for Skill {
    fn admin_order(a: &Self, b: &Self) -> Ordering {
        a.category
            .cmp(&b.category)
            .then_with(|| a.display_order.cmp(&b.display_order))
            .then_with(|| a.name.cmp(&b.name))
    }
}

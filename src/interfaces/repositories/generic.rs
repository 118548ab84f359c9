use chrono::Utc;
use uuid::Uuid;

use crate::{
    entities::base::Entity,
    errors::AppError,
    repositories::{
        change_set::{ChangeSet, EntryState},
        store::Session,
    },
};

/// CRUD view over one entity type inside a unit of work.
///
/// Reads go to the session and are merged with what this unit of work has
/// staged. Writes only stage; nothing reaches the store before
/// `UnitOfWork::save_changes`.
pub struct Repository<'uow, T: Entity, S: Session> {
    session: &'uow mut S,
    changes: &'uow mut ChangeSet<T>,
}

impl<'uow, T: Entity, S: Session> Repository<'uow, T, S> {
    pub fn new(session: &'uow mut S, changes: &'uow mut ChangeSet<T>) -> Self {
        Repository { session, changes }
    }

    /// All non-deleted records, in no particular order.
    pub async fn get_all(&mut self) -> Result<Vec<T>, AppError> {
        let stored = self.session.fetch_all::<T>(false).await?;
        Ok(self.changes.merge(stored))
    }

    pub async fn find<P>(&mut self, predicate: P) -> Result<Vec<T>, AppError>
    where
        P: Fn(&T) -> bool,
    {
        let all = self.get_all().await?;
        Ok(all.into_iter().filter(|entity| predicate(entity)).collect())
    }

    /// Absent when missing or soft-deleted.
    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<T>, AppError> {
        if let Some(entry) = self.changes.get(&id) {
            let visible = entry.state != EntryState::Deleted && !entry.entity.is_deleted();
            return Ok(visible.then(|| entry.entity.clone()));
        }

        match self.session.fetch_by_id::<T>(id, false).await? {
            Some(row) => Ok(Some(self.changes.attach(row).entity.clone())),
            None => Ok(None),
        }
    }

    /// Like `get_by_id`, but soft-deleted records are returned too. Records
    /// staged for physical removal are still absent.
    pub async fn get_by_id_including_deleted(&mut self, id: Uuid) -> Result<Option<T>, AppError> {
        if let Some(entry) = self.changes.get(&id) {
            return Ok((entry.state != EntryState::Deleted).then(|| entry.entity.clone()));
        }

        match self.session.fetch_by_id::<T>(id, true).await? {
            Some(row) => Ok(Some(self.changes.attach(row).entity.clone())),
            None => Ok(None),
        }
    }

    /// Stages an insert. A nil id is replaced with a fresh one and
    /// `created_at` is set to now.
    pub fn add(&mut self, mut entity: T) -> Result<T, AppError> {
        entity.meta_mut().stamp_created(Utc::now());

        if self.changes.is_tracked(&entity.id()) {
            return Err(AppError::Conflict(format!(
                "{} {} is already tracked",
                T::LABEL,
                entity.id()
            )));
        }

        self.changes.stage(entity.clone(), EntryState::Added);
        Ok(entity)
    }

    /// Stages an update of a record previously loaded or added through this
    /// unit of work.
    ///
    /// `created_at` and the deletion flag always come from the tracked copy;
    /// only `delete_soft` changes the flag.
    pub fn update(&mut self, mut entity: T) -> Result<T, AppError> {
        let id = entity.id();
        let (state, tracked) = match self.changes.get(&id) {
            Some(entry) if entry.state == EntryState::Deleted => {
                return Err(AppError::not_found(T::LABEL));
            }
            Some(entry) if entry.state == EntryState::Added => (EntryState::Added, entry.entity.meta()),
            Some(entry) => (EntryState::Modified, entry.entity.meta()),
            None => {
                return Err(AppError::InternalError(format!(
                    "{} {} must be loaded before it is updated",
                    T::LABEL,
                    id
                )));
            }
        };

        let (created_at, is_deleted) = (tracked.created_at, tracked.is_deleted);
        let meta = entity.meta_mut();
        meta.created_at = created_at;
        meta.is_deleted = is_deleted;
        meta.stamp_updated(Utc::now());
        self.changes.stage(entity.clone(), state);
        Ok(entity)
    }

    /// Flags the record as deleted. Missing or already deleted ids are a no-op.
    pub async fn delete_soft(&mut self, id: Uuid) -> Result<(), AppError> {
        let Some(mut entity) = self.get_by_id(id).await? else {
            return Ok(());
        };

        let state = match self.changes.get(&id).map(|entry| entry.state) {
            Some(EntryState::Added) => EntryState::Added,
            _ => EntryState::Modified,
        };

        entity.meta_mut().mark_deleted(Utc::now());
        self.changes.stage(entity, state);
        Ok(())
    }

    /// Stages physical removal, soft-deleted rows included. Missing ids are a
    /// no-op.
    pub async fn delete_hard(&mut self, id: Uuid) -> Result<(), AppError> {
        match self.changes.get(&id).map(|entry| entry.state) {
            Some(EntryState::Deleted) => return Ok(()),
            Some(EntryState::Added) => {
                self.changes.detach(&id);
                return Ok(());
            }
            Some(_) => {
                if let Some(entry) = self.changes.get(&id) {
                    let entity = entry.entity.clone();
                    self.changes.stage(entity, EntryState::Deleted);
                }
                return Ok(());
            }
            None => {}
        }

        if let Some(row) = self.session.fetch_by_id::<T>(id, true).await? {
            self.changes.stage(row, EntryState::Deleted);
        }
        Ok(())
    }

    /// True when at least one non-deleted record satisfies `predicate`.
    pub async fn any<P>(&mut self, predicate: P) -> Result<bool, AppError>
    where
        P: Fn(&T) -> bool,
    {
        let all = self.get_all().await?;
        Ok(all.iter().any(|entity| predicate(entity)))
    }

    pub async fn count<P>(&mut self, predicate: P) -> Result<usize, AppError>
    where
        P: Fn(&T) -> bool,
    {
        let all = self.get_all().await?;
        Ok(all.iter().filter(|entity| predicate(entity)).count())
    }
}

use crate::{
    entities::{
        about_me::AboutMe,
        base::Entity,
        contact_message::ContactMessage,
        project::Project,
        resume_item::ResumeItem,
        skill::Skill,
    },
    errors::AppError,
    repositories::{
        change_set::{ChangeSet, EntryState},
        generic::Repository,
        store::Session,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Open,
}

/// Change sets for every entity type, built when the unit of work is created.
#[derive(Debug, Default)]
pub struct ChangeSets {
    projects: ChangeSet<Project>,
    contact_messages: ChangeSet<ContactMessage>,
    resume_items: ChangeSet<ResumeItem>,
    skills: ChangeSet<Skill>,
    about_me: ChangeSet<AboutMe>,
}

impl ChangeSets {
    fn has_pending(&self) -> bool {
        self.projects.has_pending()
            || self.contact_messages.has_pending()
            || self.resume_items.has_pending()
            || self.skills.has_pending()
            || self.about_me.has_pending()
    }

    fn accept(&mut self) {
        self.projects.accept();
        self.contact_messages.accept();
        self.resume_items.accept();
        self.skills.accept();
        self.about_me.accept();
    }

    fn clear(&mut self) {
        self.projects.clear();
        self.contact_messages.clear();
        self.resume_items.clear();
        self.skills.clear();
        self.about_me.clear();
    }
}

/// Entities a unit of work tracks, mapped to their change set.
pub trait Tracked: Entity {
    fn change_set(sets: &mut ChangeSets) -> &mut ChangeSet<Self>;
}

impl Tracked for Project {
    fn change_set(sets: &mut ChangeSets) -> &mut ChangeSet<Self> {
        &mut sets.projects
    }
}

impl Tracked for ContactMessage {
    fn change_set(sets: &mut ChangeSets) -> &mut ChangeSet<Self> {
        &mut sets.contact_messages
    }
}

impl Tracked for ResumeItem {
    fn change_set(sets: &mut ChangeSets) -> &mut ChangeSet<Self> {
        &mut sets.resume_items
    }
}

impl Tracked for Skill {
    fn change_set(sets: &mut ChangeSets) -> &mut ChangeSet<Self> {
        &mut sets.skills
    }
}

impl Tracked for AboutMe {
    fn change_set(sets: &mut ChangeSets) -> &mut ChangeSet<Self> {
        &mut sets.about_me
    }
}

/// Request-scoped aggregate of repositories sharing one session and one
/// transaction boundary.
///
/// Transaction state moves `Idle -> Open` on [`UnitOfWork::begin_transaction`]
/// and back to `Idle` on commit or rollback; committing or rolling back while
/// idle does nothing. A rollback also empties the identity map. Dropping the unit of work discards staged operations
/// and the session rolls back any transaction still open.
pub struct UnitOfWork<S: Session> {
    session: S,
    sets: ChangeSets,
    transaction: TransactionState,
}

impl<S: Session> UnitOfWork<S> {
    pub fn new(session: S) -> Self {
        UnitOfWork {
            session,
            sets: ChangeSets::default(),
            transaction: TransactionState::Idle,
        }
    }

    pub fn repository<T: Tracked>(&mut self) -> Repository<'_, T, S> {
        Repository::new(&mut self.session, T::change_set(&mut self.sets))
    }

    pub fn projects(&mut self) -> Repository<'_, Project, S> {
        self.repository()
    }

    pub fn contact_messages(&mut self) -> Repository<'_, ContactMessage, S> {
        self.repository()
    }

    pub fn resume_items(&mut self) -> Repository<'_, ResumeItem, S> {
        self.repository()
    }

    pub fn skills(&mut self) -> Repository<'_, Skill, S> {
        self.repository()
    }

    pub fn about_me(&mut self) -> Repository<'_, AboutMe, S> {
        self.repository()
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.transaction
    }

    pub fn has_changes(&self) -> bool {
        self.sets.has_pending()
    }

    pub async fn begin_transaction(&mut self) -> Result<(), AppError> {
        if self.transaction == TransactionState::Open {
            return Err(AppError::Conflict("A transaction is already open".to_string()));
        }
        self.session.begin().await?;
        self.transaction = TransactionState::Open;
        tracing::debug!("Transaction opened");
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<(), AppError> {
        if self.transaction == TransactionState::Idle {
            return Ok(());
        }
        // The transaction is finished either way once commit was attempted.
        self.transaction = TransactionState::Idle;
        self.session.commit().await?;
        tracing::debug!("Transaction committed");
        Ok(())
    }

    /// Tracked records saved inside the transaction are forgotten with it, so
    /// later reads go back to the store.
    pub async fn rollback(&mut self) -> Result<(), AppError> {
        if self.transaction == TransactionState::Idle {
            return Ok(());
        }
        self.transaction = TransactionState::Idle;
        self.sets.clear();
        self.session.rollback().await?;
        tracing::debug!("Transaction rolled back");
        Ok(())
    }

    /// Flushes every staged operation in one atomic write and returns the
    /// number of affected rows.
    ///
    /// Outside an explicit transaction the flush runs in its own; on failure
    /// that transaction is rolled back and the staged operations are kept.
    pub async fn save_changes(&mut self) -> Result<u64, AppError> {
        if !self.sets.has_pending() {
            return Ok(0);
        }

        let owns_transaction = self.transaction == TransactionState::Idle;
        if owns_transaction {
            self.session.begin().await?;
        }

        match self.flush().await {
            Ok(affected) => {
                if owns_transaction {
                    self.session.commit().await?;
                }
                self.sets.accept();
                tracing::debug!(affected, "Saved changes");
                Ok(affected)
            }
            Err(e) => {
                if owns_transaction {
                    if let Err(rollback_err) = self.session.rollback().await {
                        tracing::error!("Rollback after failed save also failed: {}", rollback_err);
                    }
                }
                tracing::warn!("Saving changes failed: {}", e);
                Err(e)
            }
        }
    }

    /// Rolls back an open transaction and forgets staged work. Safe to call
    /// repeatedly.
    pub async fn dispose(&mut self) -> Result<(), AppError> {
        self.sets.clear();
        self.rollback().await
    }

    async fn flush(&mut self) -> Result<u64, AppError> {
        let session = &mut self.session;
        let sets = &self.sets;

        let mut affected = 0;
        affected += flush_set(session, &sets.about_me).await?;
        affected += flush_set(session, &sets.projects).await?;
        affected += flush_set(session, &sets.resume_items).await?;
        affected += flush_set(session, &sets.skills).await?;
        affected += flush_set(session, &sets.contact_messages).await?;
        Ok(affected)
    }
}

impl<S: Session> Drop for UnitOfWork<S> {
    fn drop(&mut self) {
        if self.transaction == TransactionState::Open {
            tracing::debug!("Unit of work dropped with an open transaction; rolling back");
        } else if self.sets.has_pending() {
            tracing::debug!("Unit of work dropped with unsaved changes; discarding");
        }
    }
}

async fn flush_set<S: Session, T: Entity>(
    session: &mut S,
    changes: &ChangeSet<T>,
) -> Result<u64, AppError> {
    let mut affected = 0;
    for entry in changes.pending() {
        affected += match entry.state {
            EntryState::Added => session.insert(&entry.entity).await?,
            EntryState::Modified => session.update(&entry.entity).await?,
            EntryState::Deleted => session.delete::<T>(entry.entity.id()).await?,
            EntryState::Unchanged => 0,
        };
    }
    Ok(affected)
}

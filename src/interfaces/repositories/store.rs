use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::base::Entity,
    errors::AppError,
    repositories::user::UserRepository,
};

/// One persistence session, owned by a single unit of work.
///
/// Reads exclude soft-deleted rows unless `include_deleted` is set.
/// Writes made while a transaction is open are only visible to other
/// sessions after [`Session::commit`].
#[async_trait]
pub trait Session: Send {
    async fn fetch_all<T: Entity>(&mut self, include_deleted: bool) -> Result<Vec<T>, AppError>;

    async fn fetch_by_id<T: Entity>(
        &mut self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<T>, AppError>;

    /// Returns the number of rows written.
    async fn insert<T: Entity>(&mut self, entity: &T) -> Result<u64, AppError>;

    async fn update<T: Entity>(&mut self, entity: &T) -> Result<u64, AppError>;

    async fn delete<T: Entity>(&mut self, id: Uuid) -> Result<u64, AppError>;

    async fn begin(&mut self) -> Result<(), AppError>;

    async fn commit(&mut self) -> Result<(), AppError>;

    async fn rollback(&mut self) -> Result<(), AppError>;

    fn in_transaction(&self) -> bool;
}

/// Shared handle to the persistent store, cloned into every worker.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Session: Session + 'static;
    type Users: UserRepository + Clone + 'static;

    async fn open_session(&self) -> Result<Self::Session, AppError>;

    fn users(&self) -> Self::Users;

    async fn check_connection(&self) -> Result<(), AppError>;
}

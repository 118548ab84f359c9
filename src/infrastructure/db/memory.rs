use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    entities::{
        base::Entity,
        user::{User, UserInsert},
    },
    errors::AppError,
    repositories::{
        store::{Session, Store},
        user::UserRepository,
    },
};

type Rows = BTreeMap<Uuid, Value>;
type Tables = HashMap<&'static str, Rows>;

/// Process-local store holding rows as JSON documents.
///
/// Backs the test suite and database-less local runs. Sessions buffer
/// transactional writes and apply them under one write lock on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    users: MemoryUserRepo,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a row as stored, deletion flag included.
    pub fn raw_row<T: Entity>(&self, id: Uuid) -> Option<T> {
        let tables = self.tables.read();
        tables
            .get(T::TABLE)
            .and_then(|rows| rows.get(&id))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn row_count<T: Entity>(&self) -> usize {
        self.tables.read().get(T::TABLE).map_or(0, |rows| rows.len())
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Session = MemorySession;
    type Users = MemoryUserRepo;

    async fn open_session(&self) -> Result<MemorySession, AppError> {
        Ok(MemorySession {
            store: self.clone(),
            pending: None,
        })
    }

    fn users(&self) -> MemoryUserRepo {
        self.users.clone()
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

type PendingWrites = BTreeMap<(&'static str, Uuid), Option<Value>>;

pub struct MemorySession {
    store: MemoryStore,
    pending: Option<PendingWrites>,
}

impl MemorySession {
    /// Committed rows of `table` overlaid with this session's pending writes.
    fn visible_rows(&self, table: &'static str) -> Rows {
        let mut rows = self
            .store
            .tables
            .read()
            .get(table)
            .cloned()
            .unwrap_or_default();

        if let Some(pending) = &self.pending {
            for ((pending_table, id), write) in pending {
                if *pending_table != table {
                    continue;
                }
                match write {
                    Some(value) => {
                        rows.insert(*id, value.clone());
                    }
                    None => {
                        rows.remove(id);
                    }
                }
            }
        }
        rows
    }

    fn row_exists(&self, table: &'static str, id: Uuid) -> bool {
        if let Some(pending) = &self.pending {
            if let Some(write) = pending.get(&(table, id)) {
                return write.is_some();
            }
        }
        self.store
            .tables
            .read()
            .get(table)
            .is_some_and(|rows| rows.contains_key(&id))
    }

    fn write(&mut self, table: &'static str, id: Uuid, value: Option<Value>) {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.insert((table, id), value);
            }
            None => {
                let mut tables = self.store.tables.write();
                let rows = tables.entry(table).or_default();
                match value {
                    Some(value) => {
                        rows.insert(id, value);
                    }
                    None => {
                        rows.remove(&id);
                    }
                }
            }
        }
    }
}

fn decode<T: Entity>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(AppError::from)
}

#[async_trait]
impl Session for MemorySession {
    async fn fetch_all<T: Entity>(&mut self, include_deleted: bool) -> Result<Vec<T>, AppError> {
        let mut entities = Vec::new();
        for value in self.visible_rows(T::TABLE).into_values() {
            let entity: T = decode(value)?;
            if include_deleted || !entity.is_deleted() {
                entities.push(entity);
            }
        }
        Ok(entities)
    }

    async fn fetch_by_id<T: Entity>(
        &mut self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<T>, AppError> {
        let Some(value) = self.visible_rows(T::TABLE).remove(&id) else {
            return Ok(None);
        };
        let entity: T = decode(value)?;
        Ok((include_deleted || !entity.is_deleted()).then_some(entity))
    }

    async fn insert<T: Entity>(&mut self, entity: &T) -> Result<u64, AppError> {
        let id = entity.id();
        if self.row_exists(T::TABLE, id) {
            return Err(AppError::Conflict(format!("{} {} already exists", T::LABEL, id)));
        }
        let value = serde_json::to_value(entity)?;
        self.write(T::TABLE, id, Some(value));
        Ok(1)
    }

    async fn update<T: Entity>(&mut self, entity: &T) -> Result<u64, AppError> {
        let id = entity.id();
        if !self.row_exists(T::TABLE, id) {
            return Ok(0);
        }
        let value = serde_json::to_value(entity)?;
        self.write(T::TABLE, id, Some(value));
        Ok(1)
    }

    async fn delete<T: Entity>(&mut self, id: Uuid) -> Result<u64, AppError> {
        if !self.row_exists(T::TABLE, id) {
            return Ok(0);
        }
        self.write(T::TABLE, id, None);
        Ok(1)
    }

    async fn begin(&mut self) -> Result<(), AppError> {
        if self.pending.is_some() {
            return Err(AppError::Conflict("A transaction is already open".to_string()));
        }
        self.pending = Some(PendingWrites::new());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let mut tables = self.store.tables.write();
        for ((table, id), write) in pending {
            let rows = tables.entry(table).or_default();
            match write {
                Some(value) => {
                    rows.insert(id, value);
                }
                None => {
                    rows.remove(&id);
                }
            }
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        self.pending = None;
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }
}

// Accounts and roles backing the seeder and login.

#[derive(Default)]
struct Identity {
    roles: HashMap<String, Uuid>,
    users: HashMap<Uuid, User>,
    user_roles: HashSet<(Uuid, String)>,
}

#[derive(Clone, Default)]
pub struct MemoryUserRepo {
    inner: Arc<RwLock<Identity>>,
}

impl MemoryUserRepo {
    pub fn role_count(&self, name: &str) -> usize {
        self.inner
            .read()
            .roles
            .keys()
            .filter(|role| role.eq_ignore_ascii_case(name))
            .count()
    }

    pub fn user_count(&self, email: &str) -> usize {
        self.inner
            .read()
            .users
            .values()
            .filter(|user| user.email.eq_ignore_ascii_case(email.trim()))
            .count()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn role_exists(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.role_count(name) > 0)
    }

    async fn create_role(&self, name: &str) -> Result<Uuid, AppError> {
        let mut identity = self.inner.write();
        if identity.roles.keys().any(|role| role.eq_ignore_ascii_case(name)) {
            return Err(AppError::Conflict(format!("Role {name} already exists")));
        }
        let id = Uuid::new_v4();
        identity.roles.insert(name.to_string(), id);
        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim();
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().users.get(id).cloned())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError> {
        let mut identity = self.inner.write();
        if identity
            .users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("User with this email already exists".to_string()));
        }

        let id = Uuid::new_v4();
        identity.users.insert(
            id,
            User {
                id,
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn add_to_role(&self, user_id: &Uuid, role: &str) -> Result<(), AppError> {
        let mut identity = self.inner.write();
        let Some(role_name) = identity
            .roles
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(role))
            .cloned()
        else {
            return Err(AppError::NotFound(format!("Role {role} not found")));
        };
        if !identity.users.contains_key(user_id) {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        identity.user_roles.insert((*user_id, role_name));
        Ok(())
    }

    async fn get_roles(&self, user_id: &Uuid) -> Result<Vec<String>, AppError> {
        let identity = self.inner.read();
        let mut roles: Vec<String> = identity
            .user_roles
            .iter()
            .filter(|(id, _)| id == user_id)
            .map(|(_, role)| role.clone())
            .collect();
        roles.sort();
        Ok(roles)
    }
}

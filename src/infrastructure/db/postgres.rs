use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Postgres, QueryBuilder, Transaction,
};
use tracing::info;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    entities::base::Entity,
    errors::AppError,
    repositories::{
        store::{Session, Store},
        user::SqlxUserRepo,
    },
};

const META_COLUMNS: &str = "id, created_at, updated_at, is_deleted";

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let max_retries = 5;
    let mut retry_count = 0;
    let mut wait_seconds = 2;

    loop {
        match PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                info!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    retry_count, max_retries, e, wait_seconds);

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// PostgreSQL-backed store. Each session borrows connections from the pool
/// and pins one while a transaction is open.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied.");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    type Session = PgSession;
    type Users = SqlxUserRepo;

    async fn open_session(&self) -> Result<PgSession, AppError> {
        Ok(PgSession {
            pool: self.pool.clone(),
            tx: None,
        })
    }

    fn users(&self) -> SqlxUserRepo {
        SqlxUserRepo::new(self.pool.clone())
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }
}

/// Dropping a session with an open transaction rolls it back.
pub struct PgSession {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgSession {
    async fn execute(&mut self, mut builder: QueryBuilder<'_, Postgres>) -> Result<u64, AppError> {
        let query = builder.build();
        let result = match self.tx.as_mut() {
            Some(tx) => query.execute(&mut **tx).await?,
            None => query.execute(&self.pool).await?,
        };
        Ok(result.rows_affected())
    }
}

fn select_sql<T: Entity>(include_deleted: bool, by_id: bool) -> String {
    let mut sql = format!("SELECT * FROM {}", T::TABLE);
    match (by_id, include_deleted) {
        (true, true) => sql.push_str(" WHERE id = $1"),
        (true, false) => sql.push_str(" WHERE id = $1 AND is_deleted = FALSE"),
        (false, true) => {}
        (false, false) => sql.push_str(" WHERE is_deleted = FALSE"),
    }
    sql
}

fn column_list<T: Entity>() -> String {
    let mut columns = String::from(META_COLUMNS);
    for column in T::COLUMNS {
        columns.push_str(", ");
        columns.push_str(column);
    }
    columns
}

fn push_row<'args, T: Entity>(builder: &mut QueryBuilder<'args, Postgres>, entity: &T) {
    let meta = entity.meta();
    let mut values = builder.separated(", ");
    values.push_bind(meta.id);
    values.push_bind(meta.created_at);
    values.push_bind(meta.updated_at);
    values.push_bind(meta.is_deleted);
    entity.bind_columns(&mut values);
}

#[async_trait]
impl Session for PgSession {
    async fn fetch_all<T: Entity>(&mut self, include_deleted: bool) -> Result<Vec<T>, AppError> {
        let sql = select_sql::<T>(include_deleted, false);
        let query = sqlx::query_as::<_, T>(&sql);
        let rows = match self.tx.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await?,
            None => query.fetch_all(&self.pool).await?,
        };
        Ok(rows)
    }

    async fn fetch_by_id<T: Entity>(
        &mut self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<T>, AppError> {
        let sql = select_sql::<T>(include_deleted, true);
        let query = sqlx::query_as::<_, T>(&sql).bind(id);
        let row = match self.tx.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await?,
            None => query.fetch_optional(&self.pool).await?,
        };
        Ok(row)
    }

    async fn insert<T: Entity>(&mut self, entity: &T) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            T::TABLE,
            column_list::<T>()
        ));
        push_row(&mut builder, entity);
        builder.push(")");
        self.execute(builder).await
    }

    /// Rewrites every column; last write wins.
    async fn update<T: Entity>(&mut self, entity: &T) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} SET ({}) = (",
            T::TABLE,
            column_list::<T>()
        ));
        push_row(&mut builder, entity);
        builder.push(") WHERE id = ");
        builder.push_bind(entity.id());
        self.execute(builder).await
    }

    async fn delete<T: Entity>(&mut self, id: Uuid) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("DELETE FROM {} WHERE id = ", T::TABLE));
        builder.push_bind(id);
        self.execute(builder).await
    }

    async fn begin(&mut self) -> Result<(), AppError> {
        if self.tx.is_some() {
            return Err(AppError::Conflict("A transaction is already open".to_string()));
        }
        self.tx = Some(self.pool.begin().await?);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    entities::user::{User, UserInsert},
    errors::AppError,
};


/// Accounts and roles used by the seeder and by login.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn role_exists(&self, name: &str) -> Result<bool, AppError>;
    async fn create_role(&self, name: &str) -> Result<Uuid, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError>;
    async fn add_to_role(&self, user_id: &Uuid, role: &str) -> Result<(), AppError>;
    async fn get_roles(&self, user_id: &Uuid) -> Result<Vec<String>, AppError>;
}

#[derive(Clone)]
pub struct SqlxUserRepo {
    pool: PgPool,
}

impl SqlxUserRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn role_exists(&self, name: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE normalized_name = UPPER($1))"
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_role(&self, name: &str) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO roles (id, name, normalized_name) VALUES ($1, $2, UPPER($2)) RETURNING id"
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict(format!("Role {name} already exists"))
            }
            _ => AppError::from(e),
        })?;

        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = LOWER($1)"
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4) RETURNING id"#
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("User with this email already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(id)
    }

    async fn add_to_role(&self, user_id: &Uuid, role: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"INSERT INTO user_roles (user_id, role_id)
            SELECT $1, id FROM roles WHERE normalized_name = UPPER($2)
            ON CONFLICT DO NOTHING"#
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 && !self.role_exists(role).await? {
            return Err(AppError::NotFound(format!("Role {role} not found")));
        }

        Ok(())
    }

    async fn get_roles(&self, user_id: &Uuid) -> Result<Vec<String>, AppError> {
        let roles: Vec<String> = sqlx::query_scalar(
            r#"SELECT r.name FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name"#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}

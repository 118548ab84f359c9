use crate::{
    auth::password::hash_password,
    constants::ADMIN_ROLE,
    entities::user::UserInsert,
    errors::AppError,
    password::{check_password_policy, weak_password_warning},
    repositories::user::UserRepository,
    settings::AdminCredentials,
};

/// What a seeding run changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub role_created: bool,
    pub admin_created: bool,
}

/// Startup bootstrap of the "Admin" role and the admin account.
///
/// Safe to run on every start: once both exist a run changes nothing.
pub struct DataSeeder<R: UserRepository> {
    user_repo: R,
}

impl<R: UserRepository> DataSeeder<R> {
    pub fn new(user_repo: R) -> Self {
        DataSeeder { user_repo }
    }

    pub async fn seed(&self, credentials: &AdminCredentials) -> Result<SeedReport, AppError> {
        let mut report = SeedReport::default();

        if !self.user_repo.role_exists(ADMIN_ROLE).await? {
            self.user_repo.create_role(ADMIN_ROLE).await?;
            report.role_created = true;
            tracing::info!(role = ADMIN_ROLE, "Created role");
        }

        if self.user_repo.get_user_by_email(&credentials.email).await?.is_some() {
            tracing::debug!("Admin account already present");
            return Ok(report);
        }

        check_password_policy(&credentials.password).map_err(|e| {
            AppError::Configuration(format!("Failed to create admin user: {e}"))
        })?;

        if let Some(warning) = weak_password_warning(&credentials.password) {
            tracing::warn!("Admin password is weak ({warning}); configure a stronger APP_ADMIN_PASSWORD");
        }

        let password_hash = hash_password(&credentials.password).map_err(|e| {
            AppError::Configuration(format!("Failed to create admin user: {e}"))
        })?;

        let user_id = self
            .user_repo
            .create_user(&UserInsert::new(&credentials.email, password_hash))
            .await
            .map_err(|e| AppError::Configuration(format!("Failed to create admin user: {e}")))?;

        self.user_repo.add_to_role(&user_id, ADMIN_ROLE).await?;
        report.admin_created = true;

        tracing::info!(email = %credentials.email, "Created admin account");
        Ok(report)
    }
}

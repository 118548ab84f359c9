mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, limiter, storage, utils};

use auth::jwt::JwtService;
use errors::AppError;
use limiter::login_guard::LoginGuard;
use repositories::{store::Store, unit_of_work::UnitOfWork};
use storage::images::ImageStorage;
use use_cases::auth::AuthHandler;

/// Shared by every worker. Request-scoped state lives in the unit of work
/// each handler opens.
pub struct AppState<S: Store> {
    pub store: S,
    pub images: ImageStorage,
    pub auth_handler: AuthHandler<S::Users>,
}

impl<S: Store> AppState<S> {
    pub fn new(config: &settings::AppConfig, store: S) -> Self {
        let login_guard = LoginGuard::new(
            config.login_max_failures,
            chrono::Duration::minutes(config.login_lockout_minutes),
        );
        let auth_handler = AuthHandler::new(store.users(), JwtService::new(config), login_guard);
        let images = ImageStorage::new(&config.web_root, config.max_upload_size_bytes());

        AppState {
            store,
            images,
            auth_handler,
        }
    }

    pub async fn unit_of_work(&self) -> Result<UnitOfWork<S::Session>, AppError> {
        let session = self.store.open_session().await?;
        Ok(UnitOfWork::new(session))
    }
}

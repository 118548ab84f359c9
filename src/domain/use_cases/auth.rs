use validator::Validate;

use crate::auth::jwt::JwtService;
use crate::auth::password::verify_password;
use crate::entities::token::AuthResponse;
use crate::entities::user::LoginUser;
use crate::errors::AuthError;
use crate::interfaces::repositories::user::UserRepository;
use crate::limiter::login_guard::LoginGuard;

pub struct AuthHandler<R>
where
    R: UserRepository,
{
    pub user_repo: R,
    pub token_service: JwtService,
    pub login_guard: LoginGuard,
}

impl<R> AuthHandler<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: R, token_service: JwtService, login_guard: LoginGuard) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            login_guard,
        }
    }

    /// Verifies the credentials and issues an access token carrying the
    /// account's roles. Failures count towards the account lockout.
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;
        self.login_guard.check(&request.email)?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed: {}", e);
                AuthError::AuthenticationFailed
            })?;

        let Some(user) = user else {
            self.login_guard.record_failure(&request.email);
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_password_valid {
            self.login_guard.record_failure(&request.email);
            return Err(AuthError::WrongCredentials);
        }

        self.login_guard.reset(&request.email);

        let roles = self.user_repo.get_roles(&user.id)
            .await
            .map_err(|e| {
                tracing::error!("Role lookup failed: {}", e);
                AuthError::AuthenticationFailed
            })?;

        let access_token = self.token_service.create_jwt(&user, roles)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(AuthResponse::new(access_token, self.token_service.expires_in()))
    }
}

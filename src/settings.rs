use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

use crate::constants::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_minutes: i64,

    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    /// Lets non-production runs fall back to the well-known admin account.
    #[serde(default)]
    pub allow_insecure_admin_defaults: bool,

    #[serde(default = "default_web_root")]
    pub web_root: String,

    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: u64,

    #[serde(default = "default_login_max_failures")]
    pub login_max_failures: u32,

    #[serde(default = "default_login_lockout_minutes")]
    pub login_lockout_minutes: i64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Site".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_jwt_expiration() -> i64 {
    60
}
fn default_web_root() -> String {
    "wwwroot".to_string()
}
fn default_max_upload_size_mb() -> u64 {
    5
}
fn default_login_max_failures() -> u32 {
    5
}
fn default_login_lockout_minutes() -> i64 {
    5
}

/// Admin account the seeder guarantees at startup.
#[derive(Clone, PartialEq)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.jwt_secret = fill_or_env(config.jwt_secret, "APP_JWT_SECRET")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.is_production() && self.allow_insecure_admin_defaults {
            errors.push("ALLOW_INSECURE_ADMIN_DEFAULTS cannot be enabled in production");
        }
        if self.max_upload_size_mb == 0 {
            errors.push("MAX_UPLOAD_SIZE_MB must be greater than zero");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Resolves the admin account to seed.
    ///
    /// Explicit values always win. Production never falls back, and other
    /// environments only do so when `allow_insecure_admin_defaults` is set.
    pub fn admin_credentials(&self) -> Result<AdminCredentials, ConfigError> {
        let email = non_blank(self.admin_email.as_deref());
        let password = non_blank(self.admin_password.as_deref());

        if let (Some(email), Some(password)) = (email, password) {
            return Ok(AdminCredentials {
                email: email.to_string(),
                password: password.to_string(),
            });
        }

        if self.is_production() {
            let missing = match (email, password) {
                (None, None) => "ADMIN_EMAIL and ADMIN_PASSWORD",
                (None, _) => "ADMIN_EMAIL",
                _ => "ADMIN_PASSWORD",
            };
            return Err(ConfigError::Message(format!(
                "{missing} must be configured in production"
            )));
        }

        if !self.allow_insecure_admin_defaults {
            return Err(ConfigError::Message(
                "Admin credentials are not configured; set APP_ADMIN_EMAIL and APP_ADMIN_PASSWORD \
                 or enable APP_ALLOW_INSECURE_ADMIN_DEFAULTS for local development"
                    .to_string(),
            ));
        }

        tracing::warn!(
            env = %self.env,
            "Using insecure default admin credentials for missing values"
        );

        Ok(AdminCredentials {
            email: email.unwrap_or(DEFAULT_ADMIN_EMAIL).to_string(),
            password: password.unwrap_or(DEFAULT_ADMIN_PASSWORD).to_string(),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            database_url: String::new(),
            cors_allowed_origins: default_cors_origins(),
            jwt_secret: String::new(),
            jwt_expiration_minutes: default_jwt_expiration(),
            admin_email: None,
            admin_password: None,
            allow_insecure_admin_defaults: false,
            web_root: default_web_root(),
            max_upload_size_mb: default_max_upload_size_mb(),
            login_max_failures: default_login_max_failures(),
            login_lockout_minutes: default_login_lockout_minutes(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[REDACTED]"))
            .field("allow_insecure_admin_defaults", &self.allow_insecure_admin_defaults)
            .field("web_root", &self.web_root)
            .field("max_upload_size_mb", &self.max_upload_size_mb)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

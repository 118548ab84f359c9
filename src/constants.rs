use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const ADMIN_ROLE: &str = "Admin";

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@admin.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin123!";

/// Public URL prefix and on-disk subpath (under the web root) of project images.
pub const PROJECT_IMAGES_URL_PREFIX: &str = "/images/projects/";
pub const PROJECT_IMAGES_DIR: &str = "images/projects";

use actix_web::web;

use crate::repositories::store::Store;

mod admin;
mod auth;
mod json_error;
mod public;

pub fn configure_routes<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.configure(public::config_routes::<S>);
    cfg.configure(auth::config_routes::<S>);
    cfg.configure(admin::config_routes::<S>);

    cfg.configure(json_error::config_routes);
}

use actix_web::web;

use crate::{handlers::auth, repositories::store::Store};

pub fn config_routes<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/account")
            .service(
                web::resource("/login")
                    .route(web::post().to(auth::login::<S>))
            )
    );
}

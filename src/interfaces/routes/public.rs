use actix_web::web;

use crate::{
    handlers::{contact_messages, home, images, system},
    repositories::store::Store,
};

pub fn config_routes<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(home::home::<S>))
    )
    .service(
        web::resource("/projects")
            .route(web::get().to(home::projects::<S>))
    )
    .service(
        web::resource("/projects/{id}")
            .route(web::get().to(home::project_details::<S>))
    )
    .service(
        web::resource("/images/projects/{file_name}")
            .route(web::get().to(images::project_image::<S>))
    )
    .service(
        web::resource("/resume")
            .route(web::get().to(home::resume::<S>))
    )
    .service(
        web::resource("/contact")
            .route(web::post().to(contact_messages::submit::<S>))
    )
    .service(
        web::resource("/health")
            .route(web::get().to(system::health_check::<S>))
    );
}

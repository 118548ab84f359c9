use actix_web::web;

use crate::{
    entities::{resume_item::ResumeItem, skill::Skill},
    handlers::{about_me, auth, contact_messages, projects, records},
    repositories::store::Store,
    use_cases::crud::AdminListing,
};

pub fn config_routes<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::resource("/dashboard")
                    .route(web::get().to(auth::admin_dashboard::<S>))
            )
            .service(
                web::scope("/about-me")
                    .service(
                        web::resource("")
                            .route(web::get().to(about_me::current::<S>))
                            .route(web::post().to(about_me::create::<S>))
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(about_me::details::<S>))
                            .route(web::put().to(about_me::update::<S>))
                            .route(web::delete().to(about_me::delete::<S>))
                    )
            )
            .service(
                web::scope("/projects")
                    .service(
                        web::resource("")
                            .route(web::get().to(projects::list::<S>))
                            .route(web::post().to(projects::create::<S>))
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(projects::details::<S>))
                            .route(web::put().to(projects::update::<S>))
                            .route(web::delete().to(projects::delete::<S>))
                    )
            )
            .service(
                web::scope("/contact-messages")
                    .service(
                        web::resource("")
                            .route(web::get().to(contact_messages::list::<S>))
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(contact_messages::details::<S>))
                            .route(web::delete().to(contact_messages::delete::<S>))
                    )
                    .service(
                        web::resource("/{id}/read")
                            .route(web::post().to(contact_messages::mark_read::<S>))
                    )
            )
            .service(record_scope::<ResumeItem, S>("/resume-items"))
            .service(record_scope::<Skill, S>("/skills"))
    );
}

fn record_scope<T, S>(path: &str) -> actix_web::Scope
where
    T: AdminListing,
    T::Form: serde::de::DeserializeOwned + 'static,
    S: Store,
{
    web::scope(path)
        .service(
            web::resource("")
                .route(web::get().to(records::list::<T, S>))
                .route(web::post().to(records::create::<T, S>))
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(records::details::<T, S>))
                .route(web::put().to(records::update::<T, S>))
                .route(web::delete().to(records::delete::<T, S>))
        )
}

use actix_web::web;

pub mod auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/authorize", web::post().to(auth::authorize))
            .route("/verify", web::post().to(auth::verify)),
    );
}

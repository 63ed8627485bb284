use crate::handlers::attendance;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("", web::get().to(attendance::get_history))
            .route("/check-in", web::post().to(attendance::check_in))
            .route("/check-out", web::post().to(attendance::check_out))
            .route("/today", web::get().to(attendance::get_today))
            .route("/summary", web::get().to(attendance::get_summary))
            .route("/office-check", web::get().to(attendance::office_check))
            .route("/{id}", web::get().to(attendance::get_record)),
    );
}

use crate::handlers::approvals;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/approvals")
            .route("/pending", web::get().to(approvals::get_pending))
            .route("/{id}/approve", web::post().to(approvals::approve))
            .route("/{id}/reject", web::post().to(approvals::reject)),
    );
}

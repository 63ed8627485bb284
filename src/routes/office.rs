use crate::handlers::office;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/office-location", web::get().to(office::get_office_location))
            .route("/office-location", web::put().to(office::update_office_location)),
    );
}

use actix_web::web;

pub mod approvals;
pub mod attendance;
pub mod office;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(attendance::configure)
            .configure(approvals::configure)
            .configure(office::configure),
    );
}

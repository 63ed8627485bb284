use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use attendance::database::{
    init_database,
    repositories::{AttendanceRepository, OfficeLocationRepository, TeamDirectoryRepository},
};
use attendance::{AppState, Config, routes};

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter()),
    )
    .init();

    log::info!(
        "Starting attendance API (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;

    let app_state = AppState::build(
        &config,
        Arc::new(AttendanceRepository::new(pool.clone())),
        Arc::new(OfficeLocationRepository::new(pool.clone())),
        Arc::new(TeamDirectoryRepository::new(pool)),
    )
    .await?;
    let office = app_state.office.get();
    log::info!(
        "Office at ({}, {}) with a {}m check-in radius",
        office.latitude,
        office.longitude,
        office.allowed_radius_meters
    );

    let app_state = web::Data::new(app_state);
    let config_data = web::Data::new(config.clone());
    let server_address = config.server_address();
    let client_base_url = config.client_base_url.clone();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::new(r#"%a "%r" %s %b "%{User-Agent}i" %T"#))
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

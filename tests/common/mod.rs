#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use attendance::config::Config;
use attendance::database::models::{Coordinates, Role};
use attendance::database::repositories::{
    InMemoryAttendanceStore, InMemoryOfficeLocationStore, InMemoryTeamDirectory,
};
use attendance::services::{Actor, Claims};
use attendance::{AppState, routes};

pub const OFFICE_LATITUDE: f64 = 47.916646;
pub const OFFICE_LONGITUDE: f64 = 106.908877;

/// Services wired over in-memory stores, with the stores kept at hand so
/// tests can seed and inspect them.
pub struct TestContext {
    pub config: Config,
    pub state: AppState,
    pub records: Arc<InMemoryAttendanceStore>,
    pub office_store: Arc<InMemoryOfficeLocationStore>,
    pub directory: Arc<InMemoryTeamDirectory>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(Config::test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let records = Arc::new(InMemoryAttendanceStore::new());
        let office_store = Arc::new(InMemoryOfficeLocationStore::new());
        let directory = Arc::new(InMemoryTeamDirectory::new());

        let state = AppState::build(
            &config,
            records.clone(),
            office_store.clone(),
            directory.clone(),
        )
        .await
        .expect("Failed to build app state");

        Self {
            config,
            state,
            records,
            office_store,
            directory,
        }
    }

    /// A manager with the given workers in scope.
    pub fn manager_of(&self, workers: &[Uuid]) -> Actor {
        let manager = Actor::new(Uuid::new_v4(), Role::Manager);
        for worker in workers {
            self.directory.assign(manager.user_id, *worker);
        }
        manager
    }

    pub fn token(&self, user_id: Uuid, role: Role) -> String {
        Claims::issue(user_id, role, &self.config).expect("Failed to issue token")
    }

    pub fn bearer(&self, user_id: Uuid, role: Role) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.token(user_id, role)),
        )
    }
}

pub fn office() -> Coordinates {
    Coordinates::new(OFFICE_LATITUDE, OFFICE_LONGITUDE).expect("valid office point")
}

/// A point roughly `meters` due north of the office.
pub fn north_of_office(meters: f64) -> Coordinates {
    // One degree of latitude is ~111,195 m on a 6,371 km sphere
    Coordinates::new(OFFICE_LATITUDE + meters / 111_194.93, OFFICE_LONGITUDE)
        .expect("valid point")
}

/// 2025-03-03 is a Monday; test configs run on UTC office time.
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
}

pub async fn call(
    ctx: &TestContext,
    req: test::TestRequest,
) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.config.clone()))
            .app_data(web::Data::new(ctx.state.clone()))
            .configure(routes::configure),
    )
    .await;

    test::call_service(&app, req.to_request()).await
}

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Result;

pub use config::Config;
use database::store::{AttendanceStore, OfficeLocationStore, TeamDirectory};
pub use services::{ApprovalWorkflow, AttendanceService, OfficeLocationService, RadiusPolicy};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub attendance: AttendanceService,
    pub approvals: ApprovalWorkflow,
    pub office: Arc<OfficeLocationService>,
}

impl AppState {
    /// Wire the services over the given collaborators. The office location
    /// comes from the store when one was saved, otherwise from `config`.
    pub async fn build(
        config: &Config,
        attendance_store: Arc<dyn AttendanceStore>,
        office_store: Arc<dyn OfficeLocationStore>,
        directory: Arc<dyn TeamDirectory>,
    ) -> Result<Self> {
        let office = Arc::new(
            OfficeLocationService::load(office_store, config.default_office_location()).await?,
        );
        let radius = RadiusPolicy::new(office.clone());
        let attendance = AttendanceService::new(
            attendance_store.clone(),
            directory.clone(),
            radius,
            config.attendance_policy()?,
        );
        let approvals = ApprovalWorkflow::new(attendance_store, directory);

        Ok(Self {
            attendance,
            approvals,
            office,
        })
    }
}

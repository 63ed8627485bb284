use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::database::models::{OfficeLocation, OfficeLocationSnapshot};
use crate::database::store::OfficeLocationStore;
use crate::error::{AttendanceError, AttendanceResult};
use crate::services::auth::Actor;

/// Holds the office point every radius check reads.
///
/// Readers clone an `Arc` out of the lock, so they always see one whole
/// snapshot. Writers are serialised and only swap the snapshot after the
/// store has accepted it.
pub struct OfficeLocationService {
    current: RwLock<Arc<OfficeLocation>>,
    store: Arc<dyn OfficeLocationStore>,
    write_guard: Mutex<()>,
}

impl OfficeLocationService {
    pub fn new(store: Arc<dyn OfficeLocationStore>, initial: OfficeLocation) -> AttendanceResult<Self> {
        initial.validate()?;

        Ok(Self {
            current: RwLock::new(Arc::new(initial)),
            store,
            write_guard: Mutex::new(()),
        })
    }

    /// Start from the persisted configuration, or from `fallback` when none
    /// has been stored yet.
    pub async fn load(
        store: Arc<dyn OfficeLocationStore>,
        fallback: OfficeLocation,
    ) -> AttendanceResult<Self> {
        let initial = match store.load().await? {
            Some(snapshot) if snapshot.location.validate().is_ok() => snapshot.location,
            Some(snapshot) => {
                log::warn!(
                    "Stored office location {:?} is invalid, using configured default",
                    snapshot.location
                );
                fallback
            }
            None => fallback,
        };

        Self::new(store, initial)
    }

    pub fn get(&self) -> Arc<OfficeLocation> {
        self.current.read().clone()
    }

    /// Replace the office configuration. Admin only; past attendance records
    /// keep the radius they were evaluated against.
    pub async fn set(
        &self,
        actor: &Actor,
        location: OfficeLocation,
        now: DateTime<Utc>,
    ) -> AttendanceResult<OfficeLocationSnapshot> {
        if !actor.is_admin() {
            return Err(AttendanceError::Unauthorized(
                "only admins may change the office location".to_string(),
            ));
        }
        location.validate()?;

        let _guard = self.write_guard.lock().await;
        let snapshot = self.store.save(&location, actor.user_id, now).await?;
        *self.current.write() = Arc::new(snapshot.location.clone());

        log::info!(
            "Office location updated by {}: ({}, {}) radius {}m",
            actor.user_id,
            snapshot.location.latitude,
            snapshot.location.longitude,
            snapshot.location.allowed_radius_meters
        );

        Ok(snapshot)
    }
}

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::TeamDirectory;
use crate::error::AttendanceResult;

/// Reads manager → worker assignments from `manager_assignments`.
#[derive(Clone)]
pub struct TeamDirectoryRepository {
    pool: PgPool,
}

impl TeamDirectoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamDirectory for TeamDirectoryRepository {
    async fn workers_managed_by(&self, manager_id: Uuid) -> AttendanceResult<HashSet<Uuid>> {
        let workers: Vec<Uuid> = sqlx::query_scalar(
            "SELECT worker_id FROM manager_assignments WHERE manager_id = $1",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(workers.into_iter().collect())
    }
}

//! Database liveness probe.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::HealthCheck;
use crate::error::AppError;

/// Pings PostgreSQL with `SELECT 1`.
pub struct PgHealthCheck {
    pool: Arc<PgPool>,
}

impl PgHealthCheck {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

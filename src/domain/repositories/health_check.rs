//! Storage liveness probe.

use crate::error::AppError;
use async_trait::async_trait;

/// Checks that the backing store answers queries.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

//! Confirmation key delivery through the application log.

use async_trait::async_trait;

use crate::domain::auth::ConfirmationSender;
use crate::domain::entities::User;
use crate::error::AppError;

/// [`ConfirmationSender`] that writes the key to the log instead of mailing it.
///
/// Suitable for development and for deployments where an operator relays
/// keys by hand.
#[derive(Debug, Default, Clone)]
pub struct LogConfirmationSender;

#[async_trait]
impl ConfirmationSender for LogConfirmationSender {
    async fn send(&self, user: &User, confirmation_key: &str) -> Result<(), AppError> {
        tracing::info!(
            user_id = user.id,
            email = %user.email,
            confirmation_key,
            "Confirmation key issued"
        );
        Ok(())
    }
}

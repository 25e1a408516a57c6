//! Account resolution for token requests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::auth::{IdentifierField, RequestContext, UserLookup};
use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// [`UserLookup`] that queries the user repository by the configured field.
pub struct RepositoryUserLookup {
    users: Arc<dyn UserRepository>,
}

impl RepositoryUserLookup {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserLookup for RepositoryUserLookup {
    async fn lookup(
        &self,
        field: IdentifierField,
        identifier: &str,
        _context: &RequestContext,
    ) -> Result<Option<User>, AppError> {
        match field {
            IdentifierField::Email => self.users.find_by_email(identifier).await,
            IdentifierField::Username => self.users.find_by_username(identifier).await,
        }
    }
}

//! Account administration and self-service profile editing.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewUser, Role, User, UserChanges};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::confirmation_key;

/// Profile fields supplied when an administrator creates an account.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

/// Service for managing user accounts.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    confirmation_key_length: usize,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, confirmation_key_length: usize) -> Self {
        Self {
            repository,
            confirmation_key_length,
        }
    }

    /// Lists accounts, optionally filtered by a username substring.
    pub async fn list_users(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64), AppError> {
        self.repository.list(search, offset, limit).await
    }

    /// Retrieves an account by username.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such account exists.
    pub async fn get_user(&self, username: &str) -> Result<User, AppError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({"username": username})))
    }

    /// Creates an account with a fresh confirmation key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username is reserved or the
    /// username or email is already taken.
    pub async fn create_user(&self, draft: UserDraft) -> Result<User, AppError> {
        validate_username(&draft.username)?;
        self.ensure_username_free(&draft.username, None).await?;
        self.ensure_email_free(&draft.email, None).await?;

        let user = self
            .repository
            .create(NewUser {
                username: draft.username,
                email: draft.email,
                first_name: draft.first_name,
                last_name: draft.last_name,
                bio: draft.bio,
                role: draft.role,
                confirmation_key: confirmation_key::generate(self.confirmation_key_length),
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Applies an administrator's partial update to an account.
    pub async fn update_user(&self, username: &str, changes: UserChanges) -> Result<User, AppError> {
        let user = self.get_user(username).await?;
        self.apply_changes(&user, changes).await
    }

    /// Applies a user's edit of their own profile.
    ///
    /// The role cannot be changed this way; a supplied role is ignored.
    pub async fn update_own_profile(
        &self,
        user: &User,
        mut changes: UserChanges,
    ) -> Result<User, AppError> {
        changes.role = None;
        self.apply_changes(user, changes).await
    }

    /// Deletes an account by username.
    pub async fn delete_user(&self, username: &str) -> Result<(), AppError> {
        let user = self.get_user(username).await?;
        self.repository.delete(user.id).await?;
        tracing::info!(user_id = user.id, "User deleted");
        Ok(())
    }

    async fn apply_changes(&self, user: &User, changes: UserChanges) -> Result<User, AppError> {
        if let Some(username) = &changes.username {
            validate_username(username)?;
            self.ensure_username_free(username, Some(user.id)).await?;
        }
        if let Some(email) = &changes.email {
            self.ensure_email_free(email, Some(user.id)).await?;
        }

        self.repository.update(user.id, changes).await
    }

    async fn ensure_username_free(&self, username: &str, owner: Option<i64>) -> Result<(), AppError> {
        match self.repository.find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::field(
                "username",
                "A user with that username already exists.",
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> Result<(), AppError> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::field(
                "email",
                "A user with that email already exists.",
            )),
            _ => Ok(()),
        }
    }
}

/// `me` addresses the caller's own profile and cannot be a username.
fn validate_username(username: &str) -> Result<(), AppError> {
    if username.eq_ignore_ascii_case("me") {
        return Err(AppError::field("username", "Username 'me' is reserved."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;

    fn user(id: i64, username: &str, role: Role) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
            confirmation_key: "KEY".to_string(),
            password_hash: None,
            created_at: Utc::now(),
        }
    }

    fn draft(username: &str) -> UserDraft {
        UserDraft {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            bio: String::new(),
            role: Role::Moderator,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_user| new_user.role == Role::Moderator && !new_user.confirmation_key.is_empty())
            .times(1)
            .returning(|_| Ok(user(3, "mod", Role::Moderator)));

        let service = UserService::new(Arc::new(repo), 12);
        let created = service.create_user(draft("mod")).await.unwrap();

        assert_eq!(created.role, Role::Moderator);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(user(1, "taken", Role::User))));
        repo.expect_create().times(0);

        let service = UserService::new(Arc::new(repo), 12);
        let err = service.create_user(draft("taken")).await.unwrap_err();

        assert_eq!(
            err.to_error_info().details,
            json!({"username": ["A user with that username already exists."]})
        );
    }

    #[tokio::test]
    async fn test_create_user_reserved_username() {
        let service = UserService::new(Arc::new(MockUserRepository::new()), 12);
        let err = service.create_user(draft("me")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo), 12);
        let err = service.get_user("ghost").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_own_profile_update_cannot_change_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(|id, changes| *id == 5 && changes.role.is_none() && changes.bio.as_deref() == Some("hi"))
            .times(1)
            .returning(|_, _| Ok(user(5, "alice", Role::User)));

        let service = UserService::new(Arc::new(repo), 12);
        let changes = UserChanges {
            bio: Some("hi".to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        };

        let updated = service
            .update_own_profile(&user(5, "alice", Role::User), changes)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::User);
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_allowed() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(user(5, "alice", Role::User))));
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user(5, "alice", Role::User))));
        repo.expect_update()
            .times(1)
            .returning(|_, _| Ok(user(5, "alice", Role::User)));

        let service = UserService::new(Arc::new(repo), 12);
        let changes = UserChanges {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };

        assert!(service.update_user("alice", changes).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(user(9, "bob", Role::User))));
        repo.expect_delete()
            .withf(|id| *id == 9)
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repo), 12);
        assert!(service.delete_user("bob").await.is_ok());
    }
}

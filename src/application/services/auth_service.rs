//! Authentication service: confirmation-key signup, token issuance and bearer checks.

use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::domain::auth::{
    AccessToken, ConfirmationSender, IdentifierField, LoginMode, RequestContext, TokenIssuer,
    UserLookup,
};
use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::{confirmation_key, password};

/// Error payload returned when a confirmation key does not match.
pub const INVALID_CONFIRMATION_CODE: &str = "confirmation_code is not valid";

/// Error payload returned when a password does not match.
pub const INVALID_PASSWORD: &str = "password is not valid";

const REQUIRED: &str = "This field is required.";

/// Static settings of the token flow.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub identifier_field: IdentifierField,
    pub login_mode: LoginMode,
    pub confirmation_key_length: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            identifier_field: IdentifierField::Email,
            login_mode: LoginMode::Passwordless,
            confirmation_key_length: 12,
        }
    }
}

/// Proof of account ownership carried by a token request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    ConfirmationKey(String),
    Password(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::ConfirmationKey(_) => f.write_str("ConfirmationKey(***)"),
            Credential::Password(_) => f.write_str("Password(***)"),
        }
    }
}

/// A validated token request.
///
/// Built once from the raw payload; the identifier key and the required
/// credential field depend on the configured [`IdentifierField`] and
/// [`LoginMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub identifier: String,
    pub credential: Credential,
}

impl TokenRequest {
    /// Extracts the identifier and credential from a JSON object.
    ///
    /// In [`LoginMode::Passwordless`] the `confirmation_key` field is required and
    /// any `password` is ignored. In [`LoginMode::Password`] the `password` field
    /// is required instead.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming every missing or blank field.
    pub fn from_payload(
        payload: &Map<String, Value>,
        field: IdentifierField,
        mode: LoginMode,
    ) -> Result<Self, AppError> {
        let credential_key = match mode {
            LoginMode::Passwordless => "confirmation_key",
            LoginMode::Password => "password",
        };

        let identifier = non_blank_str(payload, field.key());
        let secret = non_blank_str(payload, credential_key);

        match (identifier, secret) {
            (Some(identifier), Some(secret)) => {
                let credential = match mode {
                    LoginMode::Passwordless => Credential::ConfirmationKey(secret),
                    LoginMode::Password => Credential::Password(secret),
                };
                Ok(Self {
                    identifier,
                    credential,
                })
            }
            (identifier, secret) => {
                let mut details = Map::new();
                if identifier.is_none() {
                    details.insert(field.key().to_string(), json!([REQUIRED]));
                }
                if secret.is_none() {
                    details.insert(credential_key.to_string(), json!([REQUIRED]));
                }
                Err(AppError::bad_request(
                    "Invalid token request",
                    Value::Object(details),
                ))
            }
        }
    }
}

fn non_blank_str(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Result of a token request.
///
/// A rejected request is an ordinary outcome, not an error: the caller receives
/// a fixed message and no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Issued(AccessToken),
    Rejected(&'static str),
}

/// Service for account confirmation and access-token issuance.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    lookup: Arc<dyn UserLookup>,
    issuer: Arc<dyn TokenIssuer>,
    sender: Arc<dyn ConfirmationSender>,
    settings: AuthSettings,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - account storage, used by signup and bearer authentication
    /// - `lookup` - resolves the account named in a token request
    /// - `issuer` - signs and verifies access tokens
    /// - `sender` - delivers confirmation keys out of band
    /// - `settings` - identifier field, login mode and key length
    pub fn new(
        users: Arc<dyn UserRepository>,
        lookup: Arc<dyn UserLookup>,
        issuer: Arc<dyn TokenIssuer>,
        sender: Arc<dyn ConfirmationSender>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            lookup,
            issuer,
            sender,
            settings,
        }
    }

    pub fn settings(&self) -> AuthSettings {
        self.settings
    }

    /// Parses a raw token request using the configured identifier field and mode.
    pub fn parse_token_request(&self, payload: &Map<String, Value>) -> Result<TokenRequest, AppError> {
        TokenRequest::from_payload(
            payload,
            self.settings.identifier_field,
            self.settings.login_mode,
        )
    }

    /// Exchanges an identifier and credential for an access token.
    ///
    /// # Flow
    ///
    /// 1. Resolve the account through the injected [`UserLookup`]
    /// 2. Compare the credential (constant-time for confirmation keys)
    /// 3. Issue a token through the injected [`TokenIssuer`]
    ///
    /// An unknown account and a wrong credential produce the same
    /// [`TokenOutcome::Rejected`] value, and nothing is written either way.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on lookup, hashing or signing failures.
    pub async fn obtain_token(
        &self,
        request: &TokenRequest,
        context: &RequestContext,
    ) -> Result<TokenOutcome, AppError> {
        let rejection = match request.credential {
            Credential::ConfirmationKey(_) => INVALID_CONFIRMATION_CODE,
            Credential::Password(_) => INVALID_PASSWORD,
        };

        let user = self
            .lookup
            .lookup(self.settings.identifier_field, &request.identifier, context)
            .await?;

        let Some(user) = user else {
            tracing::info!(
                client = context.client_addr.as_deref().unwrap_or("-"),
                "Token request for unknown account"
            );
            return Ok(TokenOutcome::Rejected(rejection));
        };

        if !self.credential_matches(&user, &request.credential)? {
            tracing::warn!(
                user_id = user.id,
                client = context.client_addr.as_deref().unwrap_or("-"),
                "Token request rejected"
            );
            return Ok(TokenOutcome::Rejected(rejection));
        }

        let token = self.issuer.issue(&user)?;
        tracing::info!(user_id = user.id, "Access token issued");

        Ok(TokenOutcome::Issued(token))
    }

    fn credential_matches(&self, user: &User, credential: &Credential) -> Result<bool, AppError> {
        match credential {
            Credential::ConfirmationKey(key) => {
                Ok(confirmation_key::keys_match(&user.confirmation_key, key))
            }
            Credential::Password(plain) => match &user.password_hash {
                Some(hash) => password::verify_password(plain, hash).map_err(|e| {
                    tracing::error!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                    AppError::internal("Password verification failed", json!({}))
                }),
                None => Ok(false),
            },
        }
    }

    /// Registers an account (or re-confirms an existing one) and sends it a new
    /// confirmation key.
    ///
    /// If both `username` and `email` belong to the same account, its key is
    /// rotated. If only one of them is taken, the request is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username or email belongs to
    /// another account, or if the username is reserved.
    pub async fn signup(&self, username: &str, email: &str) -> Result<User, AppError> {
        if username.eq_ignore_ascii_case("me") {
            return Err(AppError::field("username", "Username 'me' is reserved."));
        }

        let by_username = self.users.find_by_username(username).await?;
        let by_email = self.users.find_by_email(email).await?;
        let key = confirmation_key::generate(self.settings.confirmation_key_length);

        let user = match (by_username, by_email) {
            (Some(existing), Some(same)) if existing.id == same.id => {
                self.users.set_confirmation_key(existing.id, &key).await?;
                existing
            }
            (Some(_), _) => {
                return Err(AppError::field(
                    "username",
                    "A user with that username already exists.",
                ));
            }
            (None, Some(_)) => {
                return Err(AppError::field(
                    "email",
                    "A user with that email already exists.",
                ));
            }
            (None, None) => {
                let created = self
                    .users
                    .create(NewUser {
                        username: username.to_string(),
                        email: email.to_string(),
                        first_name: String::new(),
                        last_name: String::new(),
                        bio: String::new(),
                        role: Role::User,
                        confirmation_key: key.clone(),
                    })
                    .await?;
                tracing::info!(user_id = created.id, "Account registered");
                created
            }
        };

        self.sender.send(&user, &key).await?;

        Ok(user)
    }

    /// Resolves the account behind a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid or expired, or
    /// if its account no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.issuer.verify(token)?;

        self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Account no longer exists"}),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{MockConfirmationSender, MockTokenIssuer, MockUserLookup, TokenClaims};
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: Role::User,
            confirmation_key: "XQ9".to_string(),
            password_hash: None,
            created_at: Utc::now(),
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn service(
        users: MockUserRepository,
        lookup: MockUserLookup,
        issuer: MockTokenIssuer,
        sender: MockConfirmationSender,
    ) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(lookup),
            Arc::new(issuer),
            Arc::new(sender),
            AuthSettings::default(),
        )
    }

    fn lookup_returning(user: Option<User>) -> MockUserLookup {
        let mut lookup = MockUserLookup::new();
        lookup
            .expect_lookup()
            .withf(|field, identifier, _| {
                *field == IdentifierField::Email && identifier == "alice@x.com"
            })
            .times(1)
            .returning(move |_, _, _| Ok(user.clone()));
        lookup
    }

    #[test]
    fn test_passwordless_request_ignores_password() {
        let request = TokenRequest::from_payload(
            &payload(json!({"email": "alice@x.com", "confirmation_key": "XQ9"})),
            IdentifierField::Email,
            LoginMode::Passwordless,
        )
        .unwrap();

        assert_eq!(request.identifier, "alice@x.com");
        assert_eq!(request.credential, Credential::ConfirmationKey("XQ9".to_string()));
    }

    #[test]
    fn test_missing_confirmation_key_is_rejected_at_construction() {
        let err = TokenRequest::from_payload(
            &payload(json!({"email": "alice@x.com", "password": "ignored"})),
            IdentifierField::Email,
            LoginMode::Passwordless,
        )
        .unwrap_err();

        let info = err.to_error_info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details, json!({"confirmation_key": [REQUIRED]}));
    }

    #[test]
    fn test_identifier_field_is_configurable() {
        let request = TokenRequest::from_payload(
            &payload(json!({"username": "alice", "confirmation_key": "XQ9"})),
            IdentifierField::Username,
            LoginMode::Passwordless,
        )
        .unwrap();
        assert_eq!(request.identifier, "alice");

        let err = TokenRequest::from_payload(
            &payload(json!({"email": "alice@x.com", "confirmation_key": "XQ9"})),
            IdentifierField::Username,
            LoginMode::Passwordless,
        )
        .unwrap_err();
        assert_eq!(err.to_error_info().details, json!({"username": [REQUIRED]}));
    }

    #[test]
    fn test_password_mode_requires_password() {
        let err = TokenRequest::from_payload(
            &payload(json!({"email": "alice@x.com", "confirmation_key": "XQ9"})),
            IdentifierField::Email,
            LoginMode::Password,
        )
        .unwrap_err();
        assert_eq!(err.to_error_info().details, json!({"password": [REQUIRED]}));
    }

    #[tokio::test]
    async fn test_matching_key_issues_token() {
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .withf(|user| user.id == 1)
            .times(1)
            .returning(|_| Ok(AccessToken::new("signed.jwt.token")));

        let service = service(
            MockUserRepository::new(),
            lookup_returning(Some(alice())),
            issuer,
            MockConfirmationSender::new(),
        );

        let request = TokenRequest {
            identifier: "alice@x.com".to_string(),
            credential: Credential::ConfirmationKey("XQ9".to_string()),
        };

        let outcome = service
            .obtain_token(&request, &RequestContext::default())
            .await
            .unwrap();

        assert_eq!(outcome, TokenOutcome::Issued(AccessToken::new("signed.jwt.token")));
    }

    #[tokio::test]
    async fn test_wrong_key_is_rejected_without_token() {
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_issue().times(0);

        let service = service(
            MockUserRepository::new(),
            lookup_returning(Some(alice())),
            issuer,
            MockConfirmationSender::new(),
        );

        let request = TokenRequest {
            identifier: "alice@x.com".to_string(),
            credential: Credential::ConfirmationKey("WRONG".to_string()),
        };

        let outcome = service
            .obtain_token(&request, &RequestContext::default())
            .await
            .unwrap();

        assert_eq!(outcome, TokenOutcome::Rejected(INVALID_CONFIRMATION_CODE));
    }

    #[tokio::test]
    async fn test_unknown_account_gets_same_rejection() {
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_issue().times(0);

        let service = service(
            MockUserRepository::new(),
            lookup_returning(None),
            issuer,
            MockConfirmationSender::new(),
        );

        let request = TokenRequest {
            identifier: "alice@x.com".to_string(),
            credential: Credential::ConfirmationKey("XQ9".to_string()),
        };

        let outcome = service
            .obtain_token(&request, &RequestContext::default())
            .await
            .unwrap();

        assert_eq!(outcome, TokenOutcome::Rejected(INVALID_CONFIRMATION_CODE));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unknown_account_is_logged_once() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        let users: Arc<dyn UserRepository> = Arc::new(users);

        let service = AuthService::new(
            users.clone(),
            Arc::new(crate::infrastructure::auth::RepositoryUserLookup::new(users)),
            Arc::new(MockTokenIssuer::new()),
            Arc::new(MockConfirmationSender::new()),
            AuthSettings::default(),
        );
        let request = TokenRequest {
            identifier: "ghost@x.com".to_string(),
            credential: Credential::ConfirmationKey("XQ9".to_string()),
        };

        service
            .obtain_token(&request, &RequestContext::default())
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("Token request for unknown account").count(), 1);
    }

    #[tokio::test]
    async fn test_password_login_verifies_hash() {
        let mut user = alice();
        user.password_hash = Some(password::hash_password("s3cret-pass").unwrap());

        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .times(1)
            .returning(|_| Ok(AccessToken::new("t")));

        let service = service(
            MockUserRepository::new(),
            lookup_returning(Some(user)),
            issuer,
            MockConfirmationSender::new(),
        );

        let request = TokenRequest {
            identifier: "alice@x.com".to_string(),
            credential: Credential::Password("s3cret-pass".to_string()),
        };

        let outcome = service
            .obtain_token(&request, &RequestContext::default())
            .await
            .unwrap();
        assert!(matches!(outcome, TokenOutcome::Issued(_)));
    }

    #[tokio::test]
    async fn test_password_login_without_hash_is_rejected() {
        let service = service(
            MockUserRepository::new(),
            lookup_returning(Some(alice())),
            MockTokenIssuer::new(),
            MockConfirmationSender::new(),
        );

        let request = TokenRequest {
            identifier: "alice@x.com".to_string(),
            credential: Credential::Password("anything".to_string()),
        };

        let outcome = service
            .obtain_token(&request, &RequestContext::default())
            .await
            .unwrap();
        assert_eq!(outcome, TokenOutcome::Rejected(INVALID_PASSWORD));
    }

    #[tokio::test]
    async fn test_signup_creates_account_and_sends_key() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(1).returning(|_| Ok(None));
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|new_user| {
                new_user.username == "alice"
                    && new_user.role == Role::User
                    && new_user.confirmation_key.len() == 12
            })
            .times(1)
            .returning(|_| Ok(alice()));

        let mut sender = MockConfirmationSender::new();
        sender
            .expect_send()
            .withf(|user, key| user.id == 1 && key.len() == 12)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(users, MockUserLookup::new(), MockTokenIssuer::new(), sender);

        let user = service.signup("alice", "alice@x.com").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_signup_existing_account_rotates_key() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(alice())));
        users.expect_find_by_email().returning(|_| Ok(Some(alice())));
        users
            .expect_set_confirmation_key()
            .withf(|id, key| *id == 1 && key != "XQ9")
            .times(1)
            .returning(|_, _| Ok(()));
        users.expect_create().times(0);

        let mut sender = MockConfirmationSender::new();
        sender.expect_send().times(1).returning(|_, _| Ok(()));

        let service = service(users, MockUserLookup::new(), MockTokenIssuer::new(), sender);

        assert!(service.signup("alice", "alice@x.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_signup_email_owned_by_other_account() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_find_by_email().returning(|_| Ok(Some(alice())));

        let mut sender = MockConfirmationSender::new();
        sender.expect_send().times(0);

        let service = service(users, MockUserLookup::new(), MockTokenIssuer::new(), sender);

        let err = service.signup("bob", "alice@x.com").await.unwrap_err();
        assert_eq!(
            err.to_error_info().details,
            json!({"email": ["A user with that email already exists."]})
        );
    }

    #[tokio::test]
    async fn test_signup_rejects_reserved_username() {
        let service = service(
            MockUserRepository::new(),
            MockUserLookup::new(),
            MockTokenIssuer::new(),
            MockConfirmationSender::new(),
        );

        let err = service.signup("me", "me@x.com").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_token_subject() {
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_verify().times(1).returning(|_| {
            Ok(TokenClaims {
                sub: 1,
                username: "alice".to_string(),
                role: Role::User,
                iat: 0,
                exp: i64::MAX,
                jti: "j".to_string(),
            })
        });

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(Some(alice())));

        let service = service(users, MockUserLookup::new(), issuer, MockConfirmationSender::new());

        let user = service.authenticate("token").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_deleted_account() {
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_verify().returning(|_| {
            Ok(TokenClaims {
                sub: 42,
                username: "gone".to_string(),
                role: Role::User,
                iat: 0,
                exp: i64::MAX,
                jti: "j".to_string(),
            })
        });

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = service(users, MockUserLookup::new(), issuer, MockConfirmationSender::new());

        let err = service.authenticate("token").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }
}

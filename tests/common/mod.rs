#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use catalog_api::api;
use catalog_api::api::handlers::health_handler;
use catalog_api::application::services::AuthSettings;
use catalog_api::domain::auth::{ConfirmationSender, TokenIssuer};
use catalog_api::domain::entities::{NewReview, NewTitle, NewUser, Review, Role, Title, User};
use catalog_api::domain::repositories::{ReviewRepository, TitleRepository, UserRepository};
use catalog_api::error::AppError;
use catalog_api::infrastructure::auth::{JwtConfig, JwtTokenIssuer, RepositoryUserLookup};
use catalog_api::infrastructure::persistence::{
    PgCategoryRepository, PgCommentRepository, PgGenreRepository, PgHealthCheck,
    PgReviewRepository, PgTitleRepository, PgUserRepository,
};
use catalog_api::state::{AppState, AuthCapabilities, Repositories};
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const SEEDED_KEY: &str = "SEEDEDKEY123";

// ─── AUTH DOUBLES ────────────────────────────────────────────────────────────

/// Captures delivered confirmation keys instead of sending them.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    /// The most recent key delivered to `username`.
    pub fn last_key_for(&self, username: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(u, _)| u == username)
            .map(|(_, key)| key.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationSender for RecordingSender {
    async fn send(&self, user: &User, confirmation_key: &str) -> Result<(), AppError> {
        self.sent
            .lock()
            .unwrap()
            .push((user.username.clone(), confirmation_key.to_string()));
        Ok(())
    }
}

// ─── STATE ───────────────────────────────────────────────────────────────────

pub fn test_issuer() -> Arc<JwtTokenIssuer> {
    Arc::new(JwtTokenIssuer::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_ttl_minutes: 60,
    }))
}

pub fn create_test_state(
    pool: PgPool,
    settings: AuthSettings,
    sender: Arc<RecordingSender>,
    issuer: Arc<JwtTokenIssuer>,
) -> AppState {
    let pool = Arc::new(pool);

    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let repos = Repositories {
        users: users.clone(),
        categories: Arc::new(PgCategoryRepository::new(pool.clone())),
        genres: Arc::new(PgGenreRepository::new(pool.clone())),
        titles: Arc::new(PgTitleRepository::new(pool.clone())),
        reviews: Arc::new(PgReviewRepository::new(pool.clone())),
        comments: Arc::new(PgCommentRepository::new(pool.clone())),
        health: Arc::new(PgHealthCheck::new(pool)),
    };
    let auth = AuthCapabilities {
        lookup: Arc::new(RepositoryUserLookup::new(users)),
        issuer,
        sender,
        settings,
    };

    AppState::new(repos, auth, false)
}

// ─── FIXTURES ────────────────────────────────────────────────────────────────

pub async fn create_test_user(pool: &PgPool, username: &str, role: Role) -> User {
    PgUserRepository::new(Arc::new(pool.clone()))
        .create(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
            confirmation_key: SEEDED_KEY.to_string(),
        })
        .await
        .unwrap()
}

pub async fn create_test_title(pool: &PgPool, name: &str) -> Title {
    PgTitleRepository::new(Arc::new(pool.clone()))
        .create(NewTitle {
            name: name.to_string(),
            year: 1995,
            description: None,
            category_id: None,
            genre_ids: vec![],
        })
        .await
        .unwrap()
}

pub async fn create_test_review(pool: &PgPool, title_id: i64, author_id: i64, score: i32) -> Review {
    PgReviewRepository::new(Arc::new(pool.clone()))
        .create(NewReview {
            title_id,
            author_id,
            text: "Worth watching".to_string(),
            score,
        })
        .await
        .unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ─── TEST APP ────────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub pool: PgPool,
    pub sender: Arc<RecordingSender>,
    pub issuer: Arc<JwtTokenIssuer>,
}

impl TestApp {
    pub fn users(&self) -> PgUserRepository {
        PgUserRepository::new(Arc::new(self.pool.clone()))
    }

    pub async fn insert_user(&self, username: &str, role: Role) -> User {
        create_test_user(&self.pool, username, role).await
    }

    pub async fn user(&self, username: &str) -> Option<User> {
        self.users().find_by_username(username).await.unwrap()
    }

    /// Seeds an account and returns it with a valid bearer token.
    pub async fn user_with_token(&self, username: &str, role: Role) -> (User, String) {
        let user = self.insert_user(username, role).await;
        let token = self.issuer.issue(&user).unwrap().into_string();
        (user, token)
    }

    /// Token for the `admin` account, seeding it on first use.
    pub async fn admin_token(&self) -> String {
        let admin = match self.user("admin").await {
            Some(admin) => admin,
            None => self.insert_user("admin", Role::Admin).await,
        };
        self.issuer.issue(&admin).unwrap().into_string()
    }

    pub async fn count(&self, table: &str) -> i64 {
        count_rows(&self.pool, table).await
    }
}

pub fn spawn_app(pool: PgPool) -> TestApp {
    spawn_app_with(pool, AuthSettings::default())
}

pub fn spawn_app_with(pool: PgPool, settings: AuthSettings) -> TestApp {
    let sender = Arc::new(RecordingSender::default());
    let issuer = test_issuer();
    let state = create_test_state(pool.clone(), settings, sender.clone(), issuer.clone());

    let app = Router::new()
        .nest("/api/v1", api::routes::router())
        .route("/health", get(health_handler))
        .with_state(state);

    TestApp {
        server: TestServer::new(app).unwrap(),
        pool,
        sender,
        issuer,
    }
}

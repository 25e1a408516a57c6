//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AuthService, AuthSettings, CategoryService, CommentService, GenreService, ReviewService,
    TitleService, UserService,
};
use crate::domain::auth::{ConfirmationSender, TokenIssuer, UserLookup};
use crate::domain::repositories::{
    CategoryRepository, CommentRepository, GenreRepository, HealthCheck, ReviewRepository,
    TitleRepository, UserRepository,
};

/// Services shared across request handlers. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub category_service: Arc<CategoryService>,
    pub genre_service: Arc<GenreService>,
    pub title_service: Arc<TitleService>,
    pub review_service: Arc<ReviewService>,
    pub comment_service: Arc<CommentService>,
    pub health: Arc<dyn HealthCheck>,
    /// Trust `X-Forwarded-For` when deriving the client address.
    pub behind_proxy: bool,
}

/// Storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub genres: Arc<dyn GenreRepository>,
    pub titles: Arc<dyn TitleRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub health: Arc<dyn HealthCheck>,
}

/// Authentication capabilities handed to [`AuthService`].
#[derive(Clone)]
pub struct AuthCapabilities {
    pub lookup: Arc<dyn UserLookup>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub sender: Arc<dyn ConfirmationSender>,
    pub settings: AuthSettings,
}

impl AppState {
    /// Wires every service from its repositories and auth capabilities.
    pub fn new(repos: Repositories, auth: AuthCapabilities, behind_proxy: bool) -> Self {
        let auth_service = AuthService::new(
            repos.users.clone(),
            auth.lookup,
            auth.issuer,
            auth.sender,
            auth.settings,
        );
        let user_service =
            UserService::new(repos.users.clone(), auth.settings.confirmation_key_length);
        let category_service = CategoryService::new(repos.categories.clone());
        let genre_service = GenreService::new(repos.genres.clone());
        let title_service = TitleService::new(
            repos.titles.clone(),
            repos.categories.clone(),
            repos.genres.clone(),
        );
        let review_service = ReviewService::new(repos.reviews.clone(), repos.titles.clone());
        let comment_service = CommentService::new(repos.comments.clone(), repos.reviews.clone());

        Self {
            auth_service: Arc::new(auth_service),
            user_service: Arc::new(user_service),
            category_service: Arc::new(category_service),
            genre_service: Arc::new(genre_service),
            title_service: Arc::new(title_service),
            review_service: Arc::new(review_service),
            comment_service: Arc::new(comment_service),
            health: repos.health,
            behind_proxy,
        }
    }
}

//! API route configuration.
//!
//! Access control lives in the handlers' extractors:
//! [`crate::api::middleware::auth::CurrentUser`] for authenticated endpoints and
//! [`crate::api::middleware::auth::AdminUser`] for admin-only ones.

use crate::api::handlers::{
    create_category_handler, create_comment_handler, create_genre_handler, create_review_handler,
    create_title_handler, create_user_handler, delete_category_handler, delete_comment_handler,
    delete_genre_handler, delete_review_handler, delete_title_handler, delete_user_handler,
    get_comment_handler, get_review_handler, get_title_handler, get_user_handler,
    list_categories_handler, list_comments_handler, list_genres_handler, list_reviews_handler,
    list_titles_handler, list_users_handler, me_handler, signup_handler, token_handler,
    update_comment_handler, update_me_handler, update_review_handler, update_title_handler,
    update_user_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Signup and token exchange. These are public and get rate limited by the caller.
///
/// - `POST /auth/signup` - Register or re-confirm an account
/// - `POST /auth/token`  - Exchange identifier and confirmation key for a JWT
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/token", post(token_handler))
}

/// Catalog, review and account routes.
///
/// # Endpoints
///
/// - `GET/POST         /users`                       - Accounts (admin)
/// - `GET/PATCH        /users/me`                    - Own profile
/// - `GET/PATCH/DELETE /users/{username}`            - Account (admin)
/// - `GET/POST         /categories`                  - List (public) / create (admin)
/// - `DELETE           /categories/{slug}`           - Delete (admin)
/// - `GET/POST         /genres`                      - List (public) / create (admin)
/// - `DELETE           /genres/{slug}`               - Delete (admin)
/// - `GET/POST         /titles`                      - List (public) / create (admin)
/// - `GET/PATCH/DELETE /titles/{id}`                 - Read (public) / write (admin)
/// - `GET/POST         /titles/{id}/reviews`         - List (public) / create (authenticated)
/// - `GET/PATCH/DELETE /titles/{id}/reviews/{rid}`   - Read (public) / write (author or staff)
/// - `GET/POST         .../reviews/{rid}/comments`   - List (public) / create (authenticated)
/// - `GET/PATCH/DELETE .../comments/{cid}`           - Read (public) / write (author or staff)
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/me", get(me_handler).patch(update_me_handler))
        .route(
            "/users/{username}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route("/categories/{slug}", delete(delete_category_handler))
        .route("/genres", get(list_genres_handler).post(create_genre_handler))
        .route("/genres/{slug}", delete(delete_genre_handler))
        .route("/titles", get(list_titles_handler).post(create_title_handler))
        .route(
            "/titles/{title_id}",
            get(get_title_handler)
                .patch(update_title_handler)
                .delete(delete_title_handler),
        )
        .route(
            "/titles/{title_id}/reviews",
            get(list_reviews_handler).post(create_review_handler),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(get_review_handler)
                .patch(update_review_handler)
                .delete(delete_review_handler),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(get_comment_handler)
                .patch(update_comment_handler)
                .delete(delete_comment_handler),
        )
}

/// The full `/api/v1` surface without rate limiting.
pub fn router() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(resource_routes())
}

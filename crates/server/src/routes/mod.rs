//! HTTP route handlers.
//!
//! # Route Structure (all under `/api`)
//!
//! ```text
//! # Auth
//! POST /login            - Email or social login
//! POST /register         - Create an account
//! POST /logout           - Logout (bearer)
//! POST /forgot-password  - Request a password reset
//! POST /refresh-token    - Exchange a refresh token
//!
//! # User (bearer)
//! GET    /user/profile          - Current user's document
//! PUT    /user/profile          - Update name/phone/active flag
//! PUT    /user/address          - Replace address list
//! DELETE /user/address/:id      - Remove one address
//! POST   /user/wishlist/add     - Add a product to the wishlist
//! POST   /user/wishlist/remove  - Remove a product from the wishlist
//!
//! # Categories (reads optional-auth, writes bearer)
//! GET    /categories             - List (includeInactive query)
//! GET    /categories/:id         - By id or slug
//! POST   /categories             - Create
//! PUT    /categories/:id         - Update
//! DELETE /categories/:id         - Delete
//! PATCH  /categories/:id/toggle  - Flip active flag
//!
//! # Products (reads optional-auth, writes bearer)
//! GET    /products                        - Paginated list (category/featured filters)
//! GET    /products/:id                    - Detail
//! GET    /products/category/:categoryId   - Paginated list for a category
//! GET    /products/search/:query          - Paginated substring search
//! POST   /products                        - Create
//! PUT    /products/:id                    - Update
//! DELETE /products/:id                    - Delete
//!
//! # Orders (bearer)
//! GET  /orders      - Caller's orders, newest first (offset query)
//! GET  /orders/:id  - One of the caller's orders
//! POST /orders      - Place an order
//! ```

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod user;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/refresh-token", post(auth::refresh_token))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(user::get_profile).put(user::update_profile))
        .route("/address", put(user::update_address))
        .route("/address/{id}", delete(user::delete_address))
        .route("/wishlist/add", post(user::wishlist_add))
        .route("/wishlist/remove", post(user::wishlist_remove))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route("/{id}/toggle", patch(categories::toggle))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/category/{id}", get(products::by_category))
        .route("/search/{query}", get(products::search))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/user", user_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
}

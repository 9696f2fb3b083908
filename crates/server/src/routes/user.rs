//! User profile, address, and wishlist route handlers. All require identity.

use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use uuid::Uuid;

use greenbasket_core::api::{UpdateAddressRequest, UpdateProfileRequest, WishlistRequest};
use greenbasket_core::{Phone, UserId};

use crate::db::users::UserRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireIdentity;
use crate::models::user::User;
use crate::response;
use crate::services::auth::AuthError;
use crate::state::AppState;
use crate::validation;

async fn current_user(state: &AppState, user_id: UserId) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))
}

/// `GET /user/profile`
pub async fn get_profile(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
) -> Result<Response> {
    let user = current_user(&state, identity.user_id).await?;
    Ok(response::ok(user.to_profile()))
}

/// `PUT /user/profile`
pub async fn update_profile(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Response> {
    validation::validate_update_profile(&body)?;

    // Already validated; parse for the typed repository API.
    let phone = body
        .phone
        .as_deref()
        .map(Phone::parse)
        .transpose()
        .map_err(|e| ApiError::Auth(AuthError::InvalidPhone(e)))?;

    let user = UserRepository::new(state.pool())
        .update_profile(
            identity.user_id,
            body.name.as_deref().map(str::trim),
            phone.as_ref(),
            body.is_active,
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("User not found".to_owned())
            }
            other => ApiError::Database(other),
        })?;

    Ok(response::ok(user.to_profile()))
}

/// `PUT /user/address`
///
/// Wholesale replace. Addresses arriving without an id get one assigned so
/// `DELETE /user/address/:id` can target them later.
pub async fn update_address(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Json(mut body): Json<UpdateAddressRequest>,
) -> Result<Response> {
    validation::validate_addresses(&body)?;

    for address in &mut body.addresses {
        if address.id.is_none() {
            address.id = Some(Uuid::new_v4().to_string());
        }
    }

    let addresses = UserRepository::new(state.pool())
        .set_addresses(identity.user_id, &body.addresses)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("User not found".to_owned())
            }
            other => ApiError::Database(other),
        })?;

    Ok(response::ok(addresses))
}

/// `DELETE /user/address/:id`
pub async fn delete_address(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let user = current_user(&state, identity.user_id).await?;

    let remaining: Vec<_> = user
        .addresses
        .into_iter()
        .filter(|address| address.id.as_deref() != Some(id.as_str()))
        .collect();

    UserRepository::new(state.pool())
        .set_addresses(identity.user_id, &remaining)
        .await?;

    Ok(response::message("Address deleted successfully"))
}

/// `POST /user/wishlist/add`
///
/// Idempotent: adding a product that is already wishlisted changes nothing.
pub async fn wishlist_add(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Json(body): Json<WishlistRequest>,
) -> Result<Response> {
    let mut user = current_user(&state, identity.user_id).await?;

    if !user.wishlist.contains(&body.product_id) {
        user.wishlist.push(body.product_id);
        UserRepository::new(state.pool())
            .set_wishlist(identity.user_id, &user.wishlist)
            .await?;
    }

    Ok(response::message("Product added to wishlist"))
}

/// `POST /user/wishlist/remove`
pub async fn wishlist_remove(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Json(body): Json<WishlistRequest>,
) -> Result<Response> {
    let user = current_user(&state, identity.user_id).await?;

    let remaining: Vec<_> = user
        .wishlist
        .into_iter()
        .filter(|id| *id != body.product_id)
        .collect();

    UserRepository::new(state.pool())
        .set_wishlist(identity.user_id, &remaining)
        .await?;

    Ok(response::message("Product removed from wishlist"))
}

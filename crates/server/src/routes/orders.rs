//! Order route handlers. All require identity; orders are scoped to the
//! caller.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};

use greenbasket_core::OrderId;
use greenbasket_core::api::{OrderDoc, PlaceOrderRequest};

use crate::db::orders::OrderRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireIdentity;
use crate::response;
use crate::state::AppState;
use crate::validation;

/// Fixed page size for order history.
const ORDER_PAGE_SIZE: i64 = 10;

#[derive(Debug, Serialize)]
struct OrdersData {
    orders: Vec<OrderDoc>,
}

#[derive(Debug, Serialize)]
struct OrderData {
    order: OrderDoc,
}

/// Query parameters for the order list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    offset: Option<i64>,
}

/// `GET /orders`
pub async fn list(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let offset = query.offset.unwrap_or(0).max(0);

    let orders = OrderRepository::new(state.pool())
        .list_for_user(identity.user_id, offset, ORDER_PAGE_SIZE)
        .await?;

    Ok(response::ok(OrdersData { orders }))
}

/// `GET /orders/:id`
pub async fn show(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let order = OrderRepository::new(state.pool())
        .get_for_user(OrderId::new(id), identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_owned()))?;

    Ok(response::ok(OrderData { order }))
}

/// `POST /orders`
pub async fn create(
    RequireIdentity(identity): RequireIdentity,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<Response> {
    validation::validate_place_order(&body)?;

    let order = OrderRepository::new(state.pool())
        .create(identity.user_id, &body)
        .await?;

    tracing::info!(user_id = %identity.user_id, order_id = %order.id, "order placed");
    Ok(response::created(OrderData { order }))
}

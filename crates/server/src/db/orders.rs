//! Order repository for database operations.
//!
//! Orders are always scoped to the requesting user; there is no
//! cross-user access path here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use greenbasket_core::api::{Address, OrderDoc, OrderLine, OrderStatus, PlaceOrderRequest};
use greenbasket_core::{OrderId, UserId};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, user_id, products, total_amount, shipping_address, \
                             payment_method, status, created_at, updated_at";

/// Database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    products: Json<Vec<OrderLine>>,
    total_amount: Decimal,
    shipping_address: Json<Address>,
    payment_method: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<OrderDoc, RepositoryError> {
        let status = OrderStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown order status: {}", self.status))
        })?;

        Ok(OrderDoc {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            products: self.products.0,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address.0,
            payment_method: self.payment_method,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<OrderDoc>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Get one of the user's orders by id.
    ///
    /// Returns `None` for orders that exist but belong to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderDoc>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Place a new order for the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        order: &PlaceOrderRequest,
    ) -> Result<OrderDoc, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (user_id, products, total_amount, shipping_address, payment_method, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(Json(&order.products))
        .bind(order.total_amount)
        .bind(Json(&order.shipping_address))
        .bind(&order.payment_method)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await?;

        row.into_order()
    }
}

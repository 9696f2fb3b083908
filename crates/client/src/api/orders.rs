//! Order endpoints.

use serde::Deserialize;

use greenbasket_core::OrderId;
use greenbasket_core::api::{OrderDoc, PlaceOrderRequest};

use super::ApiClient;
use crate::result::RemoteResult;

/// `data` payload of the order list.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPayload {
    pub orders: Vec<OrderDoc>,
}

/// `data` payload of a single order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPayload {
    pub order: OrderDoc,
}

impl ApiClient {
    /// `GET /orders`
    pub async fn orders(&self, offset: usize) -> RemoteResult<OrdersPayload> {
        let endpoint = if offset == 0 {
            "/orders".to_owned()
        } else {
            format!("/orders?offset={offset}")
        };
        self.get(&endpoint).await
    }

    /// `GET /orders/:id`
    pub async fn order(&self, id: OrderId) -> RemoteResult<OrderPayload> {
        self.get(&format!("/orders/{id}")).await
    }

    /// `POST /orders`
    pub async fn place_order(&self, order: &PlaceOrderRequest) -> RemoteResult<OrderPayload> {
        self.post("/orders", order).await
    }
}

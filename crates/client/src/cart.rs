//! The shopping cart store.
//!
//! Owned device-side, independent of login state: guest carts are real
//! carts, and the cart deliberately survives logout. Every line item gets a
//! fresh key on `add_item`, even for the same product and attribute
//! selection - repeated adds are distinct lines, never merged quantities.
//!
//! Every mutation persists the full snapshot to device storage before
//! returning; write failures are logged and never surfaced to the shopper.
//!
//! ## Thread safety
//!
//! Items live behind a `Mutex`, which serializes in-process writers. The
//! storage file itself remains last-write-wins.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use greenbasket_core::ProductId;
use greenbasket_core::api::{OrderLine, SelectedAttribute};

use crate::storage::{DeviceStorage, storage_keys};

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique key for this line, generated at add time.
    pub key: String,
    /// The product this line references.
    pub product_id: ProductId,
    /// Product display name, frozen at add time.
    pub product: String,
    /// Product image URL.
    pub image: String,
    /// Quantity, always >= 1. A line that would drop to 0 is removed.
    pub quantity: u32,
    /// Unit price, frozen at add time.
    pub price: Decimal,
    /// The attribute/option pairs the shopper selected.
    #[serde(default)]
    pub selected_attributes: Vec<SelectedAttribute>,
}

impl LineItem {
    /// The order line this cart line becomes at checkout.
    #[must_use]
    pub fn to_order_line(&self) -> OrderLine {
        OrderLine {
            product_id: self.product_id,
            quantity: self.quantity,
            price: self.price,
            selected_attributes: self.selected_attributes.clone(),
        }
    }
}

/// The cart store.
///
/// Cheap to clone; clones share the same items and storage.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    items: Mutex<Vec<LineItem>>,
    storage: DeviceStorage,
}

impl CartStore {
    /// Load the cart from device storage, or start empty.
    ///
    /// A missing or corrupt snapshot starts an empty cart; corruption is
    /// logged, not surfaced.
    #[must_use]
    pub fn load(storage: DeviceStorage) -> Self {
        let items = match storage.get::<Vec<LineItem>>(storage_keys::CART_ITEMS) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted cart");
                Vec::new()
            }
        };

        Self {
            inner: Arc::new(CartStoreInner {
                items: Mutex::new(items),
                storage,
            }),
        }
    }

    /// Snapshot of the current line items, in order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.with_items(Clone::clone)
    }

    /// Number of line items (not total quantity).
    #[must_use]
    pub fn count(&self) -> usize {
        self.with_items(Vec::len)
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with_items(Vec::is_empty)
    }

    /// Add a line item, returning its generated key.
    ///
    /// Always appends a new line - identical product/attribute selections
    /// are NOT merged.
    pub fn add_item(
        &self,
        product_id: ProductId,
        product: &str,
        image: &str,
        quantity: u32,
        price: Option<Decimal>,
        attributes: Vec<SelectedAttribute>,
    ) -> String {
        let item = LineItem {
            key: Uuid::new_v4().to_string(),
            product_id,
            product: product.to_owned(),
            image: image.to_owned(),
            quantity: quantity.max(1),
            price: price.unwrap_or(Decimal::ZERO),
            selected_attributes: attributes,
        };
        let key = item.key.clone();

        self.mutate(|items| items.push(item));
        key
    }

    /// Increase a line's quantity in place. Unknown keys are a no-op.
    pub fn add_quantity(&self, key: &str, delta: u32) {
        self.mutate(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.key == key) {
                item.quantity += delta;
            }
        });
    }

    /// Decrease a line's quantity by exactly one; a line that reaches 0 is
    /// filtered out entirely. Unknown keys are a no-op.
    pub fn remove_quantity(&self, key: &str) {
        self.mutate(|items| {
            let found = match items.iter_mut().find(|item| item.key == key) {
                Some(item) => {
                    item.quantity = item.quantity.saturating_sub(1);
                    true
                }
                None => false,
            };

            if found {
                items.retain(|item| item.quantity > 0);
            }
        });
    }

    /// Wholesale replace (reordering, bulk edits).
    pub fn update_cart(&self, new_items: Vec<LineItem>) {
        self.mutate(|items| *items = new_items);
    }

    /// Empty the cart and persist immediately.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    fn with_items<R>(&self, f: impl FnOnce(&Vec<LineItem>) -> R) -> R {
        let items = self.inner.items.lock().expect("cart mutex poisoned");
        f(&items)
    }

    /// Apply a mutation and persist the resulting snapshot.
    fn mutate(&self, f: impl FnOnce(&mut Vec<LineItem>)) {
        let mut items = self.inner.items.lock().expect("cart mutex poisoned");
        f(&mut items);

        if let Err(e) = self
            .inner
            .storage
            .put(storage_keys::CART_ITEMS, &*items)
        {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }
}

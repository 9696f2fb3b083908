//! The application handle.
//!
//! One explicit object built at startup and passed by handle to views -
//! there is no process-wide singleton. Teardown is the session's `logout`;
//! the cart deliberately survives it.

use std::path::PathBuf;

use crate::api::ApiClient;
use crate::cart::CartStore;
use crate::session::SessionCoordinator;
use crate::storage::{DeviceStorage, StorageError, TokenStore};

/// Startup configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. `http://localhost:3000/api`.
    pub base_url: String,
    /// Directory for device-local storage (token, cart).
    pub data_dir: PathBuf,
}

/// The one object a shell constructs at startup.
///
/// Cheap to clone; clones share the same stores and HTTP client.
#[derive(Clone)]
pub struct AppHandle {
    api: ApiClient,
    session: SessionCoordinator,
    cart: CartStore,
}

impl AppHandle {
    /// Build the handle: open device storage, load the persisted cart, and
    /// wire the session coordinator over the API client.
    ///
    /// No network traffic happens here; call [`Self::bootstrap`] next.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data directory cannot be created.
    pub fn start(config: &ClientConfig) -> Result<Self, StorageError> {
        let storage = DeviceStorage::open(&config.data_dir)?;

        let api = ApiClient::new(config.base_url.clone());
        let session = SessionCoordinator::new(api.clone(), TokenStore::new(storage.clone()));
        let cart = CartStore::load(storage);

        Ok(Self { api, session, cart })
    }

    /// Restore session state: load the persisted token and, when present,
    /// fetch profile and orders. The cart was already restored in
    /// [`Self::start`].
    pub async fn bootstrap(&self) {
        self.session.bootstrap().await;
    }

    /// The remote access layer, for feature calls the coordinators don't
    /// wrap (catalog browsing, order placement).
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The session coordinator.
    #[must_use]
    pub fn session(&self) -> &SessionCoordinator {
        &self.session
    }

    /// The cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use greenbasket_core::ProductId;

    fn config(dir: &std::path::Path) -> ClientConfig {
        ClientConfig {
            base_url: "http://127.0.0.1:1/api".to_owned(),
            data_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_start_restores_cart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let app = AppHandle::start(&config(dir.path())).unwrap();
            app.cart()
                .add_item(ProductId::new(1), "Apples", "a.png", 2, None, vec![]);
        }

        // A second start over the same data dir sees the same cart.
        let app = AppHandle::start(&config(dir.path())).unwrap();
        assert_eq!(app.cart().count(), 1);
    }

    #[tokio::test]
    async fn test_cart_survives_logout() {
        let dir = tempfile::tempdir().unwrap();
        let app = AppHandle::start(&config(dir.path())).unwrap();

        app.cart()
            .add_item(ProductId::new(1), "Apples", "a.png", 1, None, vec![]);
        app.session().logout().await;

        // Guest-cart persistence: logout never touches the cart.
        assert_eq!(app.cart().count(), 1);
    }
}

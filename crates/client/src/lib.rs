//! GreenBasket client - device-side coordination library.
//!
//! Everything the mobile shell needs between its views and the REST API:
//!
//! - [`result::RemoteResult`] - the tagged success/failure envelope every
//!   remote call resolves to
//! - [`api::ApiClient`] - the single HTTP invocation point (bearer
//!   injection, uniform error normalization)
//! - [`storage`] - device-local persisted JSON (token, cart)
//! - [`cart::CartStore`] - the guest/authenticated shopping cart
//! - [`session::SessionCoordinator`] - login/registration/logout
//!   orchestration and profile/order refresh
//! - [`app::AppHandle`] - the one object a shell constructs at startup
//!
//! # Concurrency
//!
//! Stores are `Mutex`-guarded behind shared handles; cart mutations are
//! serialized in-process and persisted last-write-wins. Remote calls carry
//! no retry or de-duplication - overlapping refreshes resolve
//! last-write-wins, matching the UI's expectations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cart;
pub mod result;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::ApiClient;
pub use app::{AppHandle, ClientConfig};
pub use cart::{CartStore, LineItem};
pub use result::RemoteResult;
pub use session::{LoginCredentials, Registration, SessionCoordinator};
pub use storage::{DeviceStorage, StorageError, TokenStore};

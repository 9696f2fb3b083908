//! The session coordinator.
//!
//! Owns login/registration/logout orchestration and keeps dependent state
//! (profile, orders) synchronized. The session invariant: `is_logged_in()`
//! is true only when a token is present AND the profile for that token was
//! successfully fetched - a persisted token alone is not a login.
//!
//! Refreshes are idempotent and carry no mutual exclusion; overlapping
//! calls resolve last-write-wins.

use std::sync::{Arc, Mutex};

use greenbasket_core::ProductId;
use greenbasket_core::api::{AuthPayload, LoginRequest, OrderDoc, ProfileDoc, RegisterRequest};

use crate::api::ApiClient;
use crate::result::RemoteResult;
use crate::storage::TokenStore;
use crate::validation;

/// What a shopper logs in with.
#[derive(Debug, Clone)]
pub enum LoginCredentials {
    /// Email + password.
    Email { email: String, password: String },
    /// Facebook social identity.
    Facebook {
        id: String,
        name: String,
        email: String,
    },
    /// Apple social identity.
    Apple {
        id: String,
        name: String,
        email: String,
    },
}

impl LoginCredentials {
    /// Advisory client-side validation; the server re-validates.
    fn validate(&self) -> Result<(), &'static str> {
        match self {
            Self::Email { email, password } => {
                validation::validate_email(email)?;
                validation::validate_login_password(password)
            }
            // Social identities arrive from the provider SDK already formed.
            Self::Facebook { .. } | Self::Apple { .. } => Ok(()),
        }
    }

    fn into_request(self, notification_token: Option<String>) -> LoginRequest {
        match self {
            Self::Email { email, password } => LoginRequest {
                login_type: "email".to_owned(),
                email: Some(email),
                password: Some(password),
                notification_token,
                ..LoginRequest::default()
            },
            Self::Facebook { id, name, email } => LoginRequest {
                login_type: "facebook".to_owned(),
                facebook_id: Some(id),
                name: Some(name),
                email: Some(email),
                notification_token,
                ..LoginRequest::default()
            },
            Self::Apple { id, name, email } => LoginRequest {
                login_type: "apple".to_owned(),
                apple_id: Some(id),
                name: Some(name),
                email: Some(email),
                notification_token,
                ..LoginRequest::default()
            },
        }
    }
}

/// A registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Device push-notification token, when permission was already granted.
    /// `None` is not an error - the field is simply omitted.
    pub notification_token: Option<String>,
}

impl Registration {
    fn validate(&self) -> Result<(), &'static str> {
        validation::validate_full_name(&self.full_name)?;
        validation::validate_email(&self.email)?;
        validation::validate_phone(&self.phone)?;
        validation::validate_registration_password(&self.password)
    }

    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            name: self.full_name,
            email: self.email,
            phone: self.phone,
            password: self.password,
            notification_token: self.notification_token,
        }
    }
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    profile: Option<ProfileDoc>,
    orders: Vec<OrderDoc>,
}

/// Owns the session: the persisted token, the in-memory profile and orders,
/// and every auth-flow transition. Read-only to the rest of the app.
#[derive(Clone)]
pub struct SessionCoordinator {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    tokens: TokenStore,
    state: Mutex<SessionState>,
}

impl SessionCoordinator {
    /// Create a coordinator with an empty session.
    #[must_use]
    pub fn new(api: ApiClient, tokens: TokenStore) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                tokens,
                state: Mutex::new(SessionState::default()),
            }),
        }
    }

    /// Restore the session at process start: read the persisted token and,
    /// when one exists, fetch profile and orders.
    pub async fn bootstrap(&self) {
        let Some(token) = self.inner.tokens.load() else {
            return;
        };

        self.inner.api.set_auth_token(Some(token.clone()));
        self.with_state(|state| state.token = Some(token));

        self.refresh_profile().await;
        self.refresh_orders().await;
    }

    /// Whether the session is fully established.
    ///
    /// Requires both a token and a successfully fetched profile.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.with_state(|state| state.token.is_some() && state.profile.is_some())
    }

    /// The current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.with_state(|state| state.token.clone())
    }

    /// The current profile, if fetched.
    #[must_use]
    pub fn profile(&self) -> Option<ProfileDoc> {
        self.with_state(|state| state.profile.clone())
    }

    /// The fetched orders, newest first.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderDoc> {
        self.with_state(|state| state.orders.clone())
    }

    /// Log in.
    ///
    /// On success the token is persisted and installed, then profile and
    /// orders are fetched sequentially; failures of those secondary fetches
    /// are logged and do NOT roll back the session. On failure no local
    /// state changes.
    pub async fn login(
        &self,
        credentials: LoginCredentials,
        notification_token: Option<String>,
    ) -> RemoteResult<AuthPayload> {
        if let Err(message) = credentials.validate() {
            return RemoteResult::failure(message);
        }

        let request = credentials.into_request(notification_token);
        let result = self.inner.api.login(&request).await;

        if let RemoteResult::Success { data, .. } = &result {
            self.establish_session(&data.token).await;
        }

        result
    }

    /// Register a new account. Behaves like [`Self::login`] on success.
    pub async fn register(&self, registration: Registration) -> RemoteResult<AuthPayload> {
        if let Err(message) = registration.validate() {
            return RemoteResult::failure(message);
        }

        let request = registration.into_request();
        let result = self.inner.api.register(&request).await;

        if let RemoteResult::Success { data, .. } = &result {
            self.establish_session(&data.token).await;
        }

        result
    }

    /// Log out.
    ///
    /// Clears the persisted token and in-memory profile/orders first, then
    /// notifies the server best-effort - a failed remote logout is logged
    /// and swallowed, never blocking the local clear. The cart is
    /// intentionally untouched (guest carts persist).
    pub async fn logout(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            tracing::warn!(error = %e, "failed to clear persisted token");
        }

        self.with_state(|state| {
            state.token = None;
            state.profile = None;
            state.orders = Vec::new();
        });

        // The API client still carries the old token for this one call.
        if let RemoteResult::Failure { error, .. } = self.inner.api.logout().await {
            tracing::warn!(error = %error, "remote logout failed");
        }

        self.inner.api.set_auth_token(None);
    }

    /// Re-fetch the profile. Idempotent; the last resolving call wins.
    ///
    /// On failure the previous profile (possibly none) is kept and the
    /// error is logged.
    pub async fn refresh_profile(&self) {
        match self.inner.api.get_profile().await {
            RemoteResult::Success { data, .. } => {
                self.with_state(|state| state.profile = Some(data));
            }
            RemoteResult::Failure { error, .. } => {
                tracing::warn!(error = %error, "profile load failed");
            }
        }
    }

    /// Re-fetch the first page of orders. Idempotent; the last resolving
    /// call wins.
    pub async fn refresh_orders(&self) {
        match self.inner.api.orders(0).await {
            RemoteResult::Success { data, .. } => {
                self.with_state(|state| state.orders = data.orders);
            }
            RemoteResult::Failure { error, .. } => {
                tracing::warn!(error = %error, "orders load failed");
            }
        }
    }

    /// Fetch the next page of orders and append it.
    pub async fn fetch_more_orders(&self) {
        let offset = self.with_state(|state| state.orders.len());

        match self.inner.api.orders(offset).await {
            RemoteResult::Success { data, .. } => {
                self.with_state(|state| state.orders.extend(data.orders));
            }
            RemoteResult::Failure { error, .. } => {
                tracing::warn!(error = %error, "orders page load failed");
            }
        }
    }

    /// Request a password reset email.
    pub async fn forgot_password(&self, email: &str) -> RemoteResult<()> {
        if let Err(message) = validation::validate_email(email) {
            return RemoteResult::failure(message);
        }

        self.inner.api.forgot_password(email).await
    }

    /// Add a product to the wishlist, refreshing the profile on success so
    /// the wishlist view stays current.
    pub async fn add_to_wishlist(&self, product_id: ProductId) -> RemoteResult<()> {
        let result = self.inner.api.add_to_wishlist(product_id).await;
        if result.is_success() {
            self.refresh_profile().await;
        }
        result
    }

    /// Remove a product from the wishlist, refreshing the profile on
    /// success.
    pub async fn remove_from_wishlist(&self, product_id: ProductId) -> RemoteResult<()> {
        let result = self.inner.api.remove_from_wishlist(product_id).await;
        if result.is_success() {
            self.refresh_profile().await;
        }
        result
    }

    /// Persist and install a fresh token, then pull dependent state.
    async fn establish_session(&self, token: &str) {
        if let Err(e) = self.inner.tokens.save(token) {
            // The in-memory session still works; it just won't survive a
            // restart.
            tracing::warn!(error = %e, "failed to persist token");
        }

        self.inner.api.set_auth_token(Some(token.to_owned()));
        self.with_state(|state| {
            state.token = Some(token.to_owned());
            state.profile = None;
            state.orders = Vec::new();
        });

        self.refresh_profile().await;
        self.refresh_orders().await;
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.inner.state.lock().expect("session mutex poisoned");
        f(&mut state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::DeviceStorage;

    /// Coordinator pointed at a port that refuses connections instantly.
    fn offline_session(dir: &std::path::Path) -> SessionCoordinator {
        let storage = DeviceStorage::open(dir).unwrap();
        let api = ApiClient::new("http://127.0.0.1:1/api");
        SessionCoordinator::new(api, TokenStore::new(storage))
    }

    #[test]
    fn test_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = offline_session(dir.path());
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
        assert!(session.profile().is_none());
        assert!(session.orders().is_empty());
    }

    #[tokio::test]
    async fn test_login_validation_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let session = offline_session(dir.path());

        // Invalid email fails before any network call - the error is the
        // field message, not "Network error".
        let result = session
            .login(
                LoginCredentials::Email {
                    email: "not-an-email".to_owned(),
                    password: "secret1".to_owned(),
                },
                None,
            )
            .await;

        assert_eq!(result.error(), Some("Provide a valid email address"));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_register_validation_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let session = offline_session(dir.path());

        let result = session
            .register(Registration {
                full_name: "Ada Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
                phone: "123".to_owned(),
                password: "secret1".to_owned(),
                notification_token: None,
            })
            .await;

        assert_eq!(result.error(), Some("Please enter a valid phone number"));
    }

    #[tokio::test]
    async fn test_failed_login_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let session = offline_session(dir.path());

        let result = session
            .login(
                LoginCredentials::Email {
                    email: "ada@example.com".to_owned(),
                    password: "secret1".to_owned(),
                },
                None,
            )
            .await;

        assert_eq!(result.error(), Some("Network error"));
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn test_persisted_token_without_profile_is_not_logged_in() {
        let dir = tempfile::tempdir().unwrap();

        // A token survives from a previous run...
        let storage = DeviceStorage::open(dir.path()).unwrap();
        TokenStore::new(storage).save("stale-token").unwrap();

        let session = offline_session(dir.path());
        session.bootstrap().await;

        // ...but the profile fetch failed, so the session is NOT logged in,
        // even though the token was restored.
        assert_eq!(session.token(), Some("stale-token".to_owned()));
        assert!(session.profile().is_none());
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_despite_remote_failure() {
        let dir = tempfile::tempdir().unwrap();

        let storage = DeviceStorage::open(dir.path()).unwrap();
        let tokens = TokenStore::new(storage);
        tokens.save("some-token").unwrap();

        let session = offline_session(dir.path());
        session.bootstrap().await;
        assert_eq!(session.token(), Some("some-token".to_owned()));

        // The remote logout cannot succeed (nothing is listening), but the
        // local clear must happen anyway.
        session.logout().await;

        assert_eq!(session.token(), None);
        assert!(!session.is_logged_in());
        assert_eq!(tokens.load(), None);
    }
}

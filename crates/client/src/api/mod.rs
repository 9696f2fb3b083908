//! The remote access layer.
//!
//! One HTTP client for every feature module: base URL, bearer-token
//! injection, JSON decode, and a uniform [`RemoteResult`] for every
//! outcome. Feature endpoints live in the submodules as `impl ApiClient`
//! blocks.
//!
//! Error normalization, in order:
//! - a thrown transport error becomes the failure `"Network error"` - no
//!   exception ever escapes
//! - a non-2xx status returns the body text as the failure's error string
//!   (no structure assumed)
//! - a 2xx body that fails to parse becomes `"Failed to parse response"`

mod auth;
mod catalog;
mod orders;
mod user;

pub use catalog::{CategoriesPayload, CategoryPayload, ProductPayload, ProductsPayload, ProductsQuery};
pub use orders::{OrderPayload, OrdersPayload};

use std::sync::{Arc, Mutex};

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::RemoteResult;

const NETWORK_ERROR: &str = "Network error";
const PARSE_ERROR: &str = "Failed to parse response";

/// Client for the GreenBasket REST API.
///
/// Cheap to clone; all clones share the underlying connection pool and the
/// installed auth token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    token: Mutex<Option<String>>,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:3000/api`).
    ///
    /// A trailing slash is trimmed so endpoint paths can always start with `/`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url,
                token: Mutex::new(None),
            }),
        }
    }

    /// Install or clear the bearer token.
    ///
    /// The session coordinator calls this whenever the token changes; the
    /// client itself never watches for changes.
    pub fn set_auth_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.inner.token.lock() {
            *guard = token;
        }
    }

    /// GET an endpoint.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> RemoteResult<T> {
        self.execute(self.builder(Method::GET, endpoint)).await
    }

    /// POST a JSON body to an endpoint.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> RemoteResult<T> {
        self.execute(self.builder(Method::POST, endpoint).json(body))
            .await
    }

    /// PUT a JSON body to an endpoint.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> RemoteResult<T> {
        self.execute(self.builder(Method::PUT, endpoint).json(body))
            .await
    }

    /// DELETE an endpoint.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> RemoteResult<T> {
        self.execute(self.builder(Method::DELETE, endpoint)).await
    }

    fn builder(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, endpoint);
        let mut builder = self.inner.http.request(method, url);

        let token = self.inner.token.lock().ok().and_then(|guard| guard.clone());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<T> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "transport error");
                return RemoteResult::failure(NETWORK_ERROR);
            }
        };

        let status = response.status();

        if !status.is_success() {
            // The body is returned verbatim as the error string; callers
            // must not assume it is JSON.
            let error = response
                .text()
                .await
                .unwrap_or_else(|_| NETWORK_ERROR.to_owned());
            return RemoteResult::failure(error);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read response body");
                return RemoteResult::failure(PARSE_ERROR);
            }
        };

        // 2xx bodies are the server's success envelope; unwrap it into the
        // typed payload here so feature modules never re-parse.
        match serde_json::from_str::<RemoteResult<T>>(&text) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse response");
                RemoteResult::failure(PARSE_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/api/");
        assert_eq!(client.inner.base_url, "http://localhost:3000/api");
    }

    #[test]
    fn test_token_install_and_clear() {
        let client = ApiClient::new("http://localhost:3000/api");
        client.set_auth_token(Some("tok".to_owned()));
        assert_eq!(
            client.inner.token.lock().expect("lock").clone(),
            Some("tok".to_owned())
        );

        client.set_auth_token(None);
        assert_eq!(client.inner.token.lock().expect("lock").clone(), None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 1 on loopback refuses immediately.
        let client = ApiClient::new("http://127.0.0.1:1/api");
        let result: RemoteResult<()> = client.get("/user/profile").await;
        assert_eq!(result.error(), Some(NETWORK_ERROR));
    }
}

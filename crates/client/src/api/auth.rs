//! Auth endpoints.

use greenbasket_core::api::{
    AuthPayload, ForgotPasswordRequest, LoginRequest, RefreshPayload, RefreshRequest,
    RegisterRequest,
};

use super::ApiClient;
use crate::result::RemoteResult;

impl ApiClient {
    /// `POST /login`
    pub async fn login(&self, request: &LoginRequest) -> RemoteResult<AuthPayload> {
        self.post("/login", request).await
    }

    /// `POST /register`
    pub async fn register(&self, request: &RegisterRequest) -> RemoteResult<AuthPayload> {
        self.post("/register", request).await
    }

    /// `POST /logout`
    pub async fn logout(&self) -> RemoteResult<()> {
        self.post("/logout", &serde_json::json!({})).await
    }

    /// `POST /forgot-password`
    pub async fn forgot_password(&self, email: &str) -> RemoteResult<()> {
        self.post(
            "/forgot-password",
            &ForgotPasswordRequest {
                email: email.to_owned(),
            },
        )
        .await
    }

    /// `POST /refresh-token`
    pub async fn refresh_token(&self, refresh_token: &str) -> RemoteResult<RefreshPayload> {
        self.post(
            "/refresh-token",
            &RefreshRequest {
                refresh_token: refresh_token.to_owned(),
            },
        )
        .await
    }
}

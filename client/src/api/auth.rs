// client/src/api/auth.rs

use shared::types::auth::{
    LoginRequest, ProfileUpdateRequest, RegisterRequest, TokenResponse, UserMe,
};
use tracing::info;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `POST /auth/register` — create an account. Does not log in.
    pub async fn register(&self, req: &RegisterRequest) -> Result<UserMe, ApiError> {
        self.post_json_open("/auth/register", req).await
    }

    /// `POST /auth/login` — exchange credentials for a bearer token.
    ///
    /// On success the token is stored in the shared [`TokenCell`], making it
    /// visible to every subsequent REST call and to the realtime layer.
    ///
    /// [`TokenCell`]: super::TokenCell
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let tok: TokenResponse = self.post_json_open("/auth/login", &req).await?;
        self.token().set(tok.access_token.clone());
        info!("logged in as {}", email);
        Ok(tok)
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> Result<UserMe, ApiError> {
        self.get_json("/auth/me").await
    }

    /// `PUT /auth/me` — sparse profile update.
    pub async fn update_profile(&self, req: &ProfileUpdateRequest) -> Result<UserMe, ApiError> {
        self.put_json("/auth/me", req).await
    }

    /// Drop the stored session token. Local only; there is no server-side
    /// logout endpoint.
    pub fn logout(&self) {
        self.token().clear();
    }
}

//! User endpoints: registration, login, profile, wallet linking.

use crate::api::client::ApiClient;
use crate::api::error::ApiResponse;
use crate::api::types::{
    LinkWalletRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, User,
    UserBody,
};
use crate::session::SessionError;

impl ApiClient {
    /// `POST /users/register`
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResponse<MessageResponse> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/users/register", &body).await
    }

    /// `POST /users/login`. A returned token is stored in the session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/users/login", &body).await?;

        if let Some(token) = &response.token {
            // The in-memory token is set even if writing the session file fails.
            if let Err(e) = self.session().save_token(token.clone()) {
                tracing::warn!(error = %e, "Logged in but the session could not be persisted");
            }
            tracing::info!("Logged in");
        }
        Ok(response)
    }

    /// Forget the stored bearer token.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session().clear()
    }

    /// `GET /users/me`
    pub async fn profile(&self) -> ApiResponse<User> {
        self.get::<UserBody>("/users/me").await.map(User::from)
    }

    /// `POST /users/link-wallet`
    pub async fn link_wallet(&self, wallet_address: &str) -> ApiResponse<MessageResponse> {
        let body = LinkWalletRequest {
            wallet_address: wallet_address.to_string(),
        };
        self.post("/users/link-wallet", &body).await
    }
}

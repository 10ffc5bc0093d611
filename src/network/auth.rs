//! `/auth/*` endpoints

use crate::error::ApiError;
use crate::models::{AuthResponse, HttpMethod, LoginRequest, RegisterRequest, User};
use crate::network::client::{ApiClient, NO_BODY};

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let payload = LoginRequest { email, password };
        self.fetch_required(HttpMethod::POST, "/auth/login", None, Some(&payload))
            .await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let payload = RegisterRequest {
            name,
            email,
            password,
        };
        self.fetch_required(HttpMethod::POST, "/auth/register", None, Some(&payload))
            .await
    }

    /// Profile of the token's owner
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.fetch_required(HttpMethod::GET, "/auth/me", Some(token), NO_BODY)
            .await
    }
}

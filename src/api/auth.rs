//! Authentication endpoints and token-cookie handling.

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{RegisterRequest, TokenResponse, User};

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const ME_PATH: &str = "/auth/me";

/// Create an account. Does not log in.
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<User, ApiError> {
    client.post_json(REGISTER_PATH, request).await
}

/// Exchange credentials for a bearer token and store it in the token cookie.
///
/// The backend expects an OAuth2 password form, so the email travels as `username`.
/// Nothing is stored unless the backend answers 2xx.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
    let token: TokenResponse = client
        .post_form(LOGIN_PATH, &[("username", email), ("password", password)])
        .await?;
    client.tokens().set(&token.access_token);
    Ok(token)
}

/// Drop the stored token. No server call.
pub fn logout(client: &ApiClient) {
    client.tokens().remove();
}

pub async fn current_user(client: &ApiClient) -> Result<User, ApiError> {
    client.get_json(ME_PATH).await
}

/// Token presence only; says nothing about whether the backend still accepts it.
#[must_use]
pub fn is_authenticated(client: &ApiClient) -> bool {
    client.tokens().is_present()
}

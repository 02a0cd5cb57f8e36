use contracts::system::auth::{LoginRequest, LoginResponse};

use super::Session;
use crate::gateway::{GatewayError, GatewayResult};

/// Login with email and password
pub async fn login(session: &Session, email: String, password: String) -> GatewayResult<LoginResponse> {
    let request = LoginRequest { email, password };

    let response = session
        .http()
        .post(session.url("/auth/login"))
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::from_status(status.as_u16(), &body));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| GatewayError::unexpected_shape(format!("Failed to parse response: {}", e)))
}

use contracts::system::auth::{LoginRequest, LoginResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::error::{check_read, GatewayError};

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, GatewayError> {
    let request = LoginRequest { username, password };

    let response = Request::post(&api_url("/api/auth/login"))
        .json(&request)
        .map_err(|e| GatewayError::Fetch(format!("failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    if response.status() == 401 {
        // Wrong credentials on the login call itself is a plain failure,
        // not a session expiry.
        return Err(GatewayError::Fetch("credenciais inválidas".to_string()));
    }
    check_read(&response)?;

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to parse response: {}", e)))
}

/// Logout (revoke the token server-side; best effort)
pub async fn logout(access_token: &str) -> Result<(), GatewayError> {
    let response = Request::post(&api_url("/api/auth/logout"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    check_read(&response)?;
    Ok(())
}

use contracts::domain::s004_scenario::Scenario;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::error::{check_read, GatewayError};

/// Fetch the budget scenario the user is currently working on.
pub async fn fetch_active_scenario(access_token: &str) -> Result<Scenario, GatewayError> {
    let response = Request::get(&api_url("/api/scenarios/active"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    check_read(&response)?;

    response
        .json::<Scenario>()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to parse response: {}", e)))
}

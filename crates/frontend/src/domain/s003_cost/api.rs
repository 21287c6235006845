use contracts::domain::common::EntityId;
use contracts::domain::s001_scope::SelectedScope;
use contracts::domain::s003_cost::{CostCalcRequest, CostSummary};
use contracts::domain::s004_scenario::ScenarioId;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::error::{check_read, check_write, GatewayError};

/// Ask the backend to (re)compute costs for the scope. The response carries
/// no data; the panel refetches the summary afterwards.
pub async fn trigger_calculation(
    access_token: &str,
    request: &CostCalcRequest,
) -> Result<(), GatewayError> {
    let response = Request::post(&api_url("/api/costs/calculate"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .json(request)
        .map_err(|e| GatewayError::Save(format!("failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(|e| GatewayError::Save(format!("failed to send request: {}", e)))?;

    check_write(&response)?;
    Ok(())
}

/// Aggregated cost rows for the scope and year.
pub async fn fetch_summary(
    access_token: &str,
    scenario_id: ScenarioId,
    scope: &SelectedScope,
    year: i32,
) -> Result<CostSummary, GatewayError> {
    let url = api_url(&format!(
        "/api/costs/summary?scenarioId={}&{}&year={}",
        scenario_id.as_string(),
        scope.to_query(),
        year
    ));
    let response = Request::get(&url)
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    check_read(&response)?;

    response
        .json::<CostSummary>()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to parse response: {}", e)))
}

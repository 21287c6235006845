use contracts::domain::common::EntityId;
use contracts::domain::s001_scope::SelectedScope;
use contracts::domain::s002_premise::{BulkUpsertRequest, Role, RoleAssumption};
use contracts::domain::s004_scenario::ScenarioId;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::error::{check_read, check_write, GatewayError};

/// Roles visible under the given scope; the row axis of the grid.
pub async fn fetch_roles(
    access_token: &str,
    scope: &SelectedScope,
) -> Result<Vec<Role>, GatewayError> {
    let url = api_url(&format!("/api/roles?{}", scope.to_query()));
    let response = Request::get(&url)
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    check_read(&response)?;

    response
        .json::<Vec<Role>>()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to parse response: {}", e)))
}

/// Persisted assumption records for the scope over the year range of the
/// grid axis. Months without a record simply do not appear; the edit buffer
/// defaults them.
pub async fn fetch_assumptions(
    access_token: &str,
    scenario_id: ScenarioId,
    scope: &SelectedScope,
    year_from: i32,
    year_to: i32,
) -> Result<Vec<RoleAssumption>, GatewayError> {
    let url = api_url(&format!(
        "/api/premises?scenarioId={}&{}&yearFrom={}&yearTo={}",
        scenario_id.as_string(),
        scope.to_query(),
        year_from,
        year_to
    ));
    let response = Request::get(&url)
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    check_read(&response)?;

    response
        .json::<Vec<RoleAssumption>>()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to parse response: {}", e)))
}

/// Persist the whole grid in one request. The server applies the batch as a
/// unit, so a failure here means nothing was written.
pub async fn bulk_upsert(
    access_token: &str,
    request: &BulkUpsertRequest,
) -> Result<(), GatewayError> {
    let response = Request::post(&api_url("/api/premises/bulk"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .json(request)
        .map_err(|e| GatewayError::Save(format!("failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(|e| GatewayError::Save(format!("failed to send request: {}", e)))?;

    check_write(&response)?;
    Ok(())
}

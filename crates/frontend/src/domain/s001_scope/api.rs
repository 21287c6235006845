use contracts::domain::common::EntityId;
use contracts::domain::s001_scope::{ScopeNodeDto, ScopeNodeId, ScopeNodeKind, SelectedScope};
use contracts::domain::s004_scenario::ScenarioId;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::error::{check_read, check_write, GatewayError};

/// Top-level nodes: the companies associated with the active scenario.
pub async fn fetch_root_nodes(
    access_token: &str,
    scenario_id: ScenarioId,
) -> Result<Vec<ScopeNodeDto>, GatewayError> {
    let url = api_url(&format!(
        "/api/scope/nodes?scenarioId={}",
        scenario_id.as_string()
    ));
    fetch_nodes(access_token, &url).await
}

/// Children of one node. The full parent chain travels as filter parameters
/// so the gateway can scope the listing.
pub async fn fetch_children(
    access_token: &str,
    scenario_id: ScenarioId,
    parent_id: ScopeNodeId,
    child_kind: ScopeNodeKind,
    scope: &SelectedScope,
) -> Result<Vec<ScopeNodeDto>, GatewayError> {
    let url = api_url(&format!(
        "/api/scope/nodes?scenarioId={}&parentId={}&kind={}&{}",
        scenario_id.as_string(),
        parent_id.as_string(),
        child_kind.as_str(),
        scope.to_query()
    ));
    fetch_nodes(access_token, &url).await
}

async fn fetch_nodes(access_token: &str, url: &str) -> Result<Vec<ScopeNodeDto>, GatewayError> {
    let response = Request::get(url)
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to send request: {}", e)))?;

    check_read(&response)?;

    response
        .json::<Vec<ScopeNodeDto>>()
        .await
        .map_err(|e| GatewayError::Fetch(format!("failed to parse response: {}", e)))
}

/// Delete a node server-side. The caller removes it from the arena only
/// after this succeeds.
pub async fn delete_node(
    access_token: &str,
    node_id: ScopeNodeId,
) -> Result<(), GatewayError> {
    let url = api_url(&format!("/api/scope/nodes/{}", node_id.as_string()));
    let response = Request::delete(&url)
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GatewayError::Save(format!("failed to send request: {}", e)))?;

    check_write(&response)?;
    Ok(())
}

use crate::domain::s001_scope::SelectedScope;
use crate::domain::s004_scenario::ScenarioId;
use serde::{Deserialize, Serialize};

/// Ask the backend to (re)compute costs for a scope. The computation itself
/// is entirely server-side; the frontend only triggers it and re-reads the
/// summary afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCalcRequest {
    #[serde(rename = "scenarioId")]
    pub scenario_id: ScenarioId,

    #[serde(flatten)]
    pub scope: SelectedScope,

    pub year: i32,
}

/// One aggregate line of the cost panel (a rubric with its monthly totals)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummaryRow {
    pub label: String,

    /// Twelve values, January through December
    #[serde(rename = "monthlyTotals")]
    pub monthly_totals: Vec<f64>,

    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummary {
    pub year: i32,
    pub rows: Vec<CostSummaryRow>,
}

use crate::domain::common::EntityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a budget scenario (cenário orçamentário)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub Uuid);

impl ScenarioId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl EntityId for ScenarioId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ScenarioId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Planning horizon
// ============================================================================

/// Inclusive month range the scenario plans over; feeds the grid's column axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningHorizon {
    #[serde(rename = "startYear")]
    pub start_year: i32,

    /// 1–12
    #[serde(rename = "startMonth")]
    pub start_month: u32,

    #[serde(rename = "endYear")]
    pub end_year: i32,

    /// 1–12
    #[serde(rename = "endMonth")]
    pub end_month: u32,
}

impl PlanningHorizon {
    /// Full calendar year, January through December.
    pub fn calendar_year(year: i32) -> Self {
        Self {
            start_year: year,
            start_month: 1,
            end_year: year,
            end_month: 12,
        }
    }
}

// ============================================================================
// Scenario
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,

    pub description: String,

    /// Absent on legacy scenarios; callers fall back to the current
    /// calendar year.
    pub horizon: Option<PlanningHorizon>,
}

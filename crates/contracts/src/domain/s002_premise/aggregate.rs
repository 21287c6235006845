use crate::domain::common::EntityId;
use crate::domain::s001_scope::SelectedScope;
use crate::domain::s004_scenario::ScenarioId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Defaults
// ============================================================================

// Workforce-planning assumptions applied to every (role, month) cell that has
// no persisted record yet.
pub const DEFAULT_ABSENTEEISM_PCT: f64 = 3.0;
pub const DEFAULT_TURNOVER_PCT: f64 = 5.0;
pub const DEFAULT_VACATION_INDEX_PCT: f64 = 8.33;
pub const DEFAULT_TRAINING_DAYS: i32 = 15;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a job role (cargo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub Uuid);

impl RoleId {
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

impl EntityId for RoleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(RoleId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Role (row axis of the premises grid)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

// ============================================================================
// RoleAssumption (premissa)
// ============================================================================

/// One month of workforce-planning assumptions for one role.
///
/// Natural key: `(roleId, month, year)` — no two records may share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssumption {
    #[serde(rename = "roleId")]
    pub role_id: RoleId,

    /// 1–12
    pub month: u32,

    pub year: i32,

    #[serde(rename = "absenteeismPct")]
    pub absenteeism_pct: f64,

    #[serde(rename = "turnoverPct")]
    pub turnover_pct: f64,

    #[serde(rename = "vacationIndexPct")]
    pub vacation_index_pct: f64,

    #[serde(rename = "trainingDays")]
    pub training_days: i32,
}

// ============================================================================
// Bulk upsert
// ============================================================================

/// Single write request carrying the whole grid; the server applies it as
/// one unit (all rows or none).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpsertRequest {
    #[serde(rename = "scenarioId")]
    pub scenario_id: ScenarioId,

    #[serde(flatten)]
    pub scope: SelectedScope,

    pub records: Vec<RoleAssumption>,
}

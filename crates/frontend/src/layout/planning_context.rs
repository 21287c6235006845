use chrono::Datelike;
use contracts::domain::s001_scope::SelectedScope;
use contracts::domain::s004_scenario::{PlanningHorizon, Scenario};
use leptos::prelude::*;

/// Shared planning state: the active budget scenario and the scope selected
/// in the navigator. Selection changes propagate synchronously — dependent
/// panels re-render in the same tick, so they never observe a stale scope.
#[derive(Clone, Copy)]
pub struct PlanningContext {
    pub scenario: RwSignal<Option<Scenario>>,
    pub selected: RwSignal<Option<SelectedScope>>,
    /// Set by the premises grid while its edit buffer differs from the
    /// last-fetched server state.
    pub grid_dirty: RwSignal<bool>,
}

impl PlanningContext {
    pub fn new() -> Self {
        Self {
            scenario: RwSignal::new(None),
            selected: RwSignal::new(None),
            grid_dirty: RwSignal::new(false),
        }
    }

    /// Planning horizon of the active scenario, falling back to the current
    /// calendar year for scenarios without one.
    pub fn horizon(&self) -> PlanningHorizon {
        self.scenario
            .get()
            .and_then(|s| s.horizon)
            .unwrap_or_else(|| {
                PlanningHorizon::calendar_year(chrono::Utc::now().date_naive().year())
            })
    }

    /// True when switching scope would discard unsaved grid edits.
    pub fn has_unsaved_edits(&self) -> bool {
        self.grid_dirty.get_untracked()
    }
}

impl Default for PlanningContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook to access the planning context
pub fn use_planning() -> PlanningContext {
    use_context::<PlanningContext>().expect("PlanningContext not found in component tree")
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::s004_scenario::{Scenario, ScenarioId};

    #[test]
    fn horizon_follows_the_active_scenario() {
        let planning = PlanningContext::new();

        // No scenario yet: fall back to the current calendar year.
        let fallback = planning.horizon();
        assert_eq!(fallback.start_month, 1);
        assert_eq!(fallback.end_month, 12);

        planning.scenario.set(Some(Scenario {
            id: ScenarioId::new_v4(),
            description: "Orçamento 2027".to_string(),
            horizon: Some(PlanningHorizon {
                start_year: 2027,
                start_month: 7,
                end_year: 2028,
                end_month: 6,
            }),
        }));

        // Later reads see the new scenario's horizon, not a mount-time copy.
        assert_eq!(planning.horizon().start_year, 2027);
        assert_eq!(planning.horizon().end_month, 6);
    }
}

pub mod aggregate;

pub use aggregate::{PlanningHorizon, Scenario, ScenarioId};

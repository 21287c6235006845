pub mod common;
pub mod s001_scope;
pub mod s002_premise;
pub mod s003_cost;
pub mod s004_scenario;

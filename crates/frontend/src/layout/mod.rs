pub mod planning_context;
pub mod workspace;

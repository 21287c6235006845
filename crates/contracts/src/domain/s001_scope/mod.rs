pub mod aggregate;

pub use aggregate::{ScopeNodeDto, ScopeNodeId, ScopeNodeKind, SelectedScope};

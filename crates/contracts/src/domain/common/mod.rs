//! Common types and traits for all domain entities

pub mod entity_id;

// Re-exports
pub use entity_id::EntityId;

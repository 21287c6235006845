pub mod empty_state;

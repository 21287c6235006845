pub mod api_utils;
pub mod components;
pub mod debounce;
pub mod error;
pub mod number_format;

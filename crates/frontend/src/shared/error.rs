//! Error taxonomy of the gateway client.
//!
//! Reads fail with [`GatewayError::Fetch`] and are contained at the component
//! boundary (inline error panel, manual retry). Writes fail with
//! [`GatewayError::Save`] and must leave client state untouched. 401/403 map
//! to [`GatewayError::Auth`] and are never handled inside components — the
//! session layer reacts to them.

use gloo_net::http::Response;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Fetch(String),

    #[error("not authenticated (HTTP {0})")]
    Auth(u16),

    #[error("save failed: {0}")]
    Save(String),
}

impl GatewayError {
    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Auth(_))
    }
}

/// Map a non-2xx read response to the taxonomy.
pub fn check_read(response: &Response) -> Result<(), GatewayError> {
    match response.status() {
        200..=299 => Ok(()),
        401 | 403 => Err(GatewayError::Auth(response.status())),
        status => Err(GatewayError::Fetch(format!("HTTP {}", status))),
    }
}

/// Map a non-2xx write response to the taxonomy.
pub fn check_write(response: &Response) -> Result<(), GatewayError> {
    match response.status() {
        200..=299 => Ok(()),
        401 | 403 => Err(GatewayError::Auth(response.status())),
        status => Err(GatewayError::Save(format!("HTTP {}", status))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_are_recognized() {
        assert!(GatewayError::Auth(401).is_auth());
        assert!(GatewayError::Auth(403).is_auth());
        assert!(!GatewayError::Fetch("HTTP 500".into()).is_auth());
        assert!(!GatewayError::Save("HTTP 500".into()).is_auth());
    }
}

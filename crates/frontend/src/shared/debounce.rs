//! Debounce and stale-response discard.
//!
//! Every component that issues scope-dependent fetches owns one
//! [`RequestGuard`]. A token is captured before the async call; the
//! continuation applies its result only if the token is still current.
//! A newer request (keystroke, scope change) supersedes the older one by
//! issuing a fresh token, so late responses are discarded by request
//! recency, not arrival order.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

/// Delay after the last keystroke before a search takes effect.
pub const SEARCH_DEBOUNCE_MS: u32 = 500;

/// Opaque generation number of one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReqToken(u64);

/// Monotonic token source. Pure; the reactive wrapper lives in
/// [`RequestGuard`].
#[derive(Debug, Default, Clone)]
pub struct TokenSource {
    current: u64,
}

impl TokenSource {
    /// Issue a new token, superseding every previously issued one.
    pub fn issue(&mut self) -> ReqToken {
        self.current += 1;
        ReqToken(self.current)
    }

    /// True while `token` is the most recently issued one.
    pub fn is_current(&self, token: ReqToken) -> bool {
        token.0 == self.current
    }
}

/// Reactive wrapper around [`TokenSource`] for use inside components.
#[derive(Clone, Copy)]
pub struct RequestGuard {
    source: StoredValue<TokenSource>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self {
            source: StoredValue::new(TokenSource::default()),
        }
    }

    pub fn issue(&self) -> ReqToken {
        self.source
            .try_update_value(|s| s.issue())
            // Token 0 is never issued, so a disposed guard never matches.
            .unwrap_or(ReqToken(0))
    }

    pub fn is_current(&self, token: ReqToken) -> bool {
        self.source
            .try_with_value(|s| s.is_current(token))
            .unwrap_or(false)
    }
}

impl Default for RequestGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Await the debounce window.
pub async fn debounce_window() {
    TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let mut source = TokenSource::default();
        let first = source.issue();
        let second = source.issue();

        assert!(!source.is_current(first));
        assert!(source.is_current(second));
    }

    #[test]
    fn stale_response_is_discarded_regardless_of_arrival_order() {
        let mut source = TokenSource::default();

        // Fetch issued under scope S1, then the scope changes to S2.
        let s1 = source.issue();
        let s2 = source.issue();

        // The S1 response arrives late: it must not be applied.
        assert!(!source.is_current(s1));
        // The S2 response is applied whenever it arrives.
        assert!(source.is_current(s2));
    }

    #[test]
    fn token_is_current_until_superseded() {
        let mut source = TokenSource::default();
        let token = source.issue();
        assert!(source.is_current(token));
        assert!(source.is_current(token));
    }
}

//! Explicit session context.
//!
//! The token never lives in a process-wide static: a [`Session`] is created
//! by [`SessionProvider`] at the top of the component tree and handed to
//! consumers through Leptos context, so tests can inject a fake one.
//! Token refresh is out of scope; an auth failure anywhere simply expires
//! the session, which routes back to the login page.

pub mod api;
pub mod storage;

use contracts::system::auth::{LoginResponse, UserInfo};
use leptos::prelude::*;

use crate::shared::error::GatewayError;

#[derive(Clone, Copy)]
pub struct Session {
    token: RwSignal<Option<String>>,
    user: RwSignal<Option<UserInfo>>,
}

impl Session {
    /// Fresh unauthenticated session (used directly in tests).
    pub fn new() -> Self {
        Self {
            token: RwSignal::new(None),
            user: RwSignal::new(None),
        }
    }

    /// Session restored from localStorage, if a token was persisted.
    pub fn restore() -> Self {
        Self {
            token: RwSignal::new(storage::get_access_token()),
            user: RwSignal::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.user.get()
    }

    /// Install a successful login.
    pub fn establish(&self, response: LoginResponse) {
        storage::save_access_token(&response.access_token);
        self.token.set(Some(response.access_token));
        self.user.set(Some(response.user));
    }

    /// Explicit teardown (user logout).
    pub fn teardown(&self) {
        storage::clear_token();
        self.token.set(None);
        self.user.set(None);
    }

    /// Sink for `GatewayError::Auth` propagated out of any component:
    /// drop the session so the login gate takes over.
    pub fn handle_gateway_error(&self, error: &GatewayError) {
        if error.is_auth() {
            log::warn!("session expired: {}", error);
            self.teardown();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session context provider component
#[component]
pub fn SessionProvider(children: ChildrenFn) -> impl IntoView {
    provide_context(Session::restore());
    children()
}

/// Hook to access the session
pub fn use_session() -> Session {
    use_context::<Session>().expect("SessionProvider not found in component tree")
}

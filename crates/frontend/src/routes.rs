use crate::layout::workspace::PlanningWorkspace;
use crate::system::pages::login::LoginPage;
use crate::system::session::use_session;
use leptos::prelude::*;

#[component]
pub fn AppRoutes() -> impl IntoView {
    let session = use_session();

    view! {
        <Show
            when=move || session.is_authenticated()
            fallback=|| view! { <LoginPage /> }
        >
            <PlanningWorkspace />
        </Show>
    }
}

use crate::layout::planning_context::PlanningContext;
use crate::routes::AppRoutes;
use crate::system::session::SessionProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the shared planning context (scenario + selected scope) to the
    // whole app via context.
    provide_context(PlanningContext::new());

    view! {
        <SessionProvider>
            <AppRoutes />
        </SessionProvider>
    }
}

use leptos::prelude::*;
use std::rc::Rc;

/// Dashed-border panel shown in place of a list that is empty or failed to
/// load. Read failures never cross the component boundary; this panel plus
/// its retry button is the whole recovery path.
#[component]
pub fn EmptyState(
    message: String,
    on_retry: Option<Rc<dyn Fn()>>,
) -> impl IntoView {
    view! {
        <div style="border: 2px dashed #ccc; border-radius: 6px; padding: 24px; text-align: center; color: #888; margin: 8px 0;">
            <p style="margin: 0 0 8px 0;">{message}</p>
            {on_retry.map(|retry| {
                view! {
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| retry()
                    >
                        "Tentar novamente"
                    </button>
                }
            })}
        </div>
    }
}

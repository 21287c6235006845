use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::domain::s001_scope::ui::navigator::ScopeNavigator;
use crate::domain::s002_premise::ui::editor::PremisesEditor;
use crate::domain::s003_cost::ui::panel::CostPanel;
use crate::domain::s004_scenario::api as scenario_api;
use crate::layout::planning_context::use_planning;
use crate::system::session::use_session;

/// Master-detail planning workspace: scope navigator on the left, the
/// premises grid and the cost panel for the selected scope on the right.
#[component]
pub fn PlanningWorkspace() -> impl IntoView {
    let session = use_session();
    let planning = use_planning();
    let (scenario_error, set_scenario_error) = signal(Option::<String>::None);

    let load_scenario = move || {
        let Some(token) = session.token() else {
            return;
        };
        spawn_local(async move {
            match scenario_api::fetch_active_scenario(&token).await {
                Ok(scenario) => {
                    log::info!("active scenario: {}", scenario.description);
                    planning.scenario.set(Some(scenario));
                    set_scenario_error.set(None);
                }
                Err(e) => {
                    session.handle_gateway_error(&e);
                    set_scenario_error.set(Some(format!("Falha ao carregar cenário: {}", e)));
                }
            }
        });
    };
    load_scenario();

    let on_logout = move |_| {
        let token = session.token();
        spawn_local(async move {
            if let Some(token) = token {
                let _ = crate::system::session::api::logout(&token).await;
            }
        });
        session.teardown();
    };

    view! {
        <div style="display: flex; flex-direction: column; height: 100vh;">
            <header style="display: flex; align-items: center; justify-content: space-between; padding: 8px 16px; border-bottom: 1px solid #ddd; flex-shrink: 0;">
                <h1 style="margin: 0; font-size: 1.2rem;">"SIG — Planejamento"</h1>
                <div style="display: flex; align-items: center; gap: 12px;">
                    <span style="color: #666;">
                        {move || planning.scenario.get().map(|s| s.description).unwrap_or_default()}
                    </span>
                    <span style="color: #666;">
                        {move || session.user().map(|u| u.username).unwrap_or_default()}
                    </span>
                    <button class="btn btn-secondary" on:click=on_logout>"Sair"</button>
                </div>
            </header>

            {move || scenario_error.get().map(|e| view! {
                <div class="error" style="background: #fee; color: #c33; padding: 8px; margin: 8px 16px; border-radius: 4px;">{e}</div>
            })}

            <div style="display: flex; flex: 1; min-height: 0;">
                <aside style="width: 320px; border-right: 1px solid #ddd; overflow-y: auto; padding: 8px;">
                    <ScopeNavigator />
                </aside>

                <main style="flex: 1; overflow-y: auto; padding: 8px 16px;">
                    {move || match planning.selected.get() {
                        // Recreated per scope so the grid always starts from
                        // server state for the scope it renders.
                        Some(scope) => view! {
                            <PremisesEditor scope=scope />
                            <CostPanel scope=scope />
                        }
                        .into_any(),
                        None => view! {
                            <p style="color: #888; padding: 24px;">
                                "Selecione uma empresa, cliente ou seção na árvore ao lado."
                            </p>
                        }
                        .into_any(),
                    }}
                </main>
            </div>
        </div>
    }
}

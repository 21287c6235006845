use contracts::domain::s001_scope::SelectedScope;
use contracts::domain::s003_cost::{CostCalcRequest, CostSummary};
use leptos::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

use super::super::api;
use crate::layout::planning_context::use_planning;
use crate::shared::components::empty_state::EmptyState;
use crate::shared::debounce::RequestGuard;
use crate::shared::number_format::format_money;
use crate::system::session::use_session;

const MONTH_HEADERS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Read-only cost panel for the selected scope. The calculation itself runs
/// server-side; this panel only triggers it and renders the aggregates.
#[component]
pub fn CostPanel(scope: SelectedScope) -> impl IntoView {
    let session = use_session();
    let planning = use_planning();

    let summary = RwSignal::new(Option::<CostSummary>::None);
    let (error, set_error) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(true);
    let (is_calculating, set_is_calculating) = signal(false);
    let load_guard = RequestGuard::new();

    // Read at use time so a scenario swap is never served the old year.
    let year = move || planning.horizon().start_year;
    let scenario_id = move || planning.scenario.get_untracked().map(|s| s.id);

    let load_summary = move || {
        let (Some(token), Some(sid)) = (session.token(), scenario_id()) else {
            return;
        };
        let year = year();
        let req = load_guard.issue();
        set_is_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::fetch_summary(&token, sid, &scope, year).await;
            if !load_guard.is_current(req) {
                return;
            }
            match result {
                Ok(data) => {
                    summary.set(Some(data));
                    set_is_loading.set(false);
                }
                Err(e) => {
                    session.handle_gateway_error(&e);
                    set_error.set(Some(format!("Falha ao carregar custos: {}", e)));
                    summary.set(None);
                    set_is_loading.set(false);
                }
            }
        });
    };
    load_summary();

    let on_calculate = move |_| {
        if is_calculating.get_untracked() {
            return;
        }
        let (Some(token), Some(sid)) = (session.token(), scenario_id()) else {
            return;
        };
        let request = CostCalcRequest {
            scenario_id: sid,
            scope,
            year: year(),
        };
        set_is_calculating.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::trigger_calculation(&token, &request).await {
                Ok(()) => {
                    set_is_calculating.set(false);
                    load_summary();
                }
                Err(e) => {
                    session.handle_gateway_error(&e);
                    set_is_calculating.set(false);
                    set_error.set(Some(format!("Falha ao calcular custos: {}", e)));
                }
            }
        });
    };

    view! {
        <section>
            <div style="display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px;">
                <h2 style="margin: 0;">{move || format!("Custos {}", year())}</h2>
                <button
                    class="btn btn-secondary"
                    disabled=move || is_calculating.get()
                    on:click=on_calculate
                >
                    {move || if is_calculating.get() { "Calculando..." } else { "Recalcular" }}
                </button>
            </div>

            {move || error.get().map(|e| view! {
                <div class="error" style="background: #fee; color: #c33; padding: 8px; border-radius: 4px; margin-bottom: 8px;">{e}</div>
            })}

            {move || {
                if is_loading.get() {
                    return view! { <div style="color: #888; padding: 12px;">"Carregando..."</div> }.into_any();
                }
                let Some(data) = summary.get() else {
                    let retry: Rc<dyn Fn()> = Rc::new(load_summary);
                    return view! {
                        <EmptyState
                            message="Sem custos calculados para o escopo.".to_string()
                            on_retry=Some(retry)
                        />
                    }
                    .into_any();
                };
                if data.rows.is_empty() {
                    return view! {
                        <div style="color: #888; padding: 12px;">
                            "Nenhuma rubrica de custo. Use \"Recalcular\" após salvar as premissas."
                        </div>
                    }
                    .into_any();
                }
                view! {
                    <div class="table-container" style="overflow-x: auto;">
                        <table style="border-collapse: collapse; white-space: nowrap;">
                            <thead>
                                <tr>
                                    <th style="border-bottom: 2px solid #ddd; padding: 4px 8px; text-align: left;">"Rubrica"</th>
                                    {MONTH_HEADERS.iter().map(|m| view! {
                                        <th style="border-bottom: 2px solid #ddd; padding: 4px 8px; text-align: right;">{*m}</th>
                                    }).collect_view()}
                                    <th style="border-bottom: 2px solid #ddd; padding: 4px 8px; text-align: right;">"Total"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {data.rows.iter().map(|row| {
                                    let label = row.label.clone();
                                    let totals = row.monthly_totals.clone();
                                    let total = row.total;
                                    view! {
                                        <tr>
                                            <td style="padding: 4px 8px; border-bottom: 1px solid #eee;">{label}</td>
                                            {(0..12).map(|i| {
                                                let v = totals.get(i).copied().unwrap_or(0.0);
                                                view! {
                                                    <td style="padding: 4px 8px; border-bottom: 1px solid #eee; text-align: right;">
                                                        {format_money(v)}
                                                    </td>
                                                }
                                            }).collect_view()}
                                            <td style="padding: 4px 8px; border-bottom: 1px solid #eee; text-align: right; font-weight: 600;">
                                                {format_money(total)}
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }
                .into_any()
            }}
        </section>
    }
}

use contracts::domain::s001_scope::SelectedScope;
use contracts::domain::s002_premise::{BulkUpsertRequest, Role};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

use super::super::api;
use super::super::grid::{month_axis, CellField, CellKey, EditBuffer};
use crate::layout::planning_context::use_planning;
use crate::shared::components::empty_state::EmptyState;
use crate::shared::debounce::RequestGuard;
use crate::system::session::use_session;

/// Batch editor of monthly per-role assumptions for one scope.
///
/// All cell edits live in the in-memory buffer; the network is touched only
/// by the initial load and the bulk save. The component is recreated per
/// scope, so the buffer never survives a scope change.
#[component]
pub fn PremisesEditor(scope: SelectedScope) -> impl IntoView {
    let session = use_session();
    let planning = use_planning();

    // The column axis is fixed for the editor's lifetime; a malformed
    // horizon fails here, before any network activity.
    let axis = match month_axis(planning.horizon()) {
        Ok(axis) => axis,
        Err(e) => {
            return view! {
                <div class="error" style="background: #fee; color: #c33; padding: 8px; border-radius: 4px; margin: 8px 0;">
                    {format!("Período de planejamento inválido: {}", e)}
                </div>
            }
            .into_any();
        }
    };
    let year_from = axis.first().map(|ym| ym.year).unwrap_or_default();
    let year_to = axis.last().map(|ym| ym.year).unwrap_or_default();
    let axis = StoredValue::new(axis);

    let roles = RwSignal::new(Vec::<Role>::new());
    let buffer = RwSignal::new(EditBuffer::default());
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(true);
    let (is_saving, set_is_saving) = signal(false);
    let (copy_source, set_copy_source) = signal(0usize);
    let (copy_target, set_copy_target) = signal(0usize);
    let load_guard = RequestGuard::new();

    let scenario_id = move || planning.scenario.get_untracked().map(|s| s.id);

    // Full reload: fetch roles and persisted records, then rebuild the
    // buffer with total coverage (server values or defaults per cell).
    let load_assumptions = move || {
        let (Some(token), Some(sid)) = (session.token(), scenario_id()) else {
            return;
        };
        let req = load_guard.issue();
        set_is_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let loaded = async {
                let role_list = api::fetch_roles(&token, &scope).await?;
                let records =
                    api::fetch_assumptions(&token, sid, &scope, year_from, year_to).await?;
                Ok::<_, crate::shared::error::GatewayError>((role_list, records))
            }
            .await;

            // A newer load (or a disposed editor) supersedes this response.
            if !load_guard.is_current(req) {
                return;
            }
            match loaded {
                Ok((role_list, records)) => {
                    log::info!(
                        "premises: {} roles, {} persisted records",
                        role_list.len(),
                        records.len()
                    );
                    axis.with_value(|axis| {
                        buffer.set(EditBuffer::rebuild(&role_list, axis, &records));
                    });
                    roles.set(role_list);
                    planning.grid_dirty.set(false);
                    set_is_loading.set(false);
                }
                Err(e) => {
                    session.handle_gateway_error(&e);
                    set_error.set(Some(format!("Falha ao carregar premissas: {}", e)));
                    roles.set(Vec::new());
                    set_is_loading.set(false);
                }
            }
        });
    };
    load_assumptions();

    // Commit one cell on change. Invalid input is rejected by the buffer;
    // the re-render snaps the input back to the previous value.
    let on_cell_change = move |key: CellKey, field: CellField, raw: String| {
        let applied = buffer
            .try_update(|b| b.set_field(key, field, &raw))
            .unwrap_or(false);
        if applied {
            planning.grid_dirty.set(true);
        } else {
            log::warn!("rejected non-numeric cell input: {:?}", raw);
            // Notify anyway so the input re-renders from the buffer.
            buffer.update(|_| {});
        }
    };

    let on_copy_month = move |_| {
        let (src_idx, dst_idx) = (copy_source.get(), copy_target.get());
        if src_idx == dst_idx {
            return;
        }
        let (Some(src), Some(dst)) = axis.with_value(|axis| {
            (axis.get(src_idx).copied(), axis.get(dst_idx).copied())
        }) else {
            return;
        };
        let role_list = roles.get_untracked();
        buffer.update(|b| b.copy_month(&role_list, src, dst));
        planning
            .grid_dirty
            .set(buffer.with_untracked(|b| b.is_dirty()));
    };

    let on_save = move |_| {
        if is_saving.get_untracked() {
            return;
        }
        let (Some(token), Some(sid)) = (session.token(), scenario_id()) else {
            return;
        };
        let role_list = roles.get_untracked();
        let records = axis.with_value(|axis| buffer.with_untracked(|b| b.to_records(&role_list, axis)));
        let request = BulkUpsertRequest {
            scenario_id: sid,
            scope,
            records,
        };
        set_is_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::bulk_upsert(&token, &request).await {
                Ok(()) => {
                    set_is_saving.set(false);
                    set_notice.set(Some("Premissas salvas.".to_string()));
                    spawn_local(async move {
                        TimeoutFuture::new(3_000).await;
                        set_notice.set(None);
                    });
                    // Resync with server truth (normalization, concurrent
                    // edits by other users).
                    load_assumptions();
                }
                Err(e) => {
                    // The buffer is untouched: nothing was cleared or
                    // partially applied, the user retries manually.
                    session.handle_gateway_error(&e);
                    set_is_saving.set(false);
                    set_error.set(Some(format!("Falha ao salvar premissas: {}", e)));
                }
            }
        });
    };

    let month_options = move || {
        axis.with_value(|axis| {
            axis.iter()
                .enumerate()
                .map(|(i, ym)| view! { <option value=i.to_string()>{ym.label()}</option> })
                .collect_view()
        })
    };

    view! {
        <section style="margin-bottom: 24px;">
            <div style="display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px;">
                <h2 style="margin: 0;">"Premissas mensais"</h2>
                <div style="display: flex; align-items: center; gap: 8px;">
                    <select on:change=move |ev| {
                        if let Ok(i) = event_target_value(&ev).parse() { set_copy_source.set(i); }
                    }>
                        {month_options()}
                    </select>
                    <span style="color: #666;">"→"</span>
                    <select on:change=move |ev| {
                        if let Ok(i) = event_target_value(&ev).parse() { set_copy_target.set(i); }
                    }>
                        {month_options()}
                    </select>
                    <button class="btn btn-secondary" on:click=on_copy_month>
                        "Copiar mês"
                    </button>
                    <button
                        class="btn btn-primary"
                        disabled=move || is_saving.get()
                        on:click=on_save
                    >
                        {move || if is_saving.get() { "Salvando..." } else { "Salvar tudo" }}
                    </button>
                </div>
            </div>

            {move || notice.get().map(|n| view! {
                <div style="background: #e6f4ea; color: #1e7e34; padding: 8px; border-radius: 4px; margin-bottom: 8px;">{n}</div>
            })}
            {move || error.get().map(|e| view! {
                <div class="error" style="background: #fee; color: #c33; padding: 8px; border-radius: 4px; margin-bottom: 8px;">{e}</div>
            })}

            {move || {
                if is_loading.get() {
                    return view! { <div style="color: #888; padding: 12px;">"Carregando..."</div> }.into_any();
                }
                let role_list = roles.get();
                if role_list.is_empty() {
                    let retry: Rc<dyn Fn()> = Rc::new(load_assumptions);
                    return view! {
                        <EmptyState
                            message="Nenhum cargo para o escopo selecionado.".to_string()
                            on_retry=Some(retry)
                        />
                    }
                    .into_any();
                }
                let columns = axis.with_value(|a| a.clone());
                view! {
                    <div class="table-container" style="overflow-x: auto;">
                        <table style="border-collapse: collapse; white-space: nowrap;">
                            <thead>
                                <tr>
                                    <th rowspan="2" style="border-bottom: 2px solid #ddd; padding: 4px 8px; text-align: left;">"Cargo"</th>
                                    {columns.iter().map(|ym| view! {
                                        <th colspan="4" style="border-bottom: 1px solid #ddd; padding: 4px 8px;">{ym.label()}</th>
                                    }).collect_view()}
                                </tr>
                                <tr>
                                    {columns.iter().flat_map(|_| CellField::ALL.iter().map(|f| view! {
                                        <th style="border-bottom: 2px solid #ddd; padding: 2px 4px; font-size: 0.7rem; font-weight: 500; color: #666;">
                                            {f.label()}
                                        </th>
                                    })).collect_view()}
                                </tr>
                            </thead>
                            <tbody>
                                {role_list.iter().map(|role| {
                                    let role_id = role.id;
                                    let name = role.name.clone();
                                    let cols = columns.clone();
                                    view! {
                                        <tr>
                                            <td style="padding: 4px 8px; border-bottom: 1px solid #eee;">{name}</td>
                                            {cols.iter().flat_map(|ym| {
                                                let key = CellKey::new(role_id, *ym);
                                                CellField::ALL.iter().map(move |field| {
                                                    let field = *field;
                                                    view! {
                                                        <td style="border-bottom: 1px solid #eee; padding: 2px;">
                                                            <input
                                                                type="text"
                                                                style="width: 56px; padding: 2px 4px; border: 1px solid #ddd; border-radius: 3px; text-align: right;"
                                                                prop:value=move || buffer.with(|b| b.field_text(key, field))
                                                                on:change=move |ev| on_cell_change(key, field, event_target_value(&ev))
                                                            />
                                                        </td>
                                                    }
                                                })
                                            }).collect_view()}
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
    .into_any()
}

use contracts::domain::s001_scope::{ScopeNodeId, ScopeNodeKind};
use contracts::domain::s004_scenario::ScenarioId;
use leptos::prelude::*;
use std::collections::HashSet;
use wasm_bindgen_futures::spawn_local;

use super::super::api;
use super::super::arena::{LoadState, ScopeArena};
use crate::layout::planning_context::use_planning;
use crate::shared::components::empty_state::EmptyState;
use crate::shared::debounce::{debounce_window, RequestGuard};
use crate::system::session::use_session;

fn kind_tag(kind: ScopeNodeKind) -> &'static str {
    match kind {
        ScopeNodeKind::Company => "EMP",
        ScopeNodeKind::Client => "CLI",
        ScopeNodeKind::Section => "SEC",
        ScopeNodeKind::CostCenter => "CC",
    }
}

/// Rows of one node and its visible descendants, rendered from an arena
/// snapshot. With an active filter only matches and their ancestors are
/// kept, with their branches forced open; without one the per-node
/// expanded flags apply.
fn render_rows(
    arena_snapshot: &ScopeArena,
    id: ScopeNodeId,
    level: usize,
    visible: &Option<HashSet<ScopeNodeId>>,
    selected: Option<ScopeNodeId>,
    on_toggle: impl Fn(ScopeNodeId) + Copy + 'static,
    on_select: impl Fn(ScopeNodeId) + Copy + 'static,
    on_remove: impl Fn(ScopeNodeId) + Copy + 'static,
) -> Vec<AnyView> {
    let Some(node) = arena_snapshot.node(id) else {
        return vec![];
    };
    if let Some(visible) = visible {
        if !visible.contains(&id) {
            return vec![];
        }
    }

    let mut rows: Vec<AnyView> = Vec::new();

    let filtering = visible.is_some();
    let expandable = node.kind.child_kind().is_some() && node.has_children;
    let expanded = if filtering { true } else { node.expanded };
    let is_selected = selected == Some(id);
    let label = node.label.clone();
    let kind = node.kind;
    let load = node.load;

    let toggle: AnyView = if expandable {
        let chevron = if expanded { "▾" } else { "▸" };
        view! {
            <button
                class="tree-toggle"
                style="background: none; border: none; cursor: pointer; padding: 0; width: 16px; color: #666;"
                on:click=move |_| on_toggle(id)
            >
                {chevron}
            </button>
        }
        .into_any()
    } else {
        view! { <span style="display:inline-block; width: 16px;">{""}</span> }.into_any()
    };

    let row = view! {
        <div
            style=format!(
                "display: flex; align-items: center; gap: 6px; padding: 2px 4px 2px {}px; border-radius: 4px; background: {};",
                4 + level * 16,
                if is_selected { "#e7f1ff" } else { "transparent" }
            )
        >
            {toggle}
            <span style="font-size: 0.7rem; color: #999; width: 28px;">{kind_tag(kind)}</span>
            <span
                class="tree-label"
                style="cursor: pointer; flex: 1;"
                on:click=move |_| on_select(id)
            >
                {label}
            </span>
            <button
                title="Excluir"
                style="background: none; border: none; cursor: pointer; color: #c33; padding: 0 4px;"
                on:click=move |_| on_remove(id)
            >
                "×"
            </button>
        </div>
    }
    .into_any();
    rows.push(row);

    if expanded {
        match load {
            LoadState::Loading => {
                rows.push(
                    view! {
                        <div style=format!("padding-left: {}px; color: #888;", 24 + level * 16)>
                            "Carregando..."
                        </div>
                    }
                    .into_any(),
                );
            }
            LoadState::Failed => {
                rows.push(
                    view! {
                        <div style=format!("padding-left: {}px; color: #c33;", 24 + level * 16)>
                            "Falha ao carregar. Clique na seta para tentar novamente."
                        </div>
                    }
                    .into_any(),
                );
            }
            LoadState::Loaded | LoadState::Unloaded => {
                for child in arena_snapshot.children(id).to_vec() {
                    rows.extend(render_rows(
                        arena_snapshot,
                        child,
                        level + 1,
                        visible,
                        selected,
                        on_toggle,
                        on_select,
                        on_remove,
                    ));
                }
            }
        }
    }

    rows
}

/// Hierarchy navigator: Company → Client → Section → CostCenter tree with
/// lazy child loading. The deepest selected node defines the scope every
/// sibling panel filters by.
#[component]
pub fn ScopeNavigator() -> impl IntoView {
    let session = use_session();
    let planning = use_planning();

    let arena = RwSignal::new(ScopeArena::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);
    let (filter_text, set_filter_text) = signal(String::new());
    let (filter_input, set_filter_input) = signal(String::new());
    let search_guard = RequestGuard::new();
    let roots_guard = RequestGuard::new();

    let scenario_id = move || planning.scenario.get().map(|s| s.id);

    let load_roots = move |sid: ScenarioId| {
        let Some(token) = session.token() else {
            return;
        };
        let req = roots_guard.issue();
        set_is_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::fetch_root_nodes(&token, sid).await;
            // A scenario switch mid-flight supersedes this response.
            if !roots_guard.is_current(req) {
                return;
            }
            match result {
                Ok(list) => {
                    log::info!("loaded {} root scope nodes", list.len());
                    arena.update(|a| a.set_roots(list));
                    planning.selected.set(None);
                    set_is_loading.set(false);
                }
                Err(e) => {
                    session.handle_gateway_error(&e);
                    set_error.set(Some(format!("Falha ao carregar árvore: {}", e)));
                    set_is_loading.set(false);
                }
            }
        });
    };

    // Roots are (re)fetched whenever the active scenario becomes available
    // or changes.
    Effect::new(move |_| {
        if let Some(sid) = scenario_id() {
            load_roots(sid);
        }
    });

    // Debounce: the filter takes effect only after a typing pause, and a
    // newer keystroke supersedes the pending one.
    let handle_input_change = move |value: String| {
        set_filter_input.set(value.clone());
        let token = search_guard.issue();
        spawn_local(async move {
            debounce_window().await;
            if search_guard.is_current(token) {
                set_filter_text.set(value);
            }
        });
    };

    let on_toggle = move |id: ScopeNodeId| {
        let was_expanded = arena
            .with_untracked(|a| a.node(id).map(|n| n.expanded))
            .unwrap_or(false);
        if was_expanded {
            arena.update(|a| a.collapse(id));
            return;
        }

        let need_fetch = arena.try_update(|a| a.begin_load(id)).unwrap_or(false);
        if !need_fetch {
            // Already loaded (re-expanded in begin_load) or in flight.
            return;
        }

        let fetch_params = arena.with_untracked(|a| {
            let node = a.node(id)?;
            let child_kind = node.kind.child_kind()?;
            let scope = a.scope_of(id)?;
            Some((child_kind, scope))
        });
        let (Some((child_kind, scope)), Some(sid), Some(token)) =
            (fetch_params, scenario_id(), session.token())
        else {
            arena.update(|a| a.fail_load(id));
            return;
        };

        spawn_local(async move {
            match api::fetch_children(&token, sid, id, child_kind, &scope).await {
                Ok(children) => {
                    arena.update(|a| a.finish_load(id, children));
                }
                Err(e) => {
                    // A child-fetch failure stays local to the node; the
                    // rest of the tree remains usable.
                    session.handle_gateway_error(&e);
                    log::warn!("child fetch failed for node: {}", e);
                    arena.update(|a| a.fail_load(id));
                }
            }
        });
    };

    let on_select = move |id: ScopeNodeId| {
        if planning.has_unsaved_edits() {
            let confirmed = web_sys::window()
                .map(|w| {
                    w.confirm_with_message(
                        "Existem alterações não salvas nas premissas. Descartar e trocar de escopo?",
                    )
                    .unwrap_or(false)
                })
                .unwrap_or(true);
            if !confirmed {
                return;
            }
            planning.grid_dirty.set(false);
        }
        arena.update(|a| a.select(id));
        // Same-tick propagation: dependent panels see the new scope before
        // the next render, no stale-scope flash.
        planning
            .selected
            .set(arena.with_untracked(|a| a.selected_scope()));
    };

    let on_remove = move |id: ScopeNodeId| {
        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message("Excluir este nó e todos os seus descendentes?")
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(token) = session.token() else {
            return;
        };
        spawn_local(async move {
            match api::delete_node(&token, id).await {
                Ok(()) => {
                    arena.update(|a| a.remove(id));
                    planning
                        .selected
                        .set(arena.with_untracked(|a| a.selected_scope()));
                }
                Err(e) => {
                    session.handle_gateway_error(&e);
                    set_error.set(Some(format!("Falha ao excluir: {}", e)));
                }
            }
        });
    };

    let retry = move || {
        if let Some(sid) = scenario_id() {
            load_roots(sid);
        }
    };

    view! {
        <div>
            <div style="display: flex; align-items: center; gap: 8px; margin-bottom: 8px;">
                <input
                    type="text"
                    placeholder="Buscar..."
                    style="flex: 1; padding: 6px 10px; border: 1px solid #ddd; border-radius: 4px;"
                    prop:value=move || filter_input.get()
                    on:input=move |ev| handle_input_change(event_target_value(&ev))
                />
                <button class="btn btn-secondary" title="Atualizar" on:click=move |_| retry()>
                    "↻"
                </button>
            </div>

            {move || error.get().map(|e| view! {
                <div class="error" style="background: #fee; color: #c33; padding: 8px; border-radius: 4px; margin-bottom: 8px;">{e}</div>
            })}

            {move || {
                if is_loading.get() {
                    return view! { <div style="color: #888; padding: 12px;">"Carregando..."</div> }.into_any();
                }
                let snapshot = arena.get();
                let filter = filter_text.get();
                let visible = snapshot.search(&filter);
                if snapshot.is_empty() {
                    let retry_cb: std::rc::Rc<dyn Fn()> = std::rc::Rc::new(retry);
                    return view! {
                        <EmptyState
                            message="Nenhuma empresa no cenário ativo.".to_string()
                            on_retry=Some(retry_cb)
                        />
                    }
                    .into_any();
                }
                if visible.as_ref().is_some_and(|v| v.is_empty()) {
                    return view! {
                        <div style="color: #888; padding: 12px;">"Nada encontrado no filtro."</div>
                    }
                    .into_any();
                }
                let selected = snapshot.selected();
                let rows = snapshot
                    .roots()
                    .to_vec()
                    .into_iter()
                    .flat_map(|root| {
                        render_rows(
                            &snapshot, root, 0, &visible, selected,
                            on_toggle, on_select, on_remove,
                        )
                    })
                    .collect::<Vec<_>>();
                rows.into_view().into_any()
            }}
        </div>
    }
}

//! Owned node table of the scope hierarchy.
//!
//! Arena + index pattern: the arena exclusively owns every node, keyed by id;
//! parent links, children lists and the current selection store ids, never
//! node references, so a refresh that replaces the node set cannot leave a
//! dangling selection behind.
//!
//! Per-node lazy-load state machine:
//! `Unloaded → Loading → Loaded(children)`; `Loaded` nodes toggle
//! collapsed/expanded without reloading, and a failed load drops back to a
//! retryable error state.

use contracts::domain::s001_scope::{ScopeNodeDto, ScopeNodeId, ScopeNodeKind, SelectedScope};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Children never fetched
    Unloaded,
    /// Fetch in flight
    Loading,
    /// Children present in the arena
    Loaded,
    /// Last fetch failed; equivalent to `Unloaded` plus an error marker,
    /// so the next expand retries
    Failed,
}

#[derive(Debug, Clone)]
pub struct ScopeNode {
    pub id: ScopeNodeId,
    pub kind: ScopeNodeKind,
    pub label: String,
    pub parent_id: Option<ScopeNodeId>,
    /// Server-side hint used to draw the expand chevron before the first load
    pub has_children: bool,
    /// `None` means "not fetched yet", which is distinct from an empty list
    children: Option<Vec<ScopeNodeId>>,
    pub load: LoadState,
    pub expanded: bool,
}

impl ScopeNode {
    fn from_dto(dto: ScopeNodeDto) -> Self {
        Self {
            id: dto.id,
            kind: dto.kind,
            label: dto.label,
            parent_id: dto.parent_id,
            has_children: dto.has_children,
            children: None,
            load: LoadState::Unloaded,
            expanded: false,
        }
    }

    pub fn children_loaded(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScopeArena {
    nodes: HashMap<ScopeNodeId, ScopeNode>,
    roots: Vec<ScopeNodeId>,
    selected: Option<ScopeNodeId>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node(&self, id: ScopeNodeId) -> Option<&ScopeNode> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[ScopeNodeId] {
        &self.roots
    }

    /// Loaded children of a node; empty both for leaf nodes and for nodes
    /// whose children were never fetched.
    pub fn children(&self, id: ScopeNodeId) -> &[ScopeNodeId] {
        self.nodes
            .get(&id)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
    }

    /// Replace the whole node set with freshly fetched roots. Clears the
    /// selection: it holds an id, so it cannot dangle, but the node it named
    /// is gone.
    pub fn set_roots(&mut self, dtos: Vec<ScopeNodeDto>) {
        self.nodes.clear();
        self.roots.clear();
        self.selected = None;
        for dto in dtos {
            let node = ScopeNode::from_dto(dto);
            self.roots.push(node.id);
            self.nodes.insert(node.id, node);
        }
    }

    /// First half of `expand`. Returns `true` when a children fetch must be
    /// issued; a `Loaded` node merely re-expands and a `Loading` node has a
    /// fetch in flight already, so repeat expands issue no second request.
    pub fn begin_load(&mut self, id: ScopeNodeId) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        match node.load {
            LoadState::Loaded => {
                node.expanded = true;
                false
            }
            LoadState::Loading => false,
            LoadState::Unloaded | LoadState::Failed => {
                node.load = LoadState::Loading;
                true
            }
        }
    }

    /// Store fetched children and expand the node. Only a node with a fetch
    /// in flight may receive them: a refresh via [`set_roots`](Self::set_roots)
    /// resets every node to `Unloaded`, so a response that comes back late,
    /// issued before the refresh, is dropped here.
    pub fn finish_load(&mut self, id: ScopeNodeId, dtos: Vec<ScopeNodeDto>) {
        if self.nodes.get(&id).map(|n| n.load) != Some(LoadState::Loading) {
            return;
        }
        let mut child_ids = Vec::with_capacity(dtos.len());
        for dto in dtos {
            let mut child = ScopeNode::from_dto(dto);
            child.parent_id = Some(id);
            child_ids.push(child.id);
            self.nodes.insert(child.id, child);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = Some(child_ids);
            node.load = LoadState::Loaded;
            node.expanded = true;
        }
    }

    /// A failed fetch leaves the node retryable; nodes already on screen
    /// stay usable. Same recency rule as `finish_load`: a late failure from
    /// before a refresh does not touch the fresh node.
    pub fn fail_load(&mut self, id: ScopeNodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.load == LoadState::Loading {
                node.load = LoadState::Failed;
                node.expanded = false;
            }
        }
    }

    /// Collapse keeps the loaded children: expand/collapse is cheap and
    /// reversible, with no re-fetch on repeated toggling.
    pub fn collapse(&mut self, id: ScopeNodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.expanded = false;
        }
    }

    /// Any node kind is selectable, leaves and internals alike.
    pub fn select(&mut self, id: ScopeNodeId) {
        if self.nodes.contains_key(&id) {
            self.selected = Some(id);
        }
    }

    pub fn selected(&self) -> Option<ScopeNodeId> {
        self.selected
    }

    /// Chain from the node to the root, starting at the node itself.
    fn parent_chain(&self, id: ScopeNodeId) -> Vec<&ScopeNode> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            chain.push(node);
            cursor = node.parent_id;
        }
        chain
    }

    /// Derive the filter context from the current selection by walking the
    /// parent chain. Selecting a cost center scopes to its section.
    pub fn selected_scope(&self) -> Option<SelectedScope> {
        self.scope_of(self.selected?)
    }

    /// Filter context of an arbitrary node (used when expanding: the child
    /// listing is scoped by the parent chain, not by the selection).
    pub fn scope_of(&self, id: ScopeNodeId) -> Option<SelectedScope> {
        let mut company_id = None;
        let mut client_id = None;
        let mut section_id = None;
        for node in self.parent_chain(id) {
            match node.kind {
                ScopeNodeKind::Company => company_id = Some(node.id),
                ScopeNodeKind::Client => client_id = Some(node.id),
                ScopeNodeKind::Section => section_id = Some(node.id),
                ScopeNodeKind::CostCenter => {}
            }
        }
        Some(SelectedScope {
            company_id: company_id?,
            client_id,
            section_id,
        })
    }

    /// Client-side substring filter over already-loaded labels.
    ///
    /// Returns the set of nodes to keep visible: every match plus its
    /// ancestors. Unloaded subtrees are not fetched, so a query matching
    /// only unloaded data yields an empty set (documented limitation).
    /// `None` means "no filter active".
    pub fn search(&self, query: &str) -> Option<HashSet<ScopeNodeId>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        let mut visible = HashSet::new();
        for node in self.nodes.values() {
            if node.label.to_lowercase().contains(&query) {
                for ancestor in self.parent_chain(node.id) {
                    visible.insert(ancestor.id);
                }
            }
        }
        Some(visible)
    }

    /// Remove a node and its subtree after the gateway confirmed the delete.
    /// A selection inside the removed subtree falls back to the removed
    /// node's parent, or to none at the root.
    pub fn remove(&mut self, id: ScopeNodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let parent_id = node.parent_id;

        // Drop the whole subtree from the arena.
        let mut stack = vec![id];
        let mut dropped = HashSet::new();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                dropped.insert(current);
                if let Some(children) = node.children {
                    stack.extend(children);
                }
            }
        }

        // Unlink from the parent's children list (or the root list).
        match parent_id {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    if let Some(children) = parent.children.as_mut() {
                        children.retain(|c| *c != id);
                    }
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        if self.selected.is_some_and(|s| dropped.contains(&s)) {
            self.selected = parent_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::s001_scope::ScopeNodeKind::*;

    fn dto(kind: ScopeNodeKind, label: &str, has_children: bool) -> ScopeNodeDto {
        ScopeNodeDto {
            id: ScopeNodeId::new_v4(),
            kind,
            label: label.to_string(),
            parent_id: None,
            has_children,
        }
    }

    /// Company → Client → Section chain, children loaded all the way down.
    fn arena_with_chain() -> (ScopeArena, ScopeNodeId, ScopeNodeId, ScopeNodeId) {
        let mut arena = ScopeArena::new();
        let company = dto(Company, "Empresa A", true);
        let company_id = company.id;
        arena.set_roots(vec![company]);

        assert!(arena.begin_load(company_id));
        let client = dto(Client, "Cliente Norte", true);
        let client_id = client.id;
        arena.finish_load(company_id, vec![client]);

        assert!(arena.begin_load(client_id));
        let section = dto(Section, "Seção Portaria", false);
        let section_id = section.id;
        arena.finish_load(client_id, vec![section]);

        (arena, company_id, client_id, section_id)
    }

    #[test]
    fn expand_twice_issues_one_fetch() {
        let mut arena = ScopeArena::new();
        let root = dto(Company, "Empresa A", true);
        let root_id = root.id;
        arena.set_roots(vec![root]);

        assert!(arena.begin_load(root_id));
        // Second expand while the fetch is in flight: no new request.
        assert!(!arena.begin_load(root_id));

        arena.finish_load(root_id, vec![dto(Client, "Cliente", false)]);
        // Expand after load: still no new request, just re-expansion.
        assert!(!arena.begin_load(root_id));
        assert!(arena.node(root_id).unwrap().expanded);
    }

    #[test]
    fn collapse_keeps_loaded_children() {
        let (mut arena, company_id, client_id, _) = arena_with_chain();

        arena.collapse(company_id);
        assert!(!arena.node(company_id).unwrap().expanded);
        assert_eq!(arena.children(company_id), &[client_id]);
        // Re-expand without a fetch.
        assert!(!arena.begin_load(company_id));
    }

    #[test]
    fn failed_load_is_retryable() {
        let mut arena = ScopeArena::new();
        let root = dto(Company, "Empresa A", true);
        let root_id = root.id;
        arena.set_roots(vec![root]);

        assert!(arena.begin_load(root_id));
        arena.fail_load(root_id);
        assert_eq!(arena.node(root_id).unwrap().load, LoadState::Failed);
        assert!(!arena.node(root_id).unwrap().children_loaded());

        // Retry issues a new fetch.
        assert!(arena.begin_load(root_id));
    }

    #[test]
    fn selected_scope_walks_parent_chain() {
        let (mut arena, company_id, client_id, section_id) = arena_with_chain();

        arena.select(section_id);
        let scope = arena.selected_scope().unwrap();
        assert_eq!(scope.company_id, company_id);
        assert_eq!(scope.client_id, Some(client_id));
        assert_eq!(scope.section_id, Some(section_id));

        // Non-leaf selection is allowed and narrows the scope accordingly.
        arena.select(client_id);
        let scope = arena.selected_scope().unwrap();
        assert_eq!(scope.company_id, company_id);
        assert_eq!(scope.client_id, Some(client_id));
        assert_eq!(scope.section_id, None);
    }

    #[test]
    fn remove_selected_falls_back_to_parent() {
        let (mut arena, _, client_id, section_id) = arena_with_chain();

        arena.select(section_id);
        arena.remove(section_id);

        assert_eq!(arena.selected(), Some(client_id));
        assert!(arena.node(section_id).is_none());
        assert!(arena.children(client_id).is_empty());
    }

    #[test]
    fn remove_selected_root_clears_selection() {
        let mut arena = ScopeArena::new();
        let root = dto(Company, "Empresa A", false);
        let root_id = root.id;
        arena.set_roots(vec![root]);

        arena.select(root_id);
        arena.remove(root_id);

        assert_eq!(arena.selected(), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn remove_with_selection_in_subtree_falls_back() {
        let (mut arena, company_id, client_id, section_id) = arena_with_chain();

        // Selection sits below the removed node.
        arena.select(section_id);
        arena.remove(client_id);

        assert_eq!(arena.selected(), Some(company_id));
        assert!(arena.node(client_id).is_none());
        assert!(arena.node(section_id).is_none());
    }

    #[test]
    fn search_matches_loaded_labels_and_ancestors() {
        let (arena, company_id, client_id, section_id) = arena_with_chain();

        let visible = arena.search("portaria").unwrap();
        assert!(visible.contains(&section_id));
        assert!(visible.contains(&client_id));
        assert!(visible.contains(&company_id));

        // Case-insensitive substring.
        let visible = arena.search("NORTE").unwrap();
        assert!(visible.contains(&client_id));
        assert!(!visible.contains(&section_id));
    }

    #[test]
    fn search_over_unloaded_data_yields_empty_set() {
        let mut arena = ScopeArena::new();
        // has_children hints at unloaded data below; search must not fetch it.
        arena.set_roots(vec![dto(Company, "Empresa A", true)]);

        let visible = arena.search("portaria").unwrap();
        assert!(visible.is_empty());
    }

    #[test]
    fn blank_query_means_no_filter() {
        let (arena, _, _, _) = arena_with_chain();
        assert!(arena.search("").is_none());
        assert!(arena.search("   ").is_none());
    }

    #[test]
    fn late_child_response_after_refresh_is_dropped() {
        let mut arena = ScopeArena::new();
        let company = dto(Company, "Empresa A", true);
        let company_id = company.id;
        arena.set_roots(vec![company.clone()]);

        assert!(arena.begin_load(company_id));
        // A scenario switch rebuilds the arena, bringing back the same
        // company id, while the child fetch is still in flight.
        arena.set_roots(vec![company]);

        // The old scenario's children arrive late: they must not attach to
        // the fresh node.
        arena.finish_load(company_id, vec![dto(Client, "Cliente Antigo", false)]);
        let node = arena.node(company_id).unwrap();
        assert_eq!(node.load, LoadState::Unloaded);
        assert!(!node.children_loaded());
        assert!(arena.children(company_id).is_empty());

        // Same for a late failure: the fresh node stays pristine.
        arena.fail_load(company_id);
        assert_eq!(arena.node(company_id).unwrap().load, LoadState::Unloaded);

        // A fetch issued for the fresh node still lands normally.
        assert!(arena.begin_load(company_id));
        arena.finish_load(company_id, vec![dto(Client, "Cliente Novo", false)]);
        assert_eq!(arena.node(company_id).unwrap().load, LoadState::Loaded);
        assert_eq!(arena.children(company_id).len(), 1);
    }

    #[test]
    fn set_roots_replaces_node_set_and_clears_selection() {
        let (mut arena, _, _, section_id) = arena_with_chain();
        arena.select(section_id);

        arena.set_roots(vec![dto(Company, "Empresa B", false)]);

        assert_eq!(arena.selected(), None);
        assert_eq!(arena.roots().len(), 1);
        assert!(arena.node(section_id).is_none());
    }
}

use crate::domain::common::EntityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of an organizational scope node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeNodeId(pub Uuid);

impl ScopeNodeId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl EntityId for ScopeNodeId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ScopeNodeId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Node kind
// ============================================================================

/// Level of a node in the organizational hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeNodeKind {
    Company,
    Client,
    Section,
    CostCenter,
}

impl ScopeNodeKind {
    /// Kind of the children one level below, if the level can have children.
    pub fn child_kind(&self) -> Option<ScopeNodeKind> {
        match self {
            ScopeNodeKind::Company => Some(ScopeNodeKind::Client),
            ScopeNodeKind::Client => Some(ScopeNodeKind::Section),
            ScopeNodeKind::Section => Some(ScopeNodeKind::CostCenter),
            ScopeNodeKind::CostCenter => None,
        }
    }

    /// Wire name used in query-string filters
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeNodeKind::Company => "company",
            ScopeNodeKind::Client => "client",
            ScopeNodeKind::Section => "section",
            ScopeNodeKind::CostCenter => "costCenter",
        }
    }
}

// ============================================================================
// Wire DTO
// ============================================================================

/// One hierarchy node as returned by the scope listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeNodeDto {
    pub id: ScopeNodeId,

    pub kind: ScopeNodeKind,

    pub label: String,

    #[serde(rename = "parentId")]
    pub parent_id: Option<ScopeNodeId>,

    /// Server-side hint; children are still fetched lazily on first expand
    #[serde(rename = "hasChildren")]
    pub has_children: bool,
}

// ============================================================================
// Derived selection view
// ============================================================================

/// The (company, client, section) filter context shared by every panel.
///
/// Built by walking the selected node's parent chain up to the root.
/// Read-only: a new value is produced on every selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedScope {
    #[serde(rename = "companyId")]
    pub company_id: ScopeNodeId,

    #[serde(rename = "clientId")]
    pub client_id: Option<ScopeNodeId>,

    #[serde(rename = "sectionId")]
    pub section_id: Option<ScopeNodeId>,
}

impl SelectedScope {
    pub fn company(company_id: ScopeNodeId) -> Self {
        Self {
            company_id,
            client_id: None,
            section_id: None,
        }
    }

    /// Query-string fragment for the gateway list endpoints
    pub fn to_query(&self) -> String {
        let mut q = format!("companyId={}", self.company_id.as_string());
        if let Some(client_id) = self.client_id {
            q.push_str(&format!("&clientId={}", client_id.as_string()));
        }
        if let Some(section_id) = self.section_id {
            q.push_str(&format!("&sectionId={}", section_id.as_string()));
        }
        q
    }
}

use abm_graph::{AttrValue, Edge, EdgeId};

use crate::agent::AgentId;

/// Agent-facing view of a graph edge.
///
/// Derived on demand from an edge plus the agent back-references recorded
/// in its attribute bag at link-creation time; never stored. The view owns
/// a snapshot of the bag so callers can hold it while mutating agents.
#[derive(Debug, Clone)]
pub struct Link {
    pub edge: EdgeId,
    pub from_agent: AgentId,
    pub to_agent: AgentId,
    pub label: String,
    pub weight: f64,
    attrs: abm_graph::attr::AttrBag,
}

impl Link {
    /// Build the view from an edge. Returns `None` if the edge was not
    /// created through the model (no agent back-references).
    pub fn from_edge(edge: &Edge) -> Option<Link> {
        let from_agent = edge.attrs.get("from_agent")?.as_id()?;
        let to_agent = edge.attrs.get("to_agent")?.as_id()?;
        Some(Link {
            edge: edge.id,
            from_agent: AgentId(from_agent),
            to_agent: AgentId(to_agent),
            label: edge.label.clone(),
            weight: edge.weight,
            attrs: edge.attrs.clone(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.attrs.get(name).and_then(|v| v.as_i64())
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).and_then(|v| v.as_f64())
    }
}

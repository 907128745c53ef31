use std::collections::BTreeMap;

use abm_graph::{AttrValue, EdgeId, Graph};
use thiserror::Error;

use crate::agent::{Agent, AgentId};
use crate::link::Link;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("agent not found: {0}")]
    AgentNotFound(String),
    #[error("network not found: {0}")]
    NetworkNotFound(String),
}

/// Owns all agent-class buckets and all named network graphs.
///
/// Constructed once per simulation run; agents and graphs accumulate
/// incrementally and are only removed through explicit per-agent
/// destruction. Per-step bookkeeping (created/destroyed counters, the
/// dead-agent list) is reset exactly once per accepted tick.
#[derive(Debug, Default)]
pub struct Model {
    next_agent_id: u64,
    classes: BTreeMap<String, Vec<Agent>>,
    graphs: BTreeMap<String, Graph>,
    step: u64,
    last_reset_step: Option<u64>,
    created_this_step: usize,
    destroyed_this_step: usize,
    dead_agents: Vec<Agent>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of agent ids handed out so far. Not the live population:
    /// it never decreases.
    pub fn agent_count(&self) -> u64 {
        self.next_agent_id
    }

    pub fn created_this_step(&self) -> usize {
        self.created_this_step
    }

    pub fn destroyed_this_step(&self) -> usize {
        self.destroyed_this_step
    }

    /// Agents destroyed during the current step, for a presentation
    /// collaborator to reconcile.
    pub fn dead_agents(&self) -> &[Agent] {
        &self.dead_agents
    }

    /// Monotonic count of accepted ticks.
    pub fn step_counter(&self) -> u64 {
        self.step
    }

    /// Start a new accepted tick: bump the step counter and reset the
    /// per-step bookkeeping.
    pub fn begin_step(&mut self) {
        self.step += 1;
        self.reset_step_bookkeeping();
    }

    /// Reset the per-step counters and dead list. Keyed to the step
    /// counter, so coalesced triggers calling this again within the same
    /// accepted tick are no-ops.
    pub fn reset_step_bookkeeping(&mut self) {
        if self.last_reset_step == Some(self.step) {
            return;
        }
        self.last_reset_step = Some(self.step);
        self.created_this_step = 0;
        self.destroyed_this_step = 0;
        self.dead_agents.clear();
    }

    /// Create `count` agents in `class_name`, lazily creating the bucket.
    /// Each agent gets a globally unique, monotonically increasing id
    /// regardless of class. Callers set further fields via
    /// [`agent_mut`](Model::agent_mut).
    pub fn create_agents(&mut self, count: usize, class_name: &str) -> Vec<AgentId> {
        let bucket = self.classes.entry(class_name.to_string()).or_default();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = AgentId(self.next_agent_id);
            self.next_agent_id += 1;
            bucket.push(Agent::new(id, class_name));
            ids.push(id);
            self.created_this_step += 1;
        }
        ids
    }

    /// Destroy an agent: remove it from its class bucket and move it to
    /// the dead list.
    ///
    /// Removal matches on *name* within the bucket, not id; duplicate
    /// names keep first-match behavior. See DESIGN.md.
    pub fn destroy_agent(&mut self, id: AgentId) -> Result<(), ModelError> {
        let (class, name) = match self.agent(id) {
            Some(a) => (a.class_name.clone(), a.name.clone()),
            None => return Err(ModelError::AgentNotFound(id.to_string())),
        };
        let bucket = self
            .classes
            .get_mut(&class)
            .ok_or_else(|| ModelError::AgentNotFound(name.clone()))?;
        match bucket.iter().position(|a| a.name == name) {
            Some(idx) => {
                let dead = bucket.remove(idx);
                self.dead_agents.push(dead);
                self.destroyed_this_step += 1;
                Ok(())
            }
            None => Err(ModelError::AgentNotFound(name)),
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.classes
            .values()
            .flat_map(|bucket| bucket.iter())
            .find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.classes
            .values_mut()
            .flat_map(|bucket| bucket.iter_mut())
            .find(|a| a.id == id)
    }

    /// Find an agent by display name: linear scan across all classes,
    /// first match wins. Accepted O(agents) cost at simulation sizes in
    /// the hundreds.
    pub fn get_agent(&self, name: &str) -> Option<&Agent> {
        self.classes
            .values()
            .flat_map(|bucket| bucket.iter())
            .find(|a| a.name == name)
    }

    pub fn get_agent_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.classes
            .values_mut()
            .flat_map(|bucket| bucket.iter_mut())
            .find(|a| a.name == name)
    }

    /// Agents of one class, in creation order. Empty slice for unknown
    /// classes.
    pub fn class_agents(&self, class_name: &str) -> &[Agent] {
        self.classes
            .get(class_name)
            .map(|b| b.as_slice())
            .unwrap_or(&[])
    }

    pub fn graph(&self, network: &str) -> Option<&Graph> {
        self.graphs.get(network)
    }

    pub fn graph_mut(&mut self, network: &str) -> Option<&mut Graph> {
        self.graphs.get_mut(network)
    }

    pub fn networks(&self) -> impl Iterator<Item = (&str, &Graph)> {
        self.graphs.iter().map(|(name, g)| (name.as_str(), g))
    }

    /// Link two agents (possibly of different classes) in a named network,
    /// lazily creating the (directed) network graph on first reference.
    ///
    /// The agents' ids become their vertex ids; `from_agent`/`to_agent`
    /// back-references go into the edge bag for later [`Link`] views. On
    /// an unresolved name the operation aborts with no partial mutation.
    pub fn create_link(
        &mut self,
        network: &str,
        name1: &str,
        name2: &str,
    ) -> Result<EdgeId, ModelError> {
        let a1 = match self.get_agent(name1) {
            Some(a) => a.id,
            None => {
                tracing::error!(network, agent = name1, "create_link: agent not found");
                return Err(ModelError::AgentNotFound(name1.to_string()));
            }
        };
        let a2 = match self.get_agent(name2) {
            Some(a) => a.id,
            None => {
                tracing::error!(network, agent = name2, "create_link: agent not found");
                return Err(ModelError::AgentNotFound(name2.to_string()));
            }
        };

        let graph = self
            .graphs
            .entry(network.to_string())
            .or_insert_with(|| Graph::new(true));
        let edge = graph.connect_vertices(a1.vertex(), a2.vertex(), "", 0.0);
        graph.set_edge_attr(edge, "from_agent", AttrValue::Id(a1.0));
        graph.set_edge_attr(edge, "to_agent", AttrValue::Id(a2.0));

        if let Some(agent) = self.agent_mut(a1) {
            agent.graph_vertex.insert(network.to_string(), a1.vertex());
        }
        if let Some(agent) = self.agent_mut(a2) {
            agent.graph_vertex.insert(network.to_string(), a2.vertex());
        }

        Ok(edge)
    }

    /// Set a typed attribute on a link's underlying edge.
    pub fn set_link_attr(
        &mut self,
        network: &str,
        edge: EdgeId,
        key: &str,
        value: AttrValue,
    ) -> Result<(), ModelError> {
        let graph = self
            .graphs
            .get_mut(network)
            .ok_or_else(|| ModelError::NetworkNotFound(network.to_string()))?;
        graph.set_edge_attr(edge, key, value);
        Ok(())
    }

    /// Links entering an agent in a named network; empty if the agent is
    /// not a node there.
    pub fn in_links(&self, id: AgentId, network: &str) -> Vec<Link> {
        self.adjacent_links(id, network, false)
    }

    /// Links leaving an agent in a named network; empty if the agent is
    /// not a node there.
    pub fn out_links(&self, id: AgentId, network: &str) -> Vec<Link> {
        self.adjacent_links(id, network, true)
    }

    fn adjacent_links(&self, id: AgentId, network: &str, outgoing: bool) -> Vec<Link> {
        let vertex = match self
            .agent(id)
            .and_then(|a| a.graph_vertex.get(network).copied())
        {
            Some(v) => v,
            None => return Vec::new(),
        };
        let graph = match self.graphs.get(network) {
            Some(g) => g,
            None => return Vec::new(),
        };
        let v = match graph.vertex(vertex) {
            Some(v) => v,
            None => return Vec::new(),
        };
        let edge_ids = if outgoing { &v.out_edges } else { &v.in_edges };
        edge_ids
            .iter()
            .filter_map(|eid| graph.edge(*eid))
            .filter_map(Link::from_edge)
            .collect()
    }
}

use std::collections::BTreeMap;

use thiserror::Error;

use crate::attr::AttrValue;
use crate::edge::{Edge, EdgeId};
use crate::vertex::{Vertex, VertexId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex id {0} already exists")]
    DuplicateVertex(VertexId),
    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),
}

/// Directed or undirected multigraph.
///
/// Directedness is fixed at construction and copied onto every edge.
/// Invariant: every edge in the master list appears in the out list of its
/// from-vertex and the in list of its to-vertex; undirected edges appear
/// in the reciprocal lists as well.
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    next_vertex_id: u64,
    next_edge_id: u64,
    vertices: BTreeMap<VertexId, Vertex>,
    edges: BTreeMap<EdgeId, Edge>,
    /// Set whenever topology changes; a render-side collaborator clears it
    /// after rebuilding whatever it derives from the graph.
    dirty: bool,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            next_vertex_id: 0,
            next_edge_id: 0,
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Vertices in id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Master edge list, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Add a vertex with the next auto-assigned id. Auto ids are strictly
    /// increasing and never reused within this graph.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = VertexId(self.next_vertex_id);
        self.next_vertex_id += 1;
        self.vertices.insert(id, Vertex::new(id));
        self.dirty = true;
        id
    }

    /// Add a vertex with a caller-supplied id. Duplicate ids are rejected,
    /// never silently overwritten.
    pub fn add_vertex_with_id(&mut self, id: VertexId) -> Result<VertexId, GraphError> {
        if self.vertices.contains_key(&id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        self.vertices.insert(id, Vertex::new(id));
        // Keep auto-assignment ahead of explicit ids.
        if id.0 >= self.next_vertex_id {
            self.next_vertex_id = id.0 + 1;
        }
        self.dirty = true;
        Ok(id)
    }

    /// Connect two vertices with a new edge, creating either endpoint if it
    /// does not exist yet. No duplicate-edge detection: parallel edges
    /// between the same pair are a valid graph shape.
    ///
    /// The edge is appended to the master list, `v1.out_edges` and
    /// `v2.in_edges`; if the graph is undirected it is additionally
    /// appended to `v1.in_edges` and `v2.out_edges` so traversal works in
    /// both directions.
    pub fn connect_vertices(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        label: &str,
        weight: f64,
    ) -> EdgeId {
        if !self.vertices.contains_key(&v1) {
            self.vertices.insert(v1, Vertex::new(v1));
            if v1.0 >= self.next_vertex_id {
                self.next_vertex_id = v1.0 + 1;
            }
        }
        if !self.vertices.contains_key(&v2) {
            self.vertices.insert(v2, Vertex::new(v2));
            if v2.0 >= self.next_vertex_id {
                self.next_vertex_id = v2.0 + 1;
            }
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.insert(
            id,
            Edge {
                id,
                directed: self.directed,
                from: v1,
                to: v2,
                label: label.to_string(),
                weight,
                attrs: Default::default(),
            },
        );

        let a = self.vertices.get_mut(&v1).expect("endpoint created above");
        a.out_edges.push(id);
        let b = self.vertices.get_mut(&v2).expect("endpoint created above");
        b.in_edges.push(id);
        if !self.directed {
            let a = self.vertices.get_mut(&v1).expect("endpoint created above");
            a.in_edges.push(id);
            let b = self.vertices.get_mut(&v2).expect("endpoint created above");
            b.out_edges.push(id);
        }

        self.dirty = true;
        id
    }

    /// Set an attribute on an edge. Returns false if the edge is unknown.
    pub fn set_edge_attr(&mut self, edge: EdgeId, key: &str, value: AttrValue) -> bool {
        match self.edges.get_mut(&edge) {
            Some(e) => {
                e.attrs.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Remove a vertex, every edge incident to it in either direction, and
    /// all adjacency references to those edges in neighboring vertices.
    ///
    /// The incident set is collected before anything is touched, so there
    /// is no intermediate state where an edge is half-removed.
    pub fn delete_vertex(&mut self, id: VertexId) -> Result<(), GraphError> {
        if !self.vertices.contains_key(&id) {
            return Err(GraphError::VertexNotFound(id));
        }

        let incident: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|e| e.from == id || e.to == id)
            .map(|e| e.id)
            .collect();

        for eid in &incident {
            self.edges.remove(eid);
        }
        self.vertices.remove(&id);
        for v in self.vertices.values_mut() {
            v.out_edges.retain(|eid| !incident.contains(eid));
            v.in_edges.retain(|eid| !incident.contains(eid));
        }

        self.dirty = true;
        Ok(())
    }

    pub(crate) fn reset_visited(&mut self) {
        for v in self.vertices.values_mut() {
            v.visited = false;
        }
    }
}

use core::fmt;

use crate::attr::AttrBag;
use crate::edge::EdgeId;

/// Unique vertex identifier within one [`Graph`](crate::Graph).
///
/// The model layer assigns agent ids as vertex ids by convention, so an
/// agent occupies the same numeric id in every network it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A graph vertex: ordered adjacency lists plus an open attribute bag.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub name: String,
    /// Edges leaving this vertex, in insertion order.
    pub out_edges: Vec<EdgeId>,
    /// Edges entering this vertex, in insertion order.
    pub in_edges: Vec<EdgeId>,
    /// Traversal bookkeeping for flatten; transient.
    pub(crate) visited: bool,
    pub attrs: AttrBag,
}

impl Vertex {
    pub(crate) fn new(id: VertexId) -> Self {
        Self {
            id,
            name: String::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            visited: false,
            attrs: AttrBag::new(),
        }
    }
}

use core::fmt;

use crate::attr::AttrBag;
use crate::vertex::VertexId;

/// Unique edge identifier within one [`Graph`](crate::Graph).
///
/// Ids are monotonic; iterating the master list in id order reproduces
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A graph edge. An undirected edge is a single object registered in the
/// adjacency lists of both endpoints in both directions.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    /// Copied from the owning graph at creation time.
    pub directed: bool,
    pub from: VertexId,
    pub to: VertexId,
    pub label: String,
    pub weight: f64,
    pub attrs: AttrBag,
}

impl Edge {
    /// The endpoint reached by traversing this edge away from `v`.
    ///
    /// For a directed edge this is always `to`; for an undirected edge it
    /// is whichever endpoint `v` is not, so traversal code does not need
    /// to special-case direction.
    pub fn opposite(&self, v: VertexId) -> VertexId {
        if !self.directed && self.to == v {
            self.from
        } else {
            self.to
        }
    }
}

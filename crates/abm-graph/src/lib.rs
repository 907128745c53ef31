//! Lightweight network graph library for agent-based models.
//!
//! Vertices normally coincide 1:1 with agents in the model layer; several
//! independently-named graphs may share one id space. Parallel edges are
//! legal (multigraph semantics).

#![forbid(unsafe_code)]

pub mod attr;
pub mod edge;
pub mod flatten;
pub mod graph;
pub mod vertex;

pub use attr::AttrValue;
pub use edge::{Edge, EdgeId};
pub use flatten::PathStep;
pub use graph::{Graph, GraphError};
pub use vertex::{Vertex, VertexId};

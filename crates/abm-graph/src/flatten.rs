//! Depth-first graph linearization.
//!
//! Flattens a graph into maximal contiguous paths for consumers that want
//! polyline-shaped output. Visited marks bound the work to O(V+E) and
//! guarantee termination on cycles.

use crate::graph::Graph;
use crate::vertex::VertexId;

/// One element of a flattened graph: a vertex on the current path, or a
/// break ending the current maximal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Vertex(VertexId),
    Break,
}

impl Graph {
    /// Linearize the whole graph into contiguous paths.
    ///
    /// Roots are taken in vertex-id order; out-edges are followed in
    /// insertion order. Each maximal path ends with [`PathStep::Break`].
    pub fn flatten(&mut self) -> Vec<PathStep> {
        self.flatten_filtered(None)
    }

    /// Linearize, following only edges whose label matches `label` exactly.
    ///
    /// Needed when several independently-named networks share one vertex
    /// set: indiscriminate traversal would cross networks.
    pub fn flatten_labelled(&mut self, label: &str) -> Vec<PathStep> {
        self.flatten_filtered(Some(label))
    }

    fn flatten_filtered(&mut self, label: Option<&str>) -> Vec<PathStep> {
        self.reset_visited();
        let roots: Vec<VertexId> = self.vertices().map(|v| v.id).collect();
        let mut out = Vec::new();
        for id in roots {
            let visited = self
                .vertex(id)
                .map(|v| v.visited)
                .unwrap_or(true);
            if !visited {
                self.follow_links(id, label, &mut out);
            }
        }
        out
    }

    /// Recursive depth-first path follower. A visited vertex or one with
    /// no out-edges terminates the current path.
    fn follow_links(&mut self, id: VertexId, label: Option<&str>, out: &mut Vec<PathStep>) {
        let (visited, out_edges) = {
            let v = match self.vertex(id) {
                Some(v) => v,
                None => return,
            };
            (v.visited, v.out_edges.clone())
        };

        if visited || out_edges.is_empty() {
            if let Some(v) = self.vertex_mut(id) {
                v.visited = true;
            }
            out.push(PathStep::Vertex(id));
            out.push(PathStep::Break);
            return;
        }

        if let Some(v) = self.vertex_mut(id) {
            v.visited = true;
        }
        for eid in out_edges {
            let next = {
                let e = match self.edge(eid) {
                    Some(e) => e,
                    None => continue,
                };
                if let Some(want) = label {
                    if e.label != want {
                        continue;
                    }
                }
                e.opposite(id)
            };
            out.push(PathStep::Vertex(id));
            self.follow_links(next, label, out);
        }
    }
}

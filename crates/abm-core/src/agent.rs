use core::fmt;
use std::collections::BTreeMap;

use abm_graph::VertexId;

use crate::math::{Mat4, Vec3};

/// Process-lifetime-unique agent identifier.
///
/// Assigned monotonically by the [`Model`](crate::Model) and never reused,
/// even across destruction, so a dangling external reference fails safe
/// instead of aliasing a newer agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub u64);

impl AgentId {
    /// The vertex id this agent occupies in every network it joins
    /// (agent-id and vertex-id spaces are unified by convention).
    pub fn vertex(self) -> VertexId {
        VertexId(self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{}", self.0)
    }
}

/// An entity with identity, spatial state, and bindings into zero or more
/// named networks.
///
/// Position and orientation changes set `dirty` so a presentation
/// collaborator can cheaply find what to redraw.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    /// Display name; secondary lookup key, uniqueness not enforced.
    pub name: String,
    pub class_name: String,
    pub position: Vec3,
    pub transform: Mat4,
    pub visible: bool,
    pub dirty: bool,
    pub size: f64,
    /// Network name -> the vertex representing this agent there.
    pub graph_vertex: BTreeMap<String, VertexId>,
}

impl Agent {
    pub(crate) fn new(id: AgentId, class_name: &str) -> Self {
        Self {
            id,
            name: id.to_string(),
            class_name: class_name.to_string(),
            position: Vec3::ZERO,
            transform: Mat4::identity(),
            visible: true,
            dirty: true,
            size: 1.0,
            graph_vertex: BTreeMap::new(),
        }
    }

    pub fn set_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.position = Vec3::new(x, y, z);
        self.dirty = true;
    }

    pub fn set_position(&mut self, p: Vec3) {
        self.position = p;
        self.dirty = true;
    }

    /// Move by `d` in the agent's local frame (as oriented by `transform`).
    pub fn move_by(&mut self, d: Vec3) {
        self.transform.set_translation(self.position);
        self.transform = self.transform.translated(d);
        self.position = self.transform.translation();
        self.dirty = true;
    }

    /// Forward is -z in the local frame, matching the look-at basis.
    pub fn forward(&mut self, d: f64) {
        self.move_by(Vec3::new(0.0, 0.0, -d));
    }

    pub fn back(&mut self, d: f64) {
        self.move_by(Vec3::new(0.0, 0.0, d));
    }

    pub fn left(&mut self, d: f64) {
        self.move_by(Vec3::new(-d, 0.0, 0.0));
    }

    pub fn right(&mut self, d: f64) {
        self.move_by(Vec3::new(d, 0.0, 0.0));
    }

    pub fn up(&mut self, d: f64) {
        self.move_by(Vec3::new(0.0, d, 0.0));
    }

    pub fn down(&mut self, d: f64) {
        self.move_by(Vec3::new(0.0, -d, 0.0));
    }

    /// Re-orient so that successive [`forward`](Agent::forward) calls head
    /// toward `target`. No-op when the target is nearly coincident.
    pub fn face(&mut self, target: Vec3) {
        if self.position.distance(target) < 0.01 {
            return;
        }
        self.transform = Mat4::look_at(self.position, target);
        self.dirty = true;
    }

    pub fn move_to(&mut self, target: Vec3) {
        self.set_position(target);
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, p: Vec3) -> f64 {
        self.position.distance(p)
    }

    /// Axis-aligned bounding-box proximity test: true when this agent is
    /// within `half_span` of `center` on every axis. Cheap approximation
    /// used for arrival tests instead of exact Euclidean distance.
    pub fn within_box(&self, center: Vec3, half_span: f64) -> bool {
        (self.position.x - center.x).abs() <= half_span
            && (self.position.y - center.y).abs() <= half_span
            && (self.position.z - center.z).abs() <= half_span
    }
}

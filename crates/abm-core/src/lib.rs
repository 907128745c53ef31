//! Headless agent-based model runtime.
//!
//! Agents live in named class buckets owned by a [`Model`]; links between
//! agents are edges in named [`abm_graph::Graph`] networks. The runtime is
//! designed to run headless: a presentation collaborator polls dirty flags
//! and the per-step dead-agent list after each tick.

#![forbid(unsafe_code)]

pub mod agent;
pub mod link;
pub mod math;
pub mod model;
pub mod rng;
pub mod ticker;

pub use agent::{Agent, AgentId};
pub use link::Link;
pub use math::{Mat4, Vec3};
pub use model::{Model, ModelError};
pub use rng::StepRng;
pub use ticker::{Simulation, Ticker};

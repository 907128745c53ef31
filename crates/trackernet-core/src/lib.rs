//! London Underground simulation over the Trackernet train position feed.
//!
//! Stations and trains are agents in an [`abm_core::Model`]; each line is
//! a directed network graph whose links carry scheduled run times. Feed
//! snapshots place trains on the network and the step loop dead-reckons
//! them between refreshes.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod runtime;
pub mod topology;

pub use config::TrackernetConfig;
pub use error::{FeedError, PositionError};
pub use feed::{HttpCsvSource, PositionSource, Record, Snapshot};
pub use model::{TrackernetModel, TrainState, STATION_CLASS, TRAIN_CLASS};
pub use topology::{line_network, NetworkTopology, RunLink};

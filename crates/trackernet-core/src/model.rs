use std::collections::{BTreeMap, BTreeSet};

use abm_core::{AgentId, Link, Model, Simulation, StepRng, Vec3};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::TrackernetConfig;
use crate::error::{FeedError, PositionError};
use crate::feed::{field_f64, field_i64, Record, Snapshot};
use crate::topology::{self, line_network, NetworkTopology};

pub const STATION_CLASS: &str = "station";
pub const TRAIN_CLASS: &str = "train";

/// Nominal speed for a train reported at a platform (tts <= 0). It still
/// needs a velocity for the arrival test and onward movement.
const PLATFORM_HOLD_SPEED: f64 = 5.0;

/// Parking spot for trains whose position went non-finite, well away from
/// the network so they are visibly wrong rather than silently misplaced.
const FALLBACK_POSITION: Vec3 = Vec3::new(3_978_133.0, -15_712.0, 4_968_747.0);

/// Motion state a train carries between snapshots.
#[derive(Debug, Clone, Default)]
pub struct TrainState {
    pub from_node: Option<AgentId>,
    pub to_node: Option<AgentId>,
    pub direction: i64,
    pub line_code: String,
    /// Model-space units per step.
    pub velocity: f64,
}

/// The Underground model: station and train agents over per-line network
/// graphs, dead-reckoned between feed snapshots.
///
/// Owns a generic [`Model`] rather than extending one; everything
/// train-specific lives here, keyed by agent id.
pub struct TrackernetModel {
    core: Model,
    trains: BTreeMap<AgentId, TrainState>,
    last_data_time: Option<DateTime<Utc>>,
    fetch_in_flight: bool,
    fetch_requested: bool,
    rng: StepRng,
    config: TrackernetConfig,
}

impl TrackernetModel {
    pub fn new(config: TrackernetConfig) -> Self {
        Self {
            core: Model::new(),
            trains: BTreeMap::new(),
            last_data_time: None,
            fetch_in_flight: false,
            fetch_requested: false,
            rng: StepRng::new(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &TrackernetConfig {
        &self.config
    }

    pub fn core(&self) -> &Model {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut Model {
        &mut self.core
    }

    pub fn train_state(&self, id: AgentId) -> Option<&TrainState> {
        self.trains.get(&id)
    }

    pub fn last_data_time(&self) -> Option<DateTime<Utc>> {
        self.last_data_time
    }

    /// Build stations and line networks into the model.
    pub fn setup(
        &mut self,
        station_rows: &[Record],
        network: &NetworkTopology,
        project: impl Fn(f64, f64) -> Vec3,
    ) {
        let stations = topology::load_stations(&mut self.core, station_rows, project);
        let links = topology::build_network(&mut self.core, network);
        info!(stations, links, "model setup complete");
    }

    /// Place a train on the network from one feed observation: next
    /// station, seconds to reach it, and platform direction.
    ///
    /// At or past the platform (tts <= 0) the train snaps to the station.
    /// Otherwise it goes onto the matching inbound link, interpolated
    /// backward from the station by tts over the link's scheduled run
    /// time; a tts longer than the run time clamps to the link origin.
    pub fn position_agent(
        &mut self,
        id: AgentId,
        line_code: &str,
        time_to_station: f64,
        next_station: &str,
        direction: i64,
    ) -> Result<(), PositionError> {
        let station = self
            .core
            .get_agent(next_station)
            .ok_or_else(|| PositionError::StationNotFound(next_station.to_string()))?;
        let station_id = station.id;
        let station_pos = station.position;
        let network = line_network(line_code);

        if time_to_station <= 0.0 {
            let state = self.trains.entry(id).or_default();
            state.from_node = Some(station_id);
            state.to_node = Some(station_id);
            state.direction = direction;
            state.line_code = line_code.to_string();
            state.velocity = PLATFORM_HOLD_SPEED;
            if let Some(agent) = self.core.agent_mut(id) {
                agent.set_position(station_pos);
            }
            return Ok(());
        }

        let mut candidates = self.core.in_links(station_id, &network);
        let link = if candidates.len() == 1 {
            // A single inbound link is taken even when its direction code
            // disagrees with the feed (termini often report the return
            // platform's direction).
            let only = candidates.remove(0);
            if only.get_i64("direction") != Some(direction) {
                debug!(
                    line = line_code,
                    station = next_station,
                    direction,
                    "single inbound link overrides direction mismatch"
                );
            }
            Some(only)
        } else {
            candidates
                .into_iter()
                .find(|l| l.get_i64("direction") == Some(direction))
        };
        let link = link.ok_or_else(|| PositionError::NoMatchingLink {
            line: line_code.to_string(),
            station: next_station.to_string(),
            direction,
        })?;
        let runlink = link
            .get_f64("runlink")
            .filter(|r| *r > 0.0)
            .ok_or_else(|| PositionError::NoMatchingLink {
                line: line_code.to_string(),
                station: next_station.to_string(),
                direction,
            })?;

        let from_pos = match self.core.agent(link.from_agent) {
            Some(a) => a.position,
            None => {
                return Err(PositionError::StationNotFound(link.from_agent.to_string()));
            }
        };
        let to_pos = station_pos;

        let state = self.trains.entry(id).or_default();
        state.from_node = Some(link.from_agent);
        state.to_node = Some(link.to_agent);
        state.direction = direction;
        state.line_code = line_code.to_string();
        state.velocity = from_pos.distance(to_pos) / runlink;

        if let Some(agent) = self.core.agent_mut(id) {
            if time_to_station >= runlink {
                agent.set_position(from_pos);
            } else {
                let delta = to_pos - from_pos;
                agent.set_position(to_pos - delta * (time_to_station / runlink));
            }
            agent.face(to_pos);
        }
        Ok(())
    }

    /// Dead-reckon every train one step along its line.
    ///
    /// A train within its own step distance of the target station (cheap
    /// box test) picks a random onward link matching its direction; with
    /// none available it holds at the end of the line until the next
    /// snapshot retires or repositions it. Everything else just moves
    /// forward by its velocity.
    pub fn advance(&mut self) {
        let ids: Vec<AgentId> = self
            .core
            .class_agents(TRAIN_CLASS)
            .iter()
            .map(|a| a.id)
            .collect();

        for id in ids {
            let (to_node, velocity, direction, network) = match self.trains.get(&id) {
                Some(state) => match state.to_node {
                    Some(to) => (
                        to,
                        state.velocity,
                        state.direction,
                        line_network(&state.line_code),
                    ),
                    None => continue,
                },
                None => continue,
            };
            let to_pos = match self.core.agent(to_node) {
                Some(a) => a.position,
                None => continue,
            };
            let arrived = self
                .core
                .agent(id)
                .map(|a| a.within_box(to_pos, velocity))
                .unwrap_or(false);

            if arrived {
                let options: Vec<Link> = self
                    .core
                    .out_links(to_node, &network)
                    .into_iter()
                    .filter(|l| l.get_i64("direction") == Some(direction))
                    .collect();
                if options.is_empty() {
                    // End of the line. Hold here; the feed will retire or
                    // turn the train around.
                    continue;
                }
                let choice = &options[self.rng.pick_index(options.len())];
                let next_pos = match self.core.agent(choice.to_agent) {
                    Some(a) => a.position,
                    None => continue,
                };
                let runlink = match choice.get_f64("runlink").filter(|r| *r > 0.0) {
                    Some(r) => r,
                    None => continue,
                };
                let here = match self.core.agent(id) {
                    Some(a) => a.position,
                    None => continue,
                };
                if let Some(state) = self.trains.get_mut(&id) {
                    state.from_node = Some(to_node);
                    state.to_node = Some(choice.to_agent);
                    state.velocity = here.distance(next_pos) / runlink;
                }
                if let Some(agent) = self.core.agent_mut(id) {
                    agent.face(next_pos);
                }
            } else if let Some(agent) = self.core.agent_mut(id) {
                agent.forward(velocity);
            }

            // Bad topology data can send a position non-finite; park the
            // train somewhere obvious instead of propagating NaN.
            if let Some(agent) = self.core.agent_mut(id) {
                if !agent.position.is_finite() {
                    warn!(train = %agent.name, "non-finite position, parking train");
                    agent.set_position(FALLBACK_POSITION);
                }
            }
        }
    }

    /// Reconcile the model against a feed snapshot.
    ///
    /// A snapshot no newer than the held one is discarded whole (the feed
    /// republishes unchanged files). Otherwise every usable row creates or
    /// repositions its train, ages the reported tts by the snapshot's own
    /// age, and trains absent from the snapshot are destroyed. Returns
    /// whether the snapshot was applied.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        if let Some(held) = self.last_data_time {
            if snapshot.timestamp <= held {
                debug!(%held, received = %snapshot.timestamp, "stale snapshot discarded");
                return false;
            }
        }
        self.last_data_time = Some(snapshot.timestamp);

        let age = (Utc::now() - snapshot.timestamp).num_milliseconds() as f64 / 1000.0;
        let mut live: BTreeSet<String> = BTreeSet::new();
        let mut skipped = 0usize;

        for row in &snapshot.rows {
            let line = row.get("linecode").map(String::as_str).unwrap_or("");
            let set = row.get("setnumber").map(String::as_str).unwrap_or("");
            let trip = row.get("tripnumber").map(String::as_str).unwrap_or("");
            let station = row.get("stationcode").map(String::as_str).unwrap_or("");
            let direction = field_i64(row, "platformdirectioncode");
            let tts = field_f64(row, "timetostation(secs)");
            let (direction, tts) = match (direction, tts) {
                (Some(d), Some(t)) if !line.is_empty() && !station.is_empty() => (d, t),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let name = format!("{line}_{set}_{trip}");
            live.insert(name.clone());

            let id = match self.core.get_agent(&name) {
                Some(a) => a.id,
                None => {
                    let id = self.core.create_agents(1, TRAIN_CLASS)[0];
                    if let Some(agent) = self.core.agent_mut(id) {
                        agent.name = name.clone();
                    }
                    self.trains.insert(
                        id,
                        TrainState {
                            line_code: line.to_string(),
                            ..TrainState::default()
                        },
                    );
                    id
                }
            };

            match self.position_agent(id, line, tts - age, station, direction) {
                Ok(()) => {
                    if let Some(agent) = self.core.agent_mut(id) {
                        agent.visible = true;
                    }
                }
                Err(err) => {
                    debug!(train = %name, %err, "could not place train, hiding it");
                    if let Some(agent) = self.core.agent_mut(id) {
                        agent.visible = false;
                    }
                }
            }
        }

        let absent: Vec<AgentId> = self
            .core
            .class_agents(TRAIN_CLASS)
            .iter()
            .filter(|a| !live.contains(&a.name))
            .map(|a| a.id)
            .collect();
        for id in &absent {
            if self.core.destroy_agent(*id).is_ok() {
                self.trains.remove(id);
            }
        }

        info!(
            rows = snapshot.rows.len(),
            skipped,
            retired = absent.len(),
            trains = self.core.class_agents(TRAIN_CLASS).len(),
            "snapshot applied"
        );
        true
    }

    fn needs_fetch(&self, now: DateTime<Utc>) -> bool {
        if self.fetch_in_flight {
            return false;
        }
        match self.last_data_time {
            None => true,
            Some(held) => {
                (now - held).num_milliseconds() as f64 / 1000.0 > self.config.staleness_secs
            }
        }
    }

    /// True once per fetch decision; the runtime spawns the actual request.
    pub fn take_fetch_request(&mut self) -> bool {
        std::mem::take(&mut self.fetch_requested)
    }

    /// Completion of a fetch the runtime ran on this model's behalf.
    pub fn snapshot_received(&mut self, result: Result<Snapshot, FeedError>) {
        self.fetch_in_flight = false;
        match result {
            Ok(snapshot) => {
                self.apply_snapshot(&snapshot);
            }
            Err(err) => {
                warn!(%err, "feed fetch failed, keeping held data");
            }
        }
    }
}

impl Simulation for TrackernetModel {
    /// One accepted tick: either flag that fresh data is needed or advance
    /// every train, never both in the same tick.
    fn step(&mut self, _elapsed_seconds: f64) {
        self.core.begin_step();
        if self.needs_fetch(Utc::now()) {
            self.fetch_requested = true;
            self.fetch_in_flight = true;
        } else {
            self.advance();
        }
    }
}

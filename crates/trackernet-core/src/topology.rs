use std::collections::BTreeMap;

use abm_core::{Model, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::feed::{field_f64, Record};
use crate::model::STATION_CLASS;

/// One timetabled hop between adjacent stations: origin code, destination
/// code, and scheduled run time in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLink {
    pub o: String,
    pub d: String,
    pub r: f64,
}

/// Line code -> direction code (as a string key, "0"/"1") -> hops.
pub type NetworkTopology = BTreeMap<String, BTreeMap<String, Vec<RunLink>>>;

/// Name of the per-line network graph inside the model.
pub fn line_network(line_code: &str) -> String {
    format!("line_{line_code}")
}

/// Create a station agent per CSV row, positioned by `project` (lon, lat
/// in degrees to model space). Rows without a code or with unparseable
/// coordinates are skipped. Returns the number of stations created.
pub fn load_stations(
    model: &mut Model,
    rows: &[Record],
    project: impl Fn(f64, f64) -> Vec3,
) -> usize {
    let mut created = 0;
    for row in rows {
        let code = match row.get("#code").map(String::as_str) {
            Some(c) if !c.is_empty() => c,
            _ => continue,
        };
        let (lon, lat) = match (field_f64(row, "lon"), field_f64(row, "lat")) {
            (Some(lon), Some(lat)) => (lon, lat),
            _ => {
                warn!(station = code, "skipping station with bad coordinates");
                continue;
            }
        };
        let id = model.create_agents(1, STATION_CLASS)[0];
        if let Some(agent) = model.agent_mut(id) {
            agent.name = code.to_string();
            agent.set_position(project(lon, lat));
        }
        created += 1;
    }
    created
}

/// Build one directed network graph per line from the topology, linking
/// station agents and stamping each link with its run time and direction.
/// Hops naming an unknown station are logged and skipped. Returns the
/// number of links created.
pub fn build_network(model: &mut Model, topology: &NetworkTopology) -> usize {
    let mut created = 0;
    for (line, directions) in topology {
        let network = line_network(line);
        for (dir_key, hops) in directions {
            let direction: i64 = match dir_key.parse() {
                Ok(d) => d,
                Err(_) => {
                    warn!(line, dir_key, "skipping unparseable direction key");
                    continue;
                }
            };
            for hop in hops {
                let edge = match model.create_link(&network, &hop.o, &hop.d) {
                    Ok(e) => e,
                    Err(err) => {
                        warn!(line, from = %hop.o, to = %hop.d, %err, "skipping hop");
                        continue;
                    }
                };
                // create_link only fails before the graph edge exists, so
                // these cannot miss.
                let _ = model.set_link_attr(&network, edge, "runlink", hop.r.into());
                let _ = model.set_link_attr(&network, edge, "direction", direction.into());
                created += 1;
            }
        }
    }
    created
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use abm_core::{Simulation, Ticker};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::FeedError;
use crate::feed::{PositionSource, Snapshot};
use crate::model::TrackernetModel;

/// Drive the model's step loop until `max_steps` is reached (forever when
/// `None`).
///
/// Single-threaded over the model: the frame interval and fetch
/// completions are serialized through one select loop, and fetches run as
/// spawned tasks reporting back over a channel. The model itself never
/// crosses an await.
pub async fn run(
    mut model: TrackernetModel,
    source: Arc<dyn PositionSource>,
    max_steps: Option<u64>,
) -> anyhow::Result<()> {
    let step_time = Duration::from_secs_f64(model.config().step_time_secs);
    let mut ticker = Ticker::start(step_time, Instant::now());
    // Frames run finer than the step interval; the ticker gates which ones
    // become simulation steps.
    let mut frames = tokio::time::interval(Duration::from_millis(250).min(step_time));
    let (tx, mut rx) = mpsc::channel::<Result<Snapshot, FeedError>>(1);

    info!(?step_time, "runtime started");
    let mut steps = 0u64;
    loop {
        tokio::select! {
            _ = frames.tick() => {
                let Some(elapsed) = ticker.poll(Instant::now()) else {
                    continue;
                };
                model.step(elapsed.as_secs_f64());
                if model.take_fetch_request() {
                    debug!("dispatching feed fetch");
                    let source = Arc::clone(&source);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(source.acquire().await).await;
                    });
                }
                steps += 1;
                if let Some(max) = max_steps {
                    if steps >= max {
                        info!(steps, "step limit reached");
                        return Ok(());
                    }
                }
            }
            Some(result) = rx.recv() => {
                model.snapshot_received(result);
            }
        }
    }
}

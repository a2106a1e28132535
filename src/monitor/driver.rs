//! Periodic sampling thread and snapshot handoff.
//!
//! The sampler is built and dropped on its own thread so blocking device
//! clients never touch the async runtime, and NVML is released on the same
//! thread that initialized it. Consumers get whole snapshots through a
//! `watch` channel: the latest complete snapshot, or none yet.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::sync::watch;

use super::Sampler;
use crate::error::{Result, SamplerError};
use crate::models::SampleSnapshot;

/// Receiving end of the snapshot handoff.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<SampleSnapshot>>>;

/// What the sampler found at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities {
    pub gpu_name: Option<String>,
    pub temperature_sensor: bool,
}

/// Owns the sampling thread. Dropping it stops the thread.
pub struct SamplerDriver {
    snapshots: SnapshotReceiver,
    capabilities: Capabilities,
    /// Dropping the sender wakes the thread out of its sleep
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SamplerDriver {
    /// Start sampling every `interval` with the sampler `build` returns.
    ///
    /// Blocks until `build` has run on the new thread; its error is returned
    /// here and no thread keeps running.
    pub fn spawn<F>(interval: Duration, build: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Sampler> + Send + 'static,
    {
        let (tx, snapshots) = watch::channel(None);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Capabilities>>();

        let handle = thread::Builder::new()
            .name("sampler".into())
            .spawn(move || {
                let mut sampler = match build() {
                    Ok(sampler) => sampler,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let caps = Capabilities {
                    gpu_name: sampler.gpu_name().map(str::to_string),
                    temperature_sensor: sampler.has_temperature_sensor(),
                };
                if ready_tx.send(Ok(caps)).is_err() {
                    return;
                }
                run(&mut sampler, interval, &tx, &stop_rx);
                debug!("sampler thread exiting");
            })
            .map_err(|e| SamplerError::FatalInitFailure(format!("cannot start sampler thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(capabilities)) => Ok(Self {
                snapshots,
                capabilities,
                stop: Some(stop_tx),
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(SamplerError::FatalInitFailure(
                    "sampler thread died during construction".into(),
                ))
            }
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// A new receiver; it sees the current snapshot and every later one.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    /// Latest complete snapshot, if any tick has finished.
    pub fn latest(&self) -> Option<Arc<SampleSnapshot>> {
        self.snapshots.borrow().clone()
    }

    /// Stop scheduling ticks and wait for the thread (and the sampler's
    /// device handles) to go away.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sampler thread panicked");
            }
        }
    }
}

impl Drop for SamplerDriver {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Sample on fixed deadlines until stopped or nobody is listening.
/// Overrun ticks skip the missed deadlines instead of bunching up.
fn run(
    sampler: &mut Sampler,
    interval: Duration,
    tx: &watch::Sender<Option<Arc<SampleSnapshot>>>,
    stop: &mpsc::Receiver<()>,
) {
    let mut next = Instant::now();
    loop {
        let snapshot = Arc::new(sampler.sample());
        if tx.send(Some(snapshot)).is_err() {
            debug!("no snapshot receivers left");
            return;
        }

        next += interval;
        let now = Instant::now();
        if next <= now {
            let behind = now.duration_since(next).as_secs_f64();
            let skipped = (behind / interval.as_secs_f64()).floor() as u32 + 1;
            debug!("sampling overran by {:.3}s, skipping {} tick(s)", behind, skipped);
            next += interval * skipped;
        }

        match stop.recv_timeout(next.saturating_duration_since(Instant::now())) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

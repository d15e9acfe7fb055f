//! Tokio frame loop (feature `runtime`).
//!
//! ```text
//! interval tick ─► lock visual ─► advance(now) ─► frame() ─► unlock ─► sink.present(frame)
//! ```
//!
//! Input handlers share the same [`SharedVisual`] through the [`Driver`]
//! handle. The lock is never held across an await.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::model::{NodeId, Stage};
use crate::render::Frame;
use crate::{ClusterVisual, Error, Result, SharedVisual};

/// Where frames go. Implement this for whatever draws them.
#[async_trait]
pub trait FrameSink: Send + Sync + 'static {
    async fn present(&self, frame: Frame) -> Result<()>;
}

/// Publishes the latest frame on a watch channel.
#[derive(Debug)]
pub struct WatchSink {
    tx: watch::Sender<Option<Frame>>,
}

impl WatchSink {
    pub fn new() -> (Self, watch::Receiver<Option<Frame>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameSink for WatchSink {
    async fn present(&self, frame: Frame) -> Result<()> {
        self.tx.send(Some(frame)).map_err(|_| Error::DriverClosed)
    }
}

/// Handle to a running frame loop.
pub struct Driver {
    visual: SharedVisual,
    started: Instant,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Driver {
    /// Spawn the frame loop on the current tokio runtime.
    pub fn spawn<S: FrameSink>(visual: ClusterVisual, sink: S) -> Self {
        let period = Duration::from_millis(visual.config().frame_interval_ms.max(1));
        let visual = visual.into_shared();
        let started = Instant::now();
        let (stop, stop_rx) = watch::channel(false);

        let task = tokio::spawn(run(visual.clone(), sink, started, period, stop_rx));
        tracing::info!(period_ms = period.as_millis() as u64, "frame driver started");

        Self { visual, started, stop, task }
    }

    /// Milliseconds since the driver started.
    pub fn now(&self) -> u64 {
        elapsed_ms(self.started)
    }

    pub fn visual(&self) -> SharedVisual {
        self.visual.clone()
    }

    pub fn set_stage(&self, stage: Stage) -> bool {
        let now = self.now();
        self.visual.lock().set_stage(stage, now)
    }

    pub fn hover_enter(&self, id: NodeId) -> bool {
        let now = self.now();
        self.visual.lock().hover_enter(id, now)
    }

    pub fn hover_leave(&self, id: NodeId) {
        self.visual.lock().hover_leave(id);
    }

    /// Stop the loop, wait for it, and tear the visualization down.
    pub async fn shutdown(self) -> Result<()> {
        // The loop may already have exited on a sink failure.
        let _ = self.stop.send(true);
        self.task.await.map_err(|_| Error::DriverClosed)?;
        self.visual.lock().teardown();
        tracing::info!("frame driver stopped");
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn run<S: FrameSink>(
    visual: SharedVisual,
    sink: S,
    started: Instant,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = elapsed_ms(started);
                let frame = {
                    let mut v = visual.lock();
                    v.advance(now);
                    v.frame()
                };
                if let Err(e) = sink.present(frame).await {
                    tracing::warn!(error = %e, "frame sink failed, stopping driver");
                    break;
                }
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }
}

//! # hexmesh — Hexagonal Cluster Visualization Core
//!
//! Lays out a hexagonal lattice of nodes for a chosen [`Stage`], runs timed
//! chains of pulses between them, and projects the result into drawable
//! [`Frame`]s. Drawing itself is left to whoever consumes the frames.
//!
//! ## Design Principles
//!
//! 1. **Layout is a pure function**: `Stage → (nodes, edges)`, nothing else
//! 2. **One owner for time**: every delayed effect is a task in the
//!    scheduler's timer queue, tagged with a generation
//! 3. **Stage change is a hard cut**: new generation, fresh scene, and no
//!    timer from the old node set ever runs
//! 4. **Rendering is projection**: frames are derived, never stored
//!
//! ## Quick Start
//!
//! ```rust
//! use hexmesh::{ClusterVisual, Stage, VisualConfig};
//!
//! let mut visual = ClusterVisual::new(VisualConfig::default().with_seed(7))?;
//! visual.set_stage(Stage::Hive, 0);
//!
//! // Drive it from any clock, in milliseconds.
//! visual.advance(1_250);
//! let frame = visual.frame();
//! assert_eq!(frame.nodes.len(), 19);
//! # Ok::<(), hexmesh::Error>(())
//! ```
//!
//! ## Stages
//!
//! | Stage | Nodes | Chains | Behaviour |
//! |-------|-------|--------|-----------|
//! | `single` | 1 | 0 | lone node breathes every 2 s |
//! | `cluster` | 7 | 1 | one pulse chain |
//! | `hive` | 19 | 2 | two chains, 800 ms apart |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod layout;
pub mod scene;
pub mod scheduler;
pub mod render;
pub mod config;
pub mod timing;
#[cfg(feature = "runtime")]
pub mod driver;

use std::sync::Arc;

use parking_lot::Mutex;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Node, NodeId, Point, Axial, Edge, EdgeWeight,
    Pulse, PulseId, Activation, ActivationMap, Stage,
};
pub use layout::{Layout, layout_for};
pub use scene::Scene;
pub use scheduler::{Scheduler, SchedulerStats, Generation, TimerId};
pub use render::{Frame, NodeView, EdgeView, PulseView, project};
pub use config::VisualConfig;

// ============================================================================
// Top-level visualization handle
// ============================================================================

/// A cluster visualization: scene plus the scheduler that animates it.
///
/// Time is supplied by the caller in milliseconds and must not go backwards;
/// earlier timestamps are treated as "now".
#[derive(Debug)]
pub struct ClusterVisual {
    config: VisualConfig,
    scene: Scene,
    scheduler: Scheduler,
    now: u64,
    running: bool,
}

/// A visualization shared between a frame loop and input handlers.
pub type SharedVisual = Arc<Mutex<ClusterVisual>>;

impl ClusterVisual {
    /// Validate `config` and start the initial stage at time 0.
    pub fn new(config: VisualConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::start_with(config))
    }

    fn start_with(config: VisualConfig) -> Self {
        let scene = Scene::new(config.initial_stage);
        let mut scheduler = Scheduler::new(&config);
        scheduler.start(&scene, 0);
        let mut visual = Self { config, scene, scheduler, now: 0, running: true };
        visual.advance(0);
        visual
    }

    pub fn into_shared(self) -> SharedVisual {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.scene.stage()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn generation(&self) -> Generation {
        self.scheduler.generation()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn clock(&mut self, now: u64) -> u64 {
        self.now = self.now.max(now);
        self.now
    }

    /// Switch stage. Returns false if `stage` is already showing.
    pub fn set_stage(&mut self, stage: Stage, now: u64) -> bool {
        if stage == self.scene.stage() && self.running {
            return false;
        }
        self.restart_as(stage, now);
        true
    }

    /// Restart the current stage from scratch.
    pub fn restart(&mut self, now: u64) {
        self.restart_as(self.scene.stage(), now);
    }

    fn restart_as(&mut self, stage: Stage, now: u64) {
        let now = self.clock(now);
        self.scheduler.teardown();
        self.scene.reset(stage);
        self.scheduler.start(&self.scene, now);
        self.running = true;
        self.scheduler.advance(&mut self.scene, now);
    }

    /// Cancel all pending timers. The scene freezes until the next
    /// `set_stage` or `restart`.
    pub fn teardown(&mut self) {
        let generation = self.scheduler.teardown();
        self.running = false;
        tracing::debug!(generation = generation.0, "visualization torn down");
    }

    /// Run everything due by `now`. Returns the number of tasks run.
    pub fn advance(&mut self, now: u64) -> usize {
        let now = self.clock(now);
        self.scheduler.advance(&mut self.scene, now)
    }

    /// Pointer entered `id`: mark it hovered and try a burst.
    /// Returns whether a burst fired.
    pub fn hover_enter(&mut self, id: NodeId, now: u64) -> bool {
        let now = self.clock(now);
        self.scheduler.advance(&mut self.scene, now);
        self.scene.set_hovered(id);
        self.running && self.scheduler.burst(&mut self.scene, id, now)
    }

    /// Pointer left `id`.
    pub fn hover_leave(&mut self, id: NodeId) {
        self.scene.clear_hovered(id);
    }

    /// Snapshot at the current time.
    pub fn frame(&self) -> Frame {
        self.frame_at(self.now)
    }

    /// Snapshot at an arbitrary time, without advancing the scheduler.
    pub fn frame_at(&self, now: u64) -> Frame {
        render::project(&self.scene, now, self.config.canvas_center)
    }
}

impl Default for ClusterVisual {
    fn default() -> Self {
        Self::start_with(VisualConfig::default())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown stage: {0:?} (expected single, cluster or hive)")]
    UnknownStage(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Driver closed")]
    DriverClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

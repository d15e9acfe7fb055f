//! # Pulse Scheduler
//!
//! Drives signal traffic across the lattice. All work is expressed as tasks in
//! a [`TimerQueue`]; [`Scheduler::advance`] runs every task due by `now` in
//! deadline order and applies its effect to the [`Scene`].
//!
//! ## Beam lifecycle
//!
//! ```text
//!  t=0      Emit: source lit, pulse created        ──┐
//!  t=1200   Arrive: target lit                       │ one beam
//!  t=1500   ReleaseSource                            │
//!  t=1600   Expire: pulse dropped                    │
//!  t=2000   Settle: target released ─► Emit(target) ─┘ (chains only)
//! ```
//!
//! A chain never recurses: `Settle` runs the next emission inline and that
//! emission arms its own timers, so the stack depth stays constant however
//! long the chain runs.
//!
//! ## Cancellation
//!
//! [`Scheduler::start`] and [`Scheduler::teardown`] invalidate the queue, which
//! opens a new [`Generation`]. Timers armed under an older generation are
//! discarded before they can run.

pub mod timer;
pub mod hover;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use smallvec::{SmallVec, smallvec};

use crate::config::VisualConfig;
use crate::model::{Activation, NodeId, Pulse, PulseId, Stage};
use crate::scene::Scene;
use crate::timing::*;

pub use hover::HoverCooldown;
pub use timer::{Fired, Generation, TimerId, TimerQueue};

/// Targets of a single beam. A chain beam has one; a burst has a ring.
pub type Targets = SmallVec<[NodeId; 6]>;

/// Deferred unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Fire a beam from `from`. `chain` beams hand off on settle.
    Emit { from: NodeId, chain: bool },
    /// Pulses reached their targets.
    Arrive { targets: Targets },
    /// The emitting node goes dark.
    ReleaseSource { source: NodeId },
    /// Targets go dark; a chain continues from the first target.
    Settle { targets: Targets, chain: bool },
    /// Drop finished pulses.
    Expire { pulses: SmallVec<[PulseId; 6]> },
    /// Toggle the lone node on the single stage.
    Breathe,
}

/// Running counters, mostly for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub beams_fired: u64,
    pub beams_skipped: u64,
    pub bursts_fired: u64,
    pub bursts_suppressed: u64,
    pub breaths: u64,
}

pub struct Scheduler {
    timers: TimerQueue<Task>,
    rng: SmallRng,
    cooldown: HoverCooldown,
    retry_limit: u32,
    ring_tolerance: f64,
    next_pulse: u64,
    stats: SchedulerStats,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("generation", &self.timers.generation())
            .field("pending", &self.timers.pending())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Pick a uniformly random node index other than `from`.
///
/// Draws once, then retries up to `retry_limit` times while the draw equals
/// `from`. Returns `None` when every draw hit the source, which the caller
/// treats as "skip this beam".
pub fn pick_target<R: Rng + ?Sized>(
    rng: &mut R,
    node_count: usize,
    from: usize,
    retry_limit: u32,
) -> Option<usize> {
    if node_count == 0 {
        return None;
    }
    let mut pick = rng.gen_range(0..node_count);
    let mut attempts = 0;
    while pick == from && attempts < retry_limit {
        pick = rng.gen_range(0..node_count);
        attempts += 1;
    }
    (pick != from).then_some(pick)
}

impl Scheduler {
    pub fn new(config: &VisualConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            timers: TimerQueue::new(),
            rng,
            cooldown: HoverCooldown::new(HOVER_COOLDOWN_MS),
            retry_limit: config.target_retry_limit,
            ring_tolerance: config.nearest_ring_tolerance,
            next_pulse: 0,
            stats: SchedulerStats::default(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.timers.generation()
    }

    pub fn pending(&self) -> usize {
        self.timers.pending()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Earliest time at which `advance` would do any work.
    pub fn next_due(&mut self) -> Option<u64> {
        self.timers.next_due()
    }

    /// Cancel every pending timer. Nothing armed so far will ever run.
    pub fn teardown(&mut self) -> Generation {
        self.cooldown.clear();
        self.timers.invalidate()
    }

    /// Start scheduling for the scene's current stage at time `now`.
    ///
    /// Opens a fresh generation first, so calling this on a stage change
    /// also cancels everything armed for the previous node set.
    pub fn start(&mut self, scene: &Scene, now: u64) -> Generation {
        let generation = self.teardown();
        let stage = scene.stage();
        let node_count = scene.layout().len();

        match stage {
            Stage::Single => {
                self.timers.schedule(now, Task::Breathe);
            }
            Stage::Cluster | Stage::Hive => {
                for i in 0..stage.chain_count() {
                    let start = NodeId(self.rng.gen_range(0..node_count) as u32);
                    let at = now + i as u64 * CHAIN_STAGGER_MS;
                    self.timers.schedule(at, Task::Emit { from: start, chain: true });
                }
            }
        }

        tracing::debug!(
            stage = %stage,
            nodes = node_count,
            edges = scene.layout().edges().len(),
            generation = generation.0,
            "scheduler started"
        );
        generation
    }

    /// Run every task due at or before `now`. Returns how many ran.
    ///
    /// Each task observes its own deadline as the current time, so chained
    /// timings stay exact no matter how coarsely `advance` is called.
    pub fn advance(&mut self, scene: &mut Scene, now: u64) -> usize {
        let mut ran = 0;
        while let Some(fired) = self.timers.pop_due(now) {
            self.run(scene, fired.task, fired.due);
            ran += 1;
        }
        ran
    }

    /// Fire a hover burst from `from` to its nearest ring.
    ///
    /// Returns false when nothing fired: single stage, unknown node, node
    /// still cooling down, or no ring to reach.
    pub fn burst(&mut self, scene: &mut Scene, from: NodeId, now: u64) -> bool {
        if scene.stage() == Stage::Single || !scene.layout().contains(from) {
            return false;
        }
        if !self.cooldown.try_acquire(from, now) {
            self.stats.bursts_suppressed += 1;
            tracing::trace!(node = %from, "hover burst cooling down");
            return false;
        }

        let ring = scene.layout().nearest_ring(from, self.ring_tolerance);
        if ring.is_empty() {
            return false;
        }

        tracing::trace!(node = %from, targets = ring.len(), "hover burst");
        self.stats.bursts_fired += 1;
        self.fire(scene, from, ring, now, false);
        true
    }

    fn run(&mut self, scene: &mut Scene, task: Task, at: u64) {
        match task {
            Task::Emit { from, chain } => self.emit(scene, from, at, chain),
            Task::Arrive { targets } => {
                for t in targets {
                    scene.light(t, Activation::Target);
                }
            }
            Task::ReleaseSource { source } => scene.release(source, Activation::Source),
            Task::Settle { targets, chain } => {
                for &t in &targets {
                    scene.release(t, Activation::Target);
                }
                if chain {
                    if let Some(&next) = targets.first() {
                        self.emit(scene, next, at, true);
                    }
                }
            }
            Task::Expire { pulses } => scene.remove_pulses(&pulses),
            Task::Breathe => {
                let lone = NodeId(0);
                if scene.activation().is_lit(lone) {
                    scene.release(lone, Activation::Both);
                } else {
                    scene.light(lone, Activation::Both);
                }
                self.stats.breaths += 1;
                self.timers.schedule(at + BREATH_PERIOD_MS, Task::Breathe);
            }
        }
    }

    /// Chain emission: pick one random target and fire.
    fn emit(&mut self, scene: &mut Scene, from: NodeId, at: u64, chain: bool) {
        let node_count = scene.layout().len();
        if !scene.layout().contains(from) {
            return;
        }

        match pick_target(&mut self.rng, node_count, from.index(), self.retry_limit) {
            Some(to) => {
                self.stats.beams_fired += 1;
                tracing::trace!(from = %from, to, at, "beam");
                self.fire(scene, from, smallvec![NodeId(to as u32)], at, chain);
            }
            None => {
                self.stats.beams_skipped += 1;
                tracing::trace!(from = %from, at, "no distinct target, beam skipped");
                if chain {
                    self.timers.schedule(at + TARGET_CLEAR_MS, Task::Emit { from, chain });
                }
            }
        }
    }

    /// Light the source, create one pulse per target and arm the beam timers.
    fn fire(&mut self, scene: &mut Scene, source: NodeId, targets: Targets, at: u64, chain: bool) {
        let Some(origin) = scene.layout().node(source).map(|n| n.position) else {
            return;
        };

        scene.light(source, Activation::Source);

        let mut pulses = SmallVec::new();
        for &to in &targets {
            let Some(destination) = scene.layout().node(to).map(|n| n.position) else {
                continue;
            };
            let id = PulseId(self.next_pulse);
            self.next_pulse += 1;
            scene.add_pulse(Pulse { id, from: source, to, origin, destination, created_at: at });
            pulses.push(id);
        }

        self.timers.schedule(at + PULSE_LIFETIME_MS, Task::Expire { pulses });
        self.timers.schedule(at + TARGET_LIGHT_MS, Task::Arrive { targets: targets.clone() });
        self.timers.schedule(at + SOURCE_CLEAR_MS, Task::ReleaseSource { source });
        self.timers.schedule(at + TARGET_CLEAR_MS, Task::Settle { targets, chain });
    }
}

//! Pulse — a transient directed traversal between two nodes.

use serde::{Deserialize, Serialize};
use super::{NodeId, Point};
use crate::timing::PULSE_LIFETIME_MS;

/// Pulse identifier, unique for the lifetime of a `ClusterVisual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PulseId(pub u64);

/// A beam in flight. Endpoint positions are captured at creation so the pulse
/// can be drawn without looking the nodes up again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub id: PulseId,
    pub from: NodeId,
    pub to: NodeId,
    pub origin: Point,
    pub destination: Point,
    /// Creation time in milliseconds on the visualization clock.
    pub created_at: u64,
}

impl Pulse {
    /// Milliseconds since creation; zero if `now` precedes creation.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    /// When the scheduler drops this pulse from the collection.
    pub fn expires_at(&self) -> u64 {
        self.created_at + PULSE_LIFETIME_MS
    }
}

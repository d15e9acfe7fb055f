//! Per-node hover burst throttle.

use hashbrown::HashMap;

use crate::model::NodeId;

/// Remembers when each node last fired a burst.
#[derive(Debug, Clone)]
pub struct HoverCooldown {
    period_ms: u64,
    last_fired: HashMap<NodeId, u64>,
}

impl HoverCooldown {
    pub fn new(period_ms: u64) -> Self {
        Self { period_ms, last_fired: HashMap::new() }
    }

    /// Claim the node's burst slot at `now`. False while the node is cooling down.
    pub fn try_acquire(&mut self, id: NodeId, now: u64) -> bool {
        let ready = match self.last_fired.get(&id) {
            Some(&last) => now.saturating_sub(last) >= self.period_ms,
            None => true,
        };
        if ready {
            self.last_fired.insert(id, now);
        }
        ready
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}

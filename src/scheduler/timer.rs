//! Generation-guarded timer queue.
//!
//! Entries are ordered by due time, then by scheduling order, so two timers
//! with the same deadline fire in the order they were armed. Every entry
//! remembers the generation it was armed under; [`TimerQueue::invalidate`]
//! starts a new generation and nothing armed before it can fire again.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Scheduling epoch. Bumped on every stage change or teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

/// Handle to one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// A timer that came due.
#[derive(Debug)]
pub struct Fired<T> {
    pub id: TimerId,
    pub due: u64,
    pub task: T,
}

#[derive(Debug)]
struct Entry<T> {
    due: u64,
    id: TimerId,
    generation: Generation,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.id).cmp(&(self.due, self.id))
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    live: HashSet<TimerId>,
    generation: Generation,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            generation: Generation::default(),
            next_id: 0,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of armed, uncancelled timers.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Arm a timer for absolute time `due` under the current generation.
    pub fn schedule(&mut self, due: u64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        self.heap.push(Entry { due, id, generation: self.generation, task });
        id
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id)
    }

    /// Cancel everything and open a new generation.
    pub fn invalidate(&mut self) -> Generation {
        self.heap.clear();
        self.live.clear();
        self.generation = Generation(self.generation.0 + 1);
        self.generation
    }

    /// Earliest deadline among live timers.
    pub fn next_due(&mut self) -> Option<u64> {
        self.discard_dead();
        self.heap.peek().map(|e| e.due)
    }

    /// Pop the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<Fired<T>> {
        self.discard_dead();
        if self.heap.peek()?.due > now {
            return None;
        }
        let entry = self.heap.pop()?;
        self.live.remove(&entry.id);
        Some(Fired { id: entry.id, due: entry.due, task: entry.task })
    }

    /// Drop cancelled or stale-generation entries sitting at the top.
    fn discard_dead(&mut self) {
        while let Some(top) = self.heap.peek() {
            if top.generation == self.generation && self.live.contains(&top.id) {
                break;
            }
            if let Some(dead) = self.heap.pop() {
                tracing::trace!(timer = dead.id.0, generation = dead.generation.0, "dropping dead timer");
            }
        }
    }
}

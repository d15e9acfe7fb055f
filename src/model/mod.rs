//! # Cluster Model
//!
//! Plain data shared by the layout generator, the pulse scheduler and the
//! renderer: nodes, edges, pulses, activation state and the stage selector.
//!
//! Design rule: no timers, no randomness, no I/O here.
//! This module is pure data. Everything is `Serialize` so a frame can be
//! shipped to any presentation layer as-is.

pub mod node;
pub mod edge;
pub mod pulse;
pub mod activation;
pub mod stage;

pub use node::{Node, NodeId, Point, Axial};
pub use edge::{Edge, EdgeWeight};
pub use pulse::{Pulse, PulseId};
pub use activation::{Activation, ActivationMap};
pub use stage::Stage;

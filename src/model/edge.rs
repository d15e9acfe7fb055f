//! Edge (undirected adjacency link) between two lattice nodes.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// Links shorter than this are drawn with the thin stroke.
pub const TIGHT_LINK_DISTANCE: f64 = 100.0;

/// Stroke class of an edge. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeWeight {
    Tight,
    Loose,
}

impl EdgeWeight {
    pub fn for_length(length: f64) -> Self {
        if length < TIGHT_LINK_DISTANCE { Self::Tight } else { Self::Loose }
    }

    pub fn stroke_width(self) -> f64 {
        match self {
            Self::Tight => 1.0,
            Self::Loose => 2.0,
        }
    }
}

/// Unordered node pair. Stored normalized so `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub length: f64,
    pub weight: EdgeWeight,
}

impl Edge {
    pub fn new(x: NodeId, y: NodeId, length: f64) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self { a, b, length, weight: EdgeWeight::for_length(length) }
    }

    pub fn is_tight(&self) -> bool {
        self.weight == EdgeWeight::Tight
    }

    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// The other end of the edge from the given node.
    pub fn other_node(&self, from: NodeId) -> Option<NodeId> {
        if from == self.a { Some(self.b) }
        else if from == self.b { Some(self.a) }
        else { None }
    }
}

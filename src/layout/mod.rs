//! # Layout Generator
//!
//! Pure function from [`Stage`] to a node set and its derived edges.
//!
//! ```text
//! Stage ──► lattice() ──► Vec<Node> ──► link() ──► Vec<Edge>
//! ```
//!
//! Nodes come from an axial hex lattice around the origin; edges come from an
//! O(n²) pairwise distance pass, which is fine at ≤ 19 nodes.

use serde::Serialize;
use smallvec::SmallVec;

use crate::model::{Axial, Edge, Node, NodeId, Stage};

/// Pairs closer than this are treated as coincident and never linked.
const MIN_SEPARATION: f64 = 1.0;

/// A stage's full node and edge set. Replaced wholesale on stage change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    stage: Stage,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Compute the layout for a stage. Deterministic and total.
pub fn layout_for(stage: Stage) -> Layout {
    let nodes = lattice(stage);
    let edges = match stage {
        Stage::Single => Vec::new(),
        _ => link(&nodes, stage.max_link_distance()),
    };
    Layout { stage, nodes, edges }
}

/// Origin plus every axial `(q, r)` in `[-L, L]²` with `|q + r| ≤ L`.
///
/// Ids follow insertion order: origin is 0, then q-major / r-minor.
fn lattice(stage: Stage) -> Vec<Node> {
    let layers = stage.layers();
    let radius = stage.radius();

    let mut nodes = Vec::with_capacity(stage.node_count());
    nodes.push(Node::origin());

    let mut next = 1u32;
    for q in -layers..=layers {
        for r in -layers..=layers {
            let axial = Axial::new(q, r);
            if axial.is_origin() || (q + r).abs() > layers {
                continue;
            }
            nodes.push(Node::new(NodeId(next), axial, radius));
            next += 1;
        }
    }
    nodes
}

/// One edge per unordered pair with `MIN_SEPARATION < d < max_distance`.
fn link(nodes: &[Node], max_distance: f64) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            let d = a.distance_to(b);
            if d > MIN_SEPARATION && d < max_distance {
                edges.push(Edge::new(a.id, b.id, d));
            }
        }
    }
    edges
}

impl Layout {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Nodes linked to `id` by an edge.
    pub fn linked(&self, id: NodeId) -> Vec<NodeId> {
        self.edges.iter().filter_map(|e| e.other_node(id)).collect()
    }

    /// Every node whose distance from `id` is within `tolerance ×` the
    /// smallest observed distance. With a tolerance just above 1 this is the
    /// immediate hex ring around the node.
    pub fn nearest_ring(&self, id: NodeId, tolerance: f64) -> SmallVec<[NodeId; 6]> {
        let Some(source) = self.node(id) else {
            return SmallVec::new();
        };

        let distances: SmallVec<[(NodeId, f64); 24]> = self
            .nodes
            .iter()
            .filter(|n| n.id != id)
            .map(|n| (n.id, source.distance_to(n)))
            .filter(|(_, d)| *d > MIN_SEPARATION)
            .collect();

        let min = distances.iter().map(|(_, d)| *d).fold(f64::INFINITY, f64::min);
        if !min.is_finite() {
            return SmallVec::new();
        }

        let limit = min * tolerance;
        distances
            .into_iter()
            .filter(|(_, d)| *d <= limit)
            .map(|(n, _)| n)
            .collect()
    }
}

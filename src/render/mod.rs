//! # Renderer
//!
//! Projects a [`Scene`] at a given instant into a [`Frame`]: a read-only,
//! serializable snapshot with every coordinate and opacity precomputed. The
//! projection owns no state; two calls with the same scene and time agree.

pub mod svg;

use serde::Serialize;

use crate::model::{Activation, NodeId, Point, Pulse, PulseId, Stage};
use crate::scene::Scene;
use crate::timing::{FADE_MS, TRAVEL_MS};
use crate::Result;

/// Peak opacity of a pulse's wide glow stroke.
pub const GLOW_OPACITY: f64 = 0.5;
/// Peak opacity of a pulse's thin core stroke.
pub const CORE_OPACITY: f64 = 0.9;
/// Opacity of the travelling dot's halo before it starts to dissolve.
pub const DOT_OPACITY: f64 = 0.6;
/// Scale multiplier for lit or hovered nodes.
pub const LIT_SCALE_BOOST: f64 = 1.15;
/// Labels are hidden on stages drawn smaller than this.
pub const LABEL_MIN_SCALE: f64 = 0.7;

const DOT_FADE_START: f64 = 0.85;
const DOT_CORE_FADE_START: f64 = 0.9;

/// Fraction of the travel completed, clamped to `[0, 1]`.
pub fn travel_fraction(age_ms: u64) -> f64 {
    (age_ms as f64 / TRAVEL_MS as f64).clamp(0.0, 1.0)
}

/// Fraction of the fade completed, clamped to `[0, 1]`.
pub fn fade_fraction(age_ms: u64) -> f64 {
    (age_ms as f64 / FADE_MS as f64).clamp(0.0, 1.0)
}

/// `base × (1 − fade)`. Non-increasing in age, zero once the fade is done.
pub fn fade_opacity(base: f64, age_ms: u64) -> f64 {
    base * (1.0 - fade_fraction(age_ms))
}

/// Dot halo: steady, then a linear fall to zero over the last stretch of travel.
pub fn dot_opacity(travel: f64) -> f64 {
    ramp_out(DOT_OPACITY, travel, DOT_FADE_START)
}

/// Dot core: like the halo but starts dissolving later.
pub fn dot_core_opacity(travel: f64) -> f64 {
    ramp_out(1.0, travel, DOT_CORE_FADE_START)
}

fn ramp_out(base: f64, travel: f64, start: f64) -> f64 {
    if travel < start {
        base
    } else {
        (base * (1.0 - (travel - start) / (1.0 - start))).max(0.0)
    }
}

/// Where the pulse's dot sits at `now`.
pub fn pulse_position(pulse: &Pulse, now: u64) -> Point {
    pulse.origin.lerp(pulse.destination, travel_fraction(pulse.age(now)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    /// Offset from centre.
    pub position: Point,
    /// Canvas coordinate.
    pub screen: Point,
    pub activation: Option<Activation>,
    pub hovered: bool,
    pub lit: bool,
    pub scale: f64,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub a: NodeId,
    pub b: NodeId,
    pub from: Point,
    pub to: Point,
    pub tight: bool,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseView {
    pub id: PulseId,
    pub from: NodeId,
    pub to: NodeId,
    /// Canvas coordinates of the beam line.
    pub line_from: Point,
    pub line_to: Point,
    /// Dot position, offset from centre.
    pub position: Point,
    /// Dot position on the canvas.
    pub screen: Point,
    pub travel: f64,
    pub fade: f64,
    pub glow_opacity: f64,
    pub core_opacity: f64,
    pub dot_opacity: f64,
    pub dot_core_opacity: f64,
}

/// Everything a presentation layer needs to draw one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub stage: Stage,
    pub at: u64,
    pub center: f64,
    pub node_scale: f64,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub pulses: Vec<PulseView>,
}

impl Frame {
    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.get(id.index())
    }

    /// Ids of lit nodes (activation or hover), ascending.
    pub fn lit(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.lit).map(|n| n.id).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Project the scene at time `now`.
pub fn project(scene: &Scene, now: u64, center: f64) -> Frame {
    let stage = scene.stage();
    let base_scale = stage.node_scale();
    let layout = scene.layout();

    let nodes = layout
        .nodes()
        .iter()
        .map(|n| {
            let activation = scene.activation().get(n.id);
            let hovered = scene.hovered() == Some(n.id);
            let lit = activation.is_some() || hovered;
            NodeView {
                id: n.id,
                label: n.id.label(),
                position: n.position,
                screen: n.position.offset(center),
                activation,
                hovered,
                lit,
                scale: if lit { base_scale * LIT_SCALE_BOOST } else { base_scale },
                show_label: base_scale >= LABEL_MIN_SCALE,
            }
        })
        .collect();

    let edges = layout
        .edges()
        .iter()
        .filter_map(|e| {
            let a = layout.node(e.a)?;
            let b = layout.node(e.b)?;
            Some(EdgeView {
                a: e.a,
                b: e.b,
                from: a.position.offset(center),
                to: b.position.offset(center),
                tight: e.is_tight(),
                stroke_width: e.weight.stroke_width(),
            })
        })
        .collect();

    let pulses = scene
        .pulses()
        .iter()
        .map(|p| {
            let age = p.age(now);
            let travel = travel_fraction(age);
            let position = p.origin.lerp(p.destination, travel);
            PulseView {
                id: p.id,
                from: p.from,
                to: p.to,
                line_from: p.origin.offset(center),
                line_to: p.destination.offset(center),
                position,
                screen: position.offset(center),
                travel,
                fade: fade_fraction(age),
                glow_opacity: fade_opacity(GLOW_OPACITY, age),
                core_opacity: fade_opacity(CORE_OPACITY, age),
                dot_opacity: dot_opacity(travel),
                dot_core_opacity: dot_core_opacity(travel),
            }
        })
        .collect();

    Frame { stage, at: now, center, node_scale: base_scale, nodes, edges, pulses }
}

//! Mutable world state the scheduler writes into and the renderer reads.
//!
//! Every mutation is key-level: lighting or releasing one node, adding or
//! removing specific pulses. Nothing here replaces a collection wholesale
//! except [`Scene::reset`], which runs only on stage change.

use serde::Serialize;

use crate::layout::{Layout, layout_for};
use crate::model::{Activation, ActivationMap, NodeId, Pulse, PulseId, Stage};

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    layout: Layout,
    activation: ActivationMap,
    pulses: Vec<Pulse>,
    hovered: Option<NodeId>,
}

impl Scene {
    pub fn new(stage: Stage) -> Self {
        Self {
            layout: layout_for(stage),
            activation: ActivationMap::new(),
            pulses: Vec::new(),
            hovered: None,
        }
    }

    /// Swap in a fresh layout and drop all state tied to the old node set.
    pub fn reset(&mut self, stage: Stage) {
        self.layout = layout_for(stage);
        self.activation.clear();
        self.pulses.clear();
        self.hovered = None;
    }

    pub fn stage(&self) -> Stage {
        self.layout.stage()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn activation(&self) -> &ActivationMap {
        &self.activation
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub(crate) fn light(&mut self, id: NodeId, role: Activation) {
        if self.layout.contains(id) {
            self.activation.light(id, role);
        }
    }

    pub(crate) fn release(&mut self, id: NodeId, role: Activation) {
        self.activation.release(id, role);
    }

    pub(crate) fn add_pulse(&mut self, pulse: Pulse) {
        self.pulses.push(pulse);
    }

    pub(crate) fn remove_pulses(&mut self, ids: &[PulseId]) {
        self.pulses.retain(|p| !ids.contains(&p.id));
    }

    pub(crate) fn set_hovered(&mut self, id: NodeId) {
        if self.layout.contains(id) {
            self.hovered = Some(id);
        }
    }

    /// Clear the hover mark only if `id` still holds it.
    pub(crate) fn clear_hovered(&mut self, id: NodeId) {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }
}

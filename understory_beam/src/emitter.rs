// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Emitters: beam sources that own their chain.

use kurbo::{Line, Point};
use smallvec::SmallVec;

use crate::color::Color;
use crate::query::{GeometryQuery, Obstruction, probe_segment};
use crate::types::{Layers, NodeId};

/// Configuration for an emitter, supplied at insertion time.
#[derive(Clone, Copy, Debug)]
pub struct EmitterConfig {
    /// The probe segment from origin to target.
    ///
    /// `None` models an emitter whose endpoints were never wired up; it probes
    /// as if nothing were in the way and never builds a chain.
    pub segment: Option<Line>,
    /// Layers the beam can strike.
    pub mask: Layers,
    /// The emitter's own color contribution.
    pub color: Color,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            segment: None,
            mask: Layers::default(),
            color: Color::WHITE,
        }
    }
}

/// Ordered nodes a beam passes through.
pub type Chain = SmallVec<[NodeId; 8]>;

/// A beam source.
///
/// The chain lists relays in traversal order, optionally followed by the
/// catcher the beam ends at. It never holds the same node twice.
#[derive(Clone, Debug)]
pub struct Emitter {
    segment: Option<Line>,
    mask: Layers,
    color: Color,
    pub(crate) chain: Chain,
    pub(crate) last_obstruction: Option<NodeId>,
    pub(crate) beam_end: Option<Point>,
    /// Forces a rebuild on the next tick even if the first obstruction is unchanged.
    pub(crate) dirty: bool,
}

impl Emitter {
    /// Create an emitter with an empty chain.
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            segment: config.segment,
            mask: config.mask,
            color: config.color,
            chain: Chain::new(),
            last_obstruction: None,
            beam_end: None,
            dirty: false,
        }
    }

    /// The emitter's base color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The probe segment.
    pub fn segment(&self) -> Option<Line> {
        self.segment
    }

    pub(crate) fn set_segment(&mut self, segment: Option<Line>) {
        self.segment = segment;
    }

    /// Layers the beam can strike.
    pub fn mask(&self) -> Layers {
        self.mask
    }

    /// Nodes the beam currently passes through, in order.
    pub fn chain(&self) -> &[NodeId] {
        &self.chain
    }

    /// What the probe struck on the previous tick.
    pub fn last_obstruction(&self) -> Option<NodeId> {
        self.last_obstruction
    }

    /// Where the root segment currently ends, if the emitter has a segment
    /// and has been ticked.
    pub fn beam_end(&self) -> Option<Point> {
        self.beam_end
    }

    /// Probe the root segment against `query`.
    pub fn probe<Q: GeometryQuery + ?Sized>(&self, query: &Q) -> Option<Obstruction> {
        probe_segment(query, self.segment, self.mask)
    }
}

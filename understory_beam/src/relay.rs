// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relays: nodes that receive beams, blend them, and re-emit.

use kurbo::{Line, Point};
use smallvec::SmallVec;

use crate::color::{self, Color};
use crate::query::{GeometryQuery, Obstruction, probe_segment};
use crate::types::{EmitterId, Layers, NodeId};

/// Configuration for a relay, supplied at insertion time.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelayConfig {
    /// The relay's own outgoing segment. `None` means the relay never
    /// re-emits (it still blends and can be a terminal relay).
    pub segment: Option<Line>,
    /// Layers the outgoing segment can strike.
    pub mask: Layers,
}

/// One emitter routing through a relay, with the color it contributes.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Contribution {
    emitter: EmitterId,
    color: Color,
}

/// A redirecting node.
///
/// A relay is active exactly while at least one emitter routes through it.
/// While active it blends its contributors' colors and its outgoing segment
/// extends their chains.
#[derive(Clone, Debug)]
pub struct Relay {
    segment: Option<Line>,
    mask: Layers,
    contributors: SmallVec<[Contribution; 4]>,
    color: Color,
    active: bool,
    pub(crate) last_obstruction: Option<NodeId>,
    pub(crate) beam_end: Option<Point>,
    pub(crate) preview_end: Option<Point>,
}

impl Relay {
    /// Create an idle relay.
    pub fn new(config: RelayConfig) -> Self {
        Self {
            segment: config.segment,
            mask: config.mask,
            contributors: SmallVec::new(),
            color: Color::BLACK,
            active: false,
            last_obstruction: None,
            beam_end: None,
            preview_end: None,
        }
    }

    /// Register `emitter` with its base `color`.
    ///
    /// Returns `false` (and changes nothing) if the emitter is already registered.
    pub(crate) fn add_contributor(&mut self, emitter: EmitterId, color: Color) -> bool {
        if self.has_contributor(emitter) {
            return false;
        }
        self.contributors.push(Contribution { emitter, color });
        self.recompute();
        true
    }

    /// Deregister `emitter`.
    ///
    /// Returns `false` (and changes nothing) if the emitter was not registered.
    pub(crate) fn remove_contributor(&mut self, emitter: EmitterId) -> bool {
        let Some(pos) = self.contributors.iter().position(|c| c.emitter == emitter) else {
            return false;
        };
        self.contributors.remove(pos);
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        match color::mean(self.contributors.iter().map(|c| c.color)) {
            Some(blend) => {
                self.color = blend;
                self.active = true;
            }
            None => {
                self.color = Color::BLACK;
                self.active = false;
                self.beam_end = None;
            }
        }
        debug_assert_eq!(
            self.active,
            !self.contributors.is_empty(),
            "relay activity must track its contributor set"
        );
    }

    /// Whether `emitter` currently routes through this relay.
    pub fn has_contributor(&self, emitter: EmitterId) -> bool {
        self.contributors.iter().any(|c| c.emitter == emitter)
    }

    /// Emitters currently routing through this relay, in registration order.
    pub fn contributors(&self) -> impl ExactSizeIterator<Item = EmitterId> + '_ {
        self.contributors.iter().map(|c| c.emitter)
    }

    /// Whether any emitter routes through this relay.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The blended color of all contributors, or [`Color::BLACK`] while idle.
    pub fn aggregate_color(&self) -> Color {
        self.color
    }

    /// The outgoing segment.
    pub fn segment(&self) -> Option<Line> {
        self.segment
    }

    /// Layers the outgoing segment can strike.
    pub fn mask(&self) -> Layers {
        self.mask
    }

    /// What the outgoing segment struck when last probed.
    pub fn last_obstruction(&self) -> Option<NodeId> {
        self.last_obstruction
    }

    /// Probe the outgoing segment against `query`.
    pub fn probe<Q: GeometryQuery + ?Sized>(&self, query: &Q) -> Option<Obstruction> {
        probe_segment(query, self.segment, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(i: u32) -> EmitterId {
        EmitterId::new(i, 1)
    }

    #[test]
    fn starts_idle() {
        let relay = Relay::new(RelayConfig::default());
        assert!(!relay.is_active());
        assert_eq!(relay.aggregate_color(), Color::BLACK);
        assert_eq!(relay.contributors().len(), 0);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut relay = Relay::new(RelayConfig::default());
        assert!(relay.add_contributor(emitter(0), Color::RED));
        assert!(!relay.add_contributor(emitter(0), Color::RED));
        assert_eq!(relay.contributors().len(), 1);
        assert_eq!(relay.aggregate_color(), Color::RED);
    }

    #[test]
    fn blends_red_and_green() {
        let mut relay = Relay::new(RelayConfig::default());
        relay.add_contributor(emitter(0), Color::RED);
        relay.add_contributor(emitter(1), Color::GREEN);
        assert!(relay.is_active());
        assert_eq!(relay.aggregate_color(), Color::rgba(0.5, 0.5, 0.0, 1.0));
    }

    #[test]
    fn removing_last_contributor_deactivates() {
        let mut relay = Relay::new(RelayConfig::default());
        relay.add_contributor(emitter(0), Color::RED);
        relay.add_contributor(emitter(1), Color::GREEN);

        assert!(relay.remove_contributor(emitter(1)));
        assert_eq!(relay.aggregate_color(), Color::RED);
        assert!(!relay.remove_contributor(emitter(1)));

        assert!(relay.remove_contributor(emitter(0)));
        assert!(!relay.is_active());
        assert_eq!(relay.aggregate_color(), Color::BLACK);
    }

    #[test]
    fn stale_generation_is_a_different_contributor() {
        let mut relay = Relay::new(RelayConfig::default());
        relay.add_contributor(EmitterId::new(0, 1), Color::RED);
        assert!(!relay.remove_contributor(EmitterId::new(0, 2)));
        assert!(relay.is_active());
    }
}

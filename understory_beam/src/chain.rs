// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain construction and change propagation.
//!
//! Each tick, every emitter probes its root segment. When the first obstruction
//! differs from the previous tick's (no obstruction counts as a value), the
//! emitter withdraws from every node in its chain and walks the chain again:
//!
//! - a relay is appended, registers the emitter, and its own outgoing segment
//!   is probed to find the next node; a relay already in the chain ends the
//!   walk, which is what bounds it on cyclic layouts;
//! - a catcher is appended, registers the emitter, and ends the walk;
//! - anything else ends the walk without being appended.
//!
//! After the emitters, every active relay probes its outgoing segment. If what
//! it strikes changed, every emitter routing through it is reset, so changes
//! past an emitter's first obstruction are picked up too.
//!
//! Emitters are visited in slot order, then relays. Two emitters feeding the
//! same relay that both change in one tick may leave a catcher downstream
//! evaluated against a partial blend until the next tick.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::catcher::{Convergence, Terminal, Transition};
use crate::color::Color;
use crate::query::{GeometryQuery, beam_end};
use crate::relay::Relay;
use crate::scene::{Node, NodeKind, Scene};
use crate::types::{EmitterId, NodeId};

/// Summary of one [`Scene::tick`].
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// Number of distinct emitters whose chain was rebuilt during the tick.
    ///
    /// An emitter reset more than once in a tick counts once.
    pub rebuilt: usize,
    /// Catcher activation edges, in the order they fired.
    pub transitions: Vec<Transition>,
}

impl Scene {
    /// Advance the scene by one tick.
    ///
    /// Polls every emitter, then every active relay, against `query`,
    /// rebuilding the chains whose topology changed. Returns the number of
    /// rebuilds and every activation edge recorded since the last drain.
    pub fn tick<Q: GeometryQuery + ?Sized>(&mut self, query: &Q) -> TickReport {
        let mut rebuilt: SmallVec<[EmitterId; 8]> = SmallVec::new();
        for id in self.emitters.keys() {
            if self.poll_emitter(id, query) {
                rebuilt.push(id);
            }
        }
        for id in self.nodes.keys() {
            for emitter in self.poll_relay(id, query) {
                if !rebuilt.contains(&emitter) {
                    rebuilt.push(emitter);
                }
            }
        }
        TickReport {
            rebuilt: rebuilt.len(),
            transitions: self.take_transitions(),
        }
    }

    /// Tear down and rebuild an emitter's chain right away.
    ///
    /// This is what a tick does when it detects a change; hosts can call it
    /// directly after moving things around. No-op for stale ids.
    pub fn reset_emitter<Q: GeometryQuery + ?Sized>(&mut self, id: EmitterId, query: &Q) {
        if !self.emitters.contains(id) {
            return;
        }
        self.withdraw(id);
        let Some(emitter) = self.emitters.get_mut(id) else {
            return;
        };
        emitter.dirty = false;
        let hit = emitter.probe(query);
        emitter.last_obstruction = hit.map(|h| h.node);
        emitter.beam_end = beam_end(emitter.segment(), hit);
        if let Some(first) = hit {
            self.extend(id, first.node, query);
        }
        log::trace!(
            "{id:?} chain rebuilt: {:?}",
            self.emitters.get(id).map(|e| e.chain())
        );
    }

    /// The last live relay in an emitter's chain, if any.
    pub fn terminal_relay(&self, emitter: EmitterId) -> Option<NodeId> {
        let emitter = self.emitters.get(emitter)?;
        emitter
            .chain()
            .iter()
            .rev()
            .copied()
            .find(|node| self.relay(*node).is_some())
    }

    fn poll_emitter<Q: GeometryQuery + ?Sized>(&mut self, id: EmitterId, query: &Q) -> bool {
        let Some(emitter) = self.emitters.get_mut(id) else {
            return false;
        };
        let hit = emitter.probe(query);
        let current = hit.map(|h| h.node);
        emitter.beam_end = beam_end(emitter.segment(), hit);
        let previous = emitter.last_obstruction;
        let changed = emitter.dirty || current != previous;
        emitter.last_obstruction = current;
        if changed {
            log::debug!("{id:?} obstruction {previous:?} -> {current:?}, rebuilding chain");
            self.reset_emitter(id, query);
        }
        changed
    }

    /// Refresh a relay's preview and, if it is active and its outgoing
    /// obstruction changed, reset its contributors. Returns the emitters reset.
    fn poll_relay<Q: GeometryQuery + ?Sized>(
        &mut self,
        id: NodeId,
        query: &Q,
    ) -> SmallVec<[EmitterId; 4]> {
        let Some(Node::Relay(relay)) = self.nodes.get_mut(id) else {
            return SmallVec::new();
        };
        let hit = relay.probe(query);
        relay.preview_end = beam_end(relay.segment(), hit);
        if !relay.is_active() {
            return SmallVec::new();
        }
        relay.beam_end = relay.preview_end;
        let current = hit.map(|h| h.node);
        let previous = relay.last_obstruction;
        if current == previous {
            return SmallVec::new();
        }
        log::debug!("{id:?} outgoing obstruction {previous:?} -> {current:?}, resetting contributors");
        // Resets mutate the contributor set, so walk a copy.
        let contributors: SmallVec<[EmitterId; 4]> = relay.contributors().collect();
        for emitter in &contributors {
            self.reset_emitter(*emitter, query);
        }
        if let Some(Node::Relay(relay)) = self.nodes.get_mut(id) {
            relay.last_obstruction = current;
        }
        contributors
    }

    /// Withdraw an emitter from every node in its chain and clear the chain.
    pub(crate) fn withdraw(&mut self, id: EmitterId) {
        let Some(emitter) = self.emitters.get_mut(id) else {
            return;
        };
        let chain = core::mem::take(&mut emitter.chain);
        for node in chain {
            let evaluate = match self.nodes.get_mut(node) {
                Some(Node::Relay(relay)) => {
                    relay.remove_contributor(id);
                    false
                }
                Some(Node::Catcher(catcher)) => catcher.remove_contributor(id),
                _ => false,
            };
            if evaluate {
                self.evaluate_catcher(node);
            }
        }
    }

    fn extend<Q: GeometryQuery + ?Sized>(&mut self, id: EmitterId, first: NodeId, query: &Q) {
        let Some(color) = self.emitters.get(id).map(|e| e.color()) else {
            return;
        };
        let mut next = Some(first);
        while let Some(node) = next.take() {
            match self.kind(node) {
                Some(NodeKind::Relay) => {
                    if !self.append(id, node) {
                        log::trace!("{id:?} revisits {node:?}, chain truncated");
                        break;
                    }
                    next = self.enter_relay(node, id, color, query);
                }
                Some(NodeKind::Catcher) => {
                    self.append(id, node);
                    self.enter_catcher(node, id);
                    break;
                }
                Some(NodeKind::Obstacle) | None => break,
            }
        }
    }

    /// Append `node` to the emitter's chain unless it is already there.
    fn append(&mut self, id: EmitterId, node: NodeId) -> bool {
        let Some(emitter) = self.emitters.get_mut(id) else {
            return false;
        };
        if emitter.chain.contains(&node) {
            return false;
        }
        emitter.chain.push(node);
        true
    }

    /// Register with a relay and return what its outgoing segment strikes.
    fn enter_relay<Q: GeometryQuery + ?Sized>(
        &mut self,
        node: NodeId,
        emitter: EmitterId,
        color: Color,
        query: &Q,
    ) -> Option<NodeId> {
        let Some(Node::Relay(relay)) = self.nodes.get_mut(node) else {
            return None;
        };
        let was_idle = !relay.is_active();
        if relay.add_contributor(emitter, color) {
            log::trace!("{emitter:?} registered with relay {node:?}");
        }
        let hit = relay.probe(query);
        // Seeded on activation only; while active, `poll_relay` owns it.
        if was_idle {
            relay.last_obstruction = hit.map(|h| h.node);
        }
        relay.beam_end = beam_end(relay.segment(), hit);
        hit.map(|h| h.node)
    }

    fn enter_catcher(&mut self, node: NodeId, emitter: EmitterId) {
        let added = match self.nodes.get_mut(node) {
            Some(Node::Catcher(catcher)) => catcher.add_contributor(emitter),
            _ => false,
        };
        if added {
            log::trace!("{emitter:?} registered with catcher {node:?}");
            self.evaluate_catcher(node);
        }
    }

    /// Recompute a catcher's state from its contributors' chains.
    pub(crate) fn evaluate_catcher(&mut self, id: NodeId) {
        let Some(catcher) = self.catcher(id) else {
            return;
        };
        let terminals: SmallVec<[Terminal; 4]> = catcher
            .contributors()
            .iter()
            .map(|e| self.terminal_relay(*e).map_or(Terminal::Direct, Terminal::Relay))
            .collect();
        let convergence = Convergence::of(&terminals);
        let resolved = match convergence {
            Convergence::Relay(relay) => self
                .relay(relay)
                .filter(|r| r.is_active())
                .map(Relay::aggregate_color),
            _ => None,
        };
        let Some(Node::Catcher(catcher)) = self.nodes.get_mut(id) else {
            return;
        };
        if let Some(kind) = catcher.settle(convergence, resolved) {
            log::debug!("catcher {id:?} {kind:?} ({convergence:?}, color {resolved:?})");
            self.transitions.push(Transition { catcher: id, kind });
        }
    }
}

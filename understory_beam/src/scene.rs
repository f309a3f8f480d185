// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: node and emitter storage plus read-only projections.

use alloc::boxed::Box;
use alloc::vec::Vec;
use kurbo::Line;

use crate::arena::Arena;
use crate::catcher::{ActivationHook, Catcher, CatcherConfig, Transition};
use crate::color::Color;
use crate::emitter::{Emitter, EmitterConfig};
use crate::relay::{Relay, RelayConfig};
use crate::types::{EmitterId, NodeId};

/// What a node is, without its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A [`Relay`].
    Relay,
    /// A [`Catcher`].
    Catcher,
    /// Anything else a beam can strike. Beams stop there.
    Obstacle,
}

#[derive(Debug)]
pub(crate) enum Node {
    Relay(Relay),
    Catcher(Catcher),
    Obstacle,
}

impl Node {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Self::Relay(_) => NodeKind::Relay,
            Self::Catcher(_) => NodeKind::Catcher,
            Self::Obstacle => NodeKind::Obstacle,
        }
    }
}

/// Where a rendered beam segment comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentSource {
    /// An emitter's root segment.
    Emitter(EmitterId),
    /// An active relay's outgoing segment.
    Relay(NodeId),
}

/// A beam segment as it should currently be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamSegment {
    /// From the segment origin to where the beam currently stops.
    pub line: Line,
    /// The beam color: the emitter's own color or the relay's blend.
    pub color: Color,
    /// Which participant owns the segment.
    pub source: SegmentSource,
}

/// Container for every beam participant and the tick driver.
///
/// Nodes (relays, catchers, obstacles) and emitters live in separate
/// generational arenas. Emitters refer to nodes through their chain and nodes
/// refer back to emitters through contributor sets; neither owns the other.
///
/// Structural changes and state updates only happen inside the scene's own
/// operations. Geometry is consulted through a [`GeometryQuery`](crate::GeometryQuery)
/// handed to [`Scene::tick`] and [`Scene::reset_emitter`].
///
/// ## Example
///
/// ```rust
/// use kurbo::{Line, Point};
/// use understory_beam::{
///     CatcherConfig, Color, EmitterConfig, GeometryQuery, Layers, NodeId, Obstruction,
///     RelayConfig, Scene,
/// };
///
/// // A query that reports `relay` for the emitter's segment and `catcher`
/// // for the relay's segment, keyed by where the segment starts.
/// struct Wiring(Vec<(Point, NodeId)>);
/// impl GeometryQuery for Wiring {
///     fn probe(&self, from: Point, to: Point, _mask: Layers) -> Option<Obstruction> {
///         let (_, node) = self.0.iter().find(|(p, _)| *p == from)?;
///         Some(Obstruction { node: *node, point: to })
///     }
/// }
///
/// let mut scene = Scene::new();
/// let relay = scene.insert_relay(RelayConfig {
///     segment: Some(Line::new((10.0, 0.0), (10.0, 10.0))),
///     ..RelayConfig::default()
/// });
/// let catcher = scene.insert_catcher(CatcherConfig { target: Color::RED });
/// let emitter = scene.insert_emitter(EmitterConfig {
///     segment: Some(Line::new((0.0, 0.0), (10.0, 0.0))),
///     color: Color::RED,
///     ..EmitterConfig::default()
/// });
/// let wiring = Wiring(vec![
///     (Point::new(0.0, 0.0), relay),
///     (Point::new(10.0, 0.0), catcher),
/// ]);
///
/// let report = scene.tick(&wiring);
/// assert_eq!(scene.emitter(emitter).unwrap().chain(), &[relay, catcher]);
/// assert!(scene.catcher(catcher).unwrap().is_active());
/// assert_eq!(report.transitions.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) nodes: Arena<NodeId, Node>,
    pub(crate) emitters: Arena<EmitterId, Emitter>,
    pub(crate) transitions: Vec<Transition>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an idle relay.
    pub fn insert_relay(&mut self, config: RelayConfig) -> NodeId {
        self.nodes.insert(Node::Relay(Relay::new(config)))
    }

    /// Insert an inactive catcher.
    pub fn insert_catcher(&mut self, config: CatcherConfig) -> NodeId {
        self.nodes.insert(Node::Catcher(Catcher::new(config)))
    }

    /// Insert a plain obstacle: something a beam can strike but not pass.
    pub fn insert_obstacle(&mut self) -> NodeId {
        self.nodes.insert(Node::Obstacle)
    }

    /// Insert an emitter. Its chain is built on the first [`Scene::tick`].
    pub fn insert_emitter(&mut self, config: EmitterConfig) -> EmitterId {
        self.emitters.insert(Emitter::new(config))
    }

    /// Remove a node.
    ///
    /// Emitters whose chain passes through the node are rebuilt on the next
    /// tick. Removing a catcher drops its hook without firing it.
    pub fn remove(&mut self, id: NodeId) {
        if self.nodes.remove(id).is_none() {
            return;
        }
        for key in self.emitters.keys() {
            if let Some(emitter) = self.emitters.get_mut(key)
                && emitter.chain.contains(&id)
            {
                emitter.dirty = true;
            }
        }
    }

    /// Remove an emitter, withdrawing its beam from every node it reached.
    pub fn remove_emitter(&mut self, id: EmitterId) {
        if !self.emitters.contains(id) {
            return;
        }
        self.withdraw(id);
        self.emitters.remove(id);
    }

    /// Replace an emitter's probe segment. The chain is rebuilt on the next tick.
    pub fn set_emitter_segment(&mut self, id: EmitterId, segment: Option<Line>) {
        if let Some(emitter) = self.emitters.get_mut(id) {
            emitter.set_segment(segment);
            emitter.dirty = true;
        }
    }

    /// Install (or clear) a catcher's activation hook. No-op for other nodes.
    pub fn set_hook(&mut self, id: NodeId, hook: Option<Box<dyn ActivationHook>>) {
        if let Some(Node::Catcher(catcher)) = self.nodes.get_mut(id) {
            catcher.set_hook(hook);
        }
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// The kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id).map(Node::kind)
    }

    /// Access a live relay.
    pub fn relay(&self, id: NodeId) -> Option<&Relay> {
        match self.nodes.get(id)? {
            Node::Relay(relay) => Some(relay),
            _ => None,
        }
    }

    /// Access a live catcher.
    pub fn catcher(&self, id: NodeId) -> Option<&Catcher> {
        match self.nodes.get(id)? {
            Node::Catcher(catcher) => Some(catcher),
            _ => None,
        }
    }

    /// Access a live emitter.
    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(id)
    }

    /// Live emitters in slot order.
    pub fn emitters(&self) -> impl Iterator<Item = (EmitterId, &Emitter)> + '_ {
        self.emitters.iter()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drain activation edges recorded since the last drain.
    ///
    /// [`Scene::tick`] drains these into its report; this is for edges caused
    /// outside a tick, such as by [`Scene::remove_emitter`].
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        core::mem::take(&mut self.transitions)
    }

    /// Beam segments to draw, as of the last tick.
    ///
    /// One segment per emitter that has a probe segment, from its origin to
    /// where its beam stops, then one per active relay with an outgoing
    /// segment, colored with the relay's blend.
    pub fn segments(&self) -> impl Iterator<Item = BeamSegment> + '_ {
        let roots = self.emitters.iter().filter_map(|(id, emitter)| {
            let line = emitter.segment()?;
            let end = emitter.beam_end().unwrap_or(line.p1);
            Some(BeamSegment {
                line: Line::new(line.p0, end),
                color: emitter.color(),
                source: SegmentSource::Emitter(id),
            })
        });
        let relays = self.nodes.iter().filter_map(|(id, node)| {
            let Node::Relay(relay) = node else {
                return None;
            };
            if !relay.is_active() {
                return None;
            }
            let line = relay.segment()?;
            let end = relay.beam_end.unwrap_or(line.p1);
            Some(BeamSegment {
                line: Line::new(line.p0, end),
                color: relay.aggregate_color(),
                source: SegmentSource::Relay(id),
            })
        });
        roots.chain(relays)
    }

    /// Preview segments for every relay with an outgoing segment, as of the
    /// last tick, regardless of whether the relay is active.
    ///
    /// Previews are display-only: computing them never touches contributor sets.
    pub fn previews(&self) -> impl Iterator<Item = (NodeId, Line)> + '_ {
        self.nodes.iter().filter_map(|(id, node)| {
            let Node::Relay(relay) = node else {
                return None;
            };
            let line = relay.segment()?;
            let end = relay.preview_end.unwrap_or(line.p1);
            Some((id, Line::new(line.p0, end)))
        })
    }
}

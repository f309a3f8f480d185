// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A reference [`GeometryQuery`] over 2D colliders.
//!
//! [`ColliderSet`] keeps one shape per [`NodeId`], tagged with the [`Layers`]
//! it occupies, and answers probes by casting the segment against every
//! collider with [`understory_ray_hit`]. There is no broad phase; scenes that
//! need one can implement [`GeometryQuery`] over their own index instead.
//!
//! Colliders that already contain the probe start are ignored by default (see
//! [`CastParams::skip_inside`]), so a relay's outgoing segment may start
//! inside the relay's own collider. Equal entry distances resolve to the
//! collider inserted first.
//!
//! ```rust
//! use kurbo::{Line, Rect};
//! use understory_beam::adapters::hit2d::ColliderSet;
//! use understory_beam::{Layers, RelayConfig, Scene, EmitterConfig};
//!
//! let mut scene = Scene::new();
//! let mut colliders = ColliderSet::default();
//! let relay = scene.insert_relay(RelayConfig::default());
//! colliders.insert(relay, Rect::new(50.0, -5.0, 60.0, 5.0), Layers::RELAY);
//! let emitter = scene.insert_emitter(EmitterConfig {
//!     segment: Some(Line::new((0.0, 0.0), (100.0, 0.0))),
//!     ..EmitterConfig::default()
//! });
//!
//! scene.tick(&colliders);
//! let emitter = scene.emitter(emitter).unwrap();
//! assert_eq!(emitter.chain(), &[relay]);
//! assert_eq!(emitter.beam_end(), Some(kurbo::Point::new(50.0, 0.0)));
//! ```

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{BezPath, Circle, Line, Point, Rect, RoundedRect};
use understory_ray_hit::stroke::StrokedLine;
use understory_ray_hit::{CastHit, CastParams, SegmentCast};

use crate::query::{GeometryQuery, Obstruction};
use crate::types::{Layers, NodeId};

/// Shapes a collider can take.
#[derive(Clone, Debug)]
pub enum ColliderShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A disk.
    Circle(Circle),
    /// A rectangle with rounded corners.
    RoundedRect(RoundedRect),
    /// An arbitrary closed path.
    Path(BezPath),
    /// A thick line with round caps, such as a wall or mirror.
    Stroke(StrokedLine),
}

impl SegmentCast for ColliderShape {
    fn cast_local(&self, line: Line, params: &CastParams) -> Option<CastHit> {
        match self {
            Self::Rect(s) => s.cast_local(line, params),
            Self::Circle(s) => s.cast_local(line, params),
            Self::RoundedRect(s) => s.cast_local(line, params),
            Self::Path(s) => s.cast_local(line, params),
            Self::Stroke(s) => s.cast_local(line, params),
        }
    }
}

impl From<Rect> for ColliderShape {
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<Circle> for ColliderShape {
    fn from(value: Circle) -> Self {
        Self::Circle(value)
    }
}

impl From<RoundedRect> for ColliderShape {
    fn from(value: RoundedRect) -> Self {
        Self::RoundedRect(value)
    }
}

impl From<BezPath> for ColliderShape {
    fn from(value: BezPath) -> Self {
        Self::Path(value)
    }
}

impl From<StrokedLine> for ColliderShape {
    fn from(value: StrokedLine) -> Self {
        Self::Stroke(value)
    }
}

#[derive(Clone, Debug)]
struct Collider {
    node: NodeId,
    shape: ColliderShape,
    layers: Layers,
}

/// World-space colliders keyed by node, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ColliderSet {
    colliders: Vec<Collider>,
    index: HashMap<NodeId, usize>,
    params: CastParams,
}

impl ColliderSet {
    /// Create an empty set that casts with `params`.
    pub fn new(params: CastParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Add a collider for `node`, or replace its shape and layers in place.
    ///
    /// Replacing keeps the collider's original position in the tie-break order.
    pub fn insert(&mut self, node: NodeId, shape: impl Into<ColliderShape>, layers: Layers) {
        let shape = shape.into();
        if let Some(&slot) = self.index.get(&node) {
            let collider = &mut self.colliders[slot];
            collider.shape = shape;
            collider.layers = layers;
            return;
        }
        self.index.insert(node, self.colliders.len());
        self.colliders.push(Collider {
            node,
            shape,
            layers,
        });
    }

    /// Remove the collider for `node`. Returns `false` if it had none.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(slot) = self.index.remove(&node) else {
            return false;
        };
        self.colliders.remove(slot);
        for (i, collider) in self.colliders.iter().enumerate().skip(slot) {
            self.index.insert(collider.node, i);
        }
        true
    }

    /// Move `node`'s collider to other layers. Returns `false` if it had none.
    pub fn set_layers(&mut self, node: NodeId, layers: Layers) -> bool {
        let Some(&slot) = self.index.get(&node) else {
            return false;
        };
        self.colliders[slot].layers = layers;
        true
    }

    /// The shape registered for `node`.
    pub fn shape(&self, node: NodeId) -> Option<&ColliderShape> {
        self.index.get(&node).map(|&slot| &self.colliders[slot].shape)
    }

    /// The layers registered for `node`.
    pub fn layers(&self, node: NodeId) -> Option<Layers> {
        self.index.get(&node).map(|&slot| self.colliders[slot].layers)
    }

    /// Number of colliders.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the set has no colliders.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Cast parameters used for every probe.
    pub fn params(&self) -> &CastParams {
        &self.params
    }

    /// Cast `line` against every collider on `mask` and return the nearest entry.
    pub fn cast(&self, line: Line, mask: Layers) -> Option<(NodeId, CastHit)> {
        let mut best: Option<(NodeId, CastHit)> = None;
        for collider in &self.colliders {
            if !collider.layers.intersects(mask) {
                continue;
            }
            let Some(hit) = collider.shape.cast_local(line, &self.params) else {
                continue;
            };
            if best.is_none_or(|(_, b)| hit.t < b.t) {
                best = Some((collider.node, hit));
            }
        }
        best
    }
}

impl GeometryQuery for ColliderSet {
    fn probe(&self, from: Point, to: Point, mask: Layers) -> Option<Obstruction> {
        let (node, hit) = self.cast(Line::new(from, to), mask)?;
        Some(Obstruction {
            node,
            point: hit.point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catcher::CatcherConfig;
    use crate::color::Color;
    use crate::emitter::EmitterConfig;
    use crate::relay::RelayConfig;
    use crate::scene::Scene;
    use alloc::vec;

    fn node(i: u32) -> NodeId {
        NodeId::new(i, 1)
    }

    #[test]
    fn nearest_collider_wins() {
        let mut set = ColliderSet::default();
        set.insert(node(0), Rect::new(50.0, -1.0, 60.0, 1.0), Layers::DEFAULT);
        set.insert(node(1), Circle::new((20.0, 0.0), 5.0), Layers::DEFAULT);
        let hit = set
            .probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::all())
            .unwrap();
        assert_eq!(hit.node, node(1));
        assert!((hit.point.x - 15.0).abs() < 1e-9);
    }

    #[test]
    fn mask_filters_layers() {
        let mut set = ColliderSet::default();
        set.insert(node(0), Rect::new(10.0, -1.0, 12.0, 1.0), Layers::BLOCKER);
        set.insert(node(1), Rect::new(20.0, -1.0, 22.0, 1.0), Layers::RELAY);
        let hit = set
            .probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::RELAY)
            .unwrap();
        assert_eq!(hit.node, node(1));

        assert!(set.set_layers(node(0), Layers::RELAY));
        let hit = set
            .probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::RELAY)
            .unwrap();
        assert_eq!(hit.node, node(0));
        assert!(!set.set_layers(node(9), Layers::RELAY));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut set = ColliderSet::default();
        set.insert(node(3), Rect::new(10.0, -1.0, 12.0, 1.0), Layers::DEFAULT);
        set.insert(node(1), Rect::new(10.0, -2.0, 14.0, 2.0), Layers::DEFAULT);
        let hit = set
            .probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::all())
            .unwrap();
        assert_eq!(hit.node, node(3));

        // Replacing a shape keeps its place.
        set.insert(node(3), Rect::new(10.0, -3.0, 12.0, 3.0), Layers::DEFAULT);
        let hit = set
            .probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::all())
            .unwrap();
        assert_eq!(hit.node, node(3));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_reindexes_later_colliders() {
        let mut set = ColliderSet::default();
        set.insert(node(0), Rect::new(10.0, -1.0, 12.0, 1.0), Layers::DEFAULT);
        set.insert(node(1), Rect::new(20.0, -1.0, 22.0, 1.0), Layers::DEFAULT);
        set.insert(node(2), Rect::new(30.0, -1.0, 32.0, 1.0), Layers::DEFAULT);
        assert!(set.remove(node(0)));
        assert!(!set.remove(node(0)));
        assert!(set.shape(node(0)).is_none());
        assert!(matches!(set.shape(node(2)), Some(ColliderShape::Rect(r)) if r.x0 == 30.0));
        assert!(set.set_layers(node(2), Layers::BLOCKER));
        assert_eq!(set.layers(node(2)), Some(Layers::BLOCKER));
        assert_eq!(set.layers(node(1)), Some(Layers::DEFAULT));
    }

    #[test]
    fn start_inside_is_skipped() {
        let mut set = ColliderSet::default();
        set.insert(node(0), Rect::new(-5.0, -5.0, 5.0, 5.0), Layers::RELAY);
        assert!(
            set.probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::all())
                .is_none()
        );

        let set = ColliderSet {
            params: CastParams {
                skip_inside: false,
                ..CastParams::default()
            },
            ..set
        };
        let hit = set
            .probe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Layers::all())
            .unwrap();
        assert_eq!(hit.point, Point::new(0.0, 0.0));
    }

    #[test]
    fn mirror_layout_routes_through_relay() {
        let mut scene = Scene::new();
        let mut colliders = ColliderSet::default();

        // The relay's outgoing segment starts inside its own collider.
        let relay = scene.insert_relay(RelayConfig {
            segment: Some(Line::new((50.0, 0.0), (50.0, 100.0))),
            mask: Layers::all(),
        });
        colliders.insert(relay, Circle::new((50.0, 0.0), 4.0), Layers::RELAY);

        let catcher = scene.insert_catcher(CatcherConfig { target: Color::BLUE });
        colliders.insert(
            catcher,
            Rect::new(45.0, 80.0, 55.0, 90.0),
            Layers::CATCHER,
        );

        let wall = scene.insert_obstacle();
        colliders.insert(
            wall,
            StrokedLine {
                line: Line::new((0.0, 40.0), (100.0, 40.0)),
                half_width: 1.0,
            },
            Layers::BLOCKER,
        );
        // Start with the wall out of the way.
        colliders.set_layers(wall, Layers::empty());

        let emitter = scene.insert_emitter(EmitterConfig {
            segment: Some(Line::new((0.0, 0.0), (100.0, 0.0))),
            color: Color::BLUE,
            ..EmitterConfig::default()
        });

        scene.tick(&colliders);
        assert_eq!(scene.emitter(emitter).unwrap().chain(), &[relay, catcher]);
        assert!(scene.catcher(catcher).unwrap().is_active());

        // Raising the wall cuts the relay's beam; the relay notices on its own.
        colliders.set_layers(wall, Layers::BLOCKER);
        let report = scene.tick(&colliders);
        assert_eq!(report.rebuilt, 1);
        assert_eq!(scene.emitter(emitter).unwrap().chain(), &[relay]);
        assert!(!scene.catcher(catcher).unwrap().is_active());
        assert_eq!(scene.relay(relay).unwrap().last_obstruction(), Some(wall));
        let segments: Vec<_> = scene.segments().collect();
        assert_eq!(segments.len(), 2);
        assert!((segments[1].line.p1.y - 39.0).abs() < 1e-9);
        assert_eq!(vec![(relay, segments[1].line)], scene.previews().collect::<Vec<_>>());
    }
}

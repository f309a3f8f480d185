// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sensing interface the propagation core consumes.

use kurbo::{Line, Point};

use crate::types::{Layers, NodeId};

/// What a probe struck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstruction {
    /// The struck node.
    pub node: NodeId,
    /// Where the probe segment meets it.
    pub point: Point,
}

/// Segment query over the host's geometry.
///
/// Implementations must be deterministic for a given input and free of side
/// effects. The core never assumes two calls agree: it probes again every
/// tick and after every topology mutation.
pub trait GeometryQuery {
    /// Return the first node whose layers intersect `mask` along the segment
    /// from `from` to `to`, or `None` when the segment reaches `to` unobstructed.
    fn probe(&self, from: Point, to: Point, mask: Layers) -> Option<Obstruction>;
}

impl<Q: GeometryQuery + ?Sized> GeometryQuery for &Q {
    fn probe(&self, from: Point, to: Point, mask: Layers) -> Option<Obstruction> {
        (**self).probe(from, to, mask)
    }
}

/// Probe an optional segment; a missing segment never strikes anything.
pub(crate) fn probe_segment<Q: GeometryQuery + ?Sized>(
    query: &Q,
    segment: Option<Line>,
    mask: Layers,
) -> Option<Obstruction> {
    let line = segment?;
    query.probe(line.p0, line.p1, mask)
}

/// Where a segment visibly ends given the result of probing it.
pub(crate) fn beam_end(segment: Option<Line>, hit: Option<Obstruction>) -> Option<Point> {
    hit.map(|h| h.point).or(segment.map(|l| l.p1))
}

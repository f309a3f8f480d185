// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public handle types and probe masks.

/// Identifier for a node (relay, catcher, or obstacle) in a [`Scene`](crate::Scene).
///
/// Generational: a handle to a removed node never compares equal to the
/// handle of a node later inserted into the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Identifier for an emitter in a [`Scene`](crate::Scene) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EmitterId(pub(crate) u32, pub(crate) u32);

impl EmitterId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Collision layers a probe may strike.
    ///
    /// Emitters and relays carry a mask; a [`GeometryQuery`](crate::GeometryQuery)
    /// only reports objects whose layers intersect it. Only a few layers are
    /// named; any other bit can be used through [`Layers::from_bits_retain`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Ordinary scenery.
        const DEFAULT = 1 << 0;
        /// Relay bodies.
        const RELAY = 1 << 1;
        /// Catcher bodies.
        const CATCHER = 1 << 2;
        /// Anything else that should stop a beam (doors, pushable blocks).
        const BLOCKER = 1 << 3;
        const _ = !0;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::all()
    }
}

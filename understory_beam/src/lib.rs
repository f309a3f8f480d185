// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Beam: a polled beam propagation graph.
//!
//! Beams leave **emitters**, pass through **relays** that blend every beam
//! reaching them and send the blend on along their own segment, and end at
//! **catchers** that switch on when the beams they receive converge through
//! one relay whose blend equals a target color. Anything else a beam strikes is
//! an **obstacle** and stops it.
//!
//! The crate owns the graph and its state transitions. It does not own any
//! geometry: every line-of-sight question goes through a [`GeometryQuery`]
//! supplied by the host on each [`Scene::tick`].
//!
//! ## Model
//!
//! - Each emitter keeps a *chain*: the relays its beam passes through, in
//!   order, optionally followed by the catcher it ends at. A chain never holds
//!   the same node twice, so relays facing each other cannot loop forever.
//! - Each relay and catcher keeps a *contributor set* of the emitters whose
//!   chain reaches it. A relay is active exactly while that set is non-empty.
//! - Relays blend by averaging red, green, and blue; the result is opaque.
//! - Catchers compare colors exactly and only flip on edges, firing an
//!   [`ActivationHook`] and recording a [`Transition`].
//!
//! ## Ticking
//!
//! [`Scene::tick`] polls every emitter and every active relay. Whatever now
//! blocks a segment is compared with what blocked it on the previous tick; on
//! a change, the affected chains are torn down and rebuilt from scratch. The
//! returned [`TickReport`] lists the activation edges the tick caused.
//!
//! ## Handles
//!
//! Nodes are addressed by generational [`NodeId`]s and emitters by
//! [`EmitterId`]s. Removing a participant invalidates its handle; operations
//! given a stale handle do nothing.
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std`.
//! - `libm`: `no_std` float support through `kurbo/libm`.
//! - `hit2d_adapter`: `adapters::hit2d::ColliderSet`, a ready-made
//!   [`GeometryQuery`] over Kurbo shapes built on `understory_ray_hit`.
//!
//! This crate is `no_std` and uses `alloc`. Diagnostics go through the
//! [`log`] facade: chain rebuilds and activation edges at `debug`, contributor
//! bookkeeping at `trace`.

#![no_std]

extern crate alloc;

mod arena;
mod catcher;
mod chain;
pub mod color;
mod emitter;
mod query;
mod relay;
mod scene;
mod types;

pub mod adapters;

pub use catcher::{
    ActivationHook, Catcher, CatcherConfig, Convergence, Terminal, Transition, TransitionKind,
};
pub use chain::TickReport;
pub use color::Color;
pub use emitter::{Chain, Emitter, EmitterConfig};
pub use query::{GeometryQuery, Obstruction};
pub use relay::{Relay, RelayConfig};
pub use scene::{BeamSegment, NodeKind, Scene, SegmentSource};
pub use types::{EmitterId, Layers, NodeId};

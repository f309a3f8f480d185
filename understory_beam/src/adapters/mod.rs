// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the propagation core stays
//! free of any particular geometry model.
//!
//! ## Available Adapters
//!
//! - [`hit2d`] (`hit2d_adapter` feature): a reference [`GeometryQuery`](crate::GeometryQuery)
//!   over 2D colliders, built on [`understory_ray_hit`] segment casts.

#[cfg(feature = "hit2d_adapter")]
pub mod hit2d;

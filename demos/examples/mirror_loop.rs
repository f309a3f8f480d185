// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relays aimed at each other form a loop; chains stop at the first revisit.
//!
//! Four relays sit on the corners of a square, each re-emitting towards the
//! next. An emitter feeds the loop from outside. The emitter's chain visits
//! each relay once and stops, and every relay glows with the emitter's color.
//!
//! Run:
//! - `cargo run -p understory_beam_demos --example mirror_loop -- -v`

use kurbo::{Circle, Line, Point};
use understory_beam::adapters::hit2d::ColliderSet;
use understory_beam::{Color, EmitterConfig, Layers, RelayConfig, Scene};
use understory_beam_demos::{init_logging, report, verbose_flag};

fn main() {
    init_logging(verbose_flag());

    let corners = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(0.0, 100.0),
    ];

    let mut scene = Scene::new();
    let mut colliders = ColliderSet::default();
    let mut relays = Vec::new();
    for (i, corner) in corners.iter().enumerate() {
        let next = corners[(i + 1) % corners.len()];
        let id = scene.insert_relay(RelayConfig {
            segment: Some(Line::new(*corner, next)),
            mask: Layers::RELAY,
        });
        colliders.insert(id, Circle::new(*corner, 5.0), Layers::RELAY);
        relays.push(id);
    }

    let emitter = scene.insert_emitter(EmitterConfig {
        segment: Some(Line::new((-100.0, 0.0), (50.0, 0.0))),
        color: Color::BLUE,
        mask: Layers::RELAY,
    });

    let r = scene.tick(&colliders);
    report("loop", &scene, &r);

    let chain = scene.emitter(emitter).map(|e| e.chain().to_vec()).unwrap_or_default();
    log::info!("chain: {chain:?}");
    assert_eq!(chain, relays);
    for id in &relays {
        let lit = scene.relay(*id).is_some_and(|r| r.is_active());
        log::info!("{id:?} active: {lit}");
    }

    // The loop is stable across ticks.
    let r = scene.tick(&colliders);
    assert_eq!(r.rebuilt, 0);
}

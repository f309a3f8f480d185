// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two emitters blend in a relay; the relay's beam opens a catcher.
//!
//! A red and a green emitter both aim at a relay. The relay averages them to
//! a dark yellow and re-emits downwards onto a catcher that wants exactly that
//! color. A door then drops across the relay's output, and later the green
//! emitter is removed, showing how the catcher follows the topology.
//!
//! Run:
//! - `cargo run -p understory_beam_demos --example relay_mixing -- -v`

use kurbo::{Circle, Line, Rect};
use understory_beam::adapters::hit2d::ColliderSet;
use understory_beam::{
    CatcherConfig, Color, EmitterConfig, Layers, RelayConfig, Scene, TransitionKind,
};
use understory_beam_demos::{init_logging, report, verbose_flag};
use understory_ray_hit::stroke::StrokedLine;

fn main() {
    init_logging(verbose_flag());

    let mut scene = Scene::new();
    let mut colliders = ColliderSet::default();

    let relay = scene.insert_relay(RelayConfig {
        segment: Some(Line::new((100.0, 100.0), (100.0, 300.0))),
        mask: Layers::all(),
    });
    colliders.insert(relay, Circle::new((100.0, 100.0), 8.0), Layers::RELAY);

    let catcher = scene.insert_catcher(CatcherConfig {
        target: Color::rgb(0.5, 0.5, 0.0),
    });
    colliders.insert(
        catcher,
        Rect::new(90.0, 250.0, 110.0, 270.0),
        Layers::CATCHER,
    );
    scene.set_hook(
        catcher,
        Some(Box::new((
            || log::info!("catcher: door opens"),
            || log::info!("catcher: door closes"),
        ))),
    );

    let door = scene.insert_obstacle();
    colliders.insert(
        door,
        StrokedLine {
            line: Line::new((60.0, 180.0), (140.0, 180.0)),
            half_width: 2.0,
        },
        Layers::empty(),
    );

    scene.insert_emitter(EmitterConfig {
        segment: Some(Line::new((0.0, 100.0), (200.0, 100.0))),
        color: Color::RED,
        ..EmitterConfig::default()
    });
    let green = scene.insert_emitter(EmitterConfig {
        segment: Some(Line::new((100.0, 0.0), (100.0, 200.0))),
        color: Color::GREEN,
        ..EmitterConfig::default()
    });

    let r = scene.tick(&colliders);
    report("initial", &scene, &r);
    assert!(scene.catcher(catcher).is_some_and(|c| c.is_active()));

    // Nothing moved: the graph is left alone.
    let r = scene.tick(&colliders);
    report("idle", &scene, &r);
    assert_eq!(r.rebuilt, 0);

    colliders.set_layers(door, Layers::BLOCKER);
    let r = scene.tick(&colliders);
    report("door down", &scene, &r);
    assert!(
        r.transitions
            .iter()
            .any(|t| t.catcher == catcher && t.kind == TransitionKind::Deactivated)
    );

    colliders.set_layers(door, Layers::empty());
    let r = scene.tick(&colliders);
    report("door up", &scene, &r);

    scene.remove_emitter(green);
    for t in scene.take_transitions() {
        log::info!("[green removed]   {:?} {:?}", t.catcher, t.kind);
    }
    let blend = scene.relay(relay).map(|r| r.aggregate_color());
    log::info!("[green removed] relay color is now {blend:?}");
}

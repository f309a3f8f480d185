// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Understory Beam demos.

use env_logger::{Builder, Env};
use log::LevelFilter;
use understory_beam::{Scene, TickReport};

/// Initialize the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `debug` output from
/// the beam crate (chain rebuilds and activation edges) over `info`.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    // Only fails if a logger is already installed.
    let _ = Builder::from_env(env).try_init();
}

/// Whether `-v` or `--verbose` was passed on the command line.
pub fn verbose_flag() -> bool {
    std::env::args().skip(1).any(|a| a == "-v" || a == "--verbose")
}

/// Log a tick report and the beam segments that should be drawn.
pub fn report(label: &str, scene: &Scene, report: &TickReport) {
    log::info!(
        "[{label}] rebuilt {} chain(s), {} transition(s)",
        report.rebuilt,
        report.transitions.len()
    );
    for t in &report.transitions {
        log::info!("[{label}]   {:?} {:?}", t.catcher, t.kind);
    }
    for seg in scene.segments() {
        let c = seg.color;
        log::info!(
            "[{label}]   {:?}: ({:.1}, {:.1}) -> ({:.1}, {:.1}) rgb({:.2}, {:.2}, {:.2})",
            seg.source,
            seg.line.p0.x,
            seg.line.p0.y,
            seg.line.p1.x,
            seg.line.p1.y,
            c.r,
            c.g,
            c.b
        );
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! artscrub - headless driver for the keyframe timeline engine
//!
//! Loads a keyframe document, builds a scene of timeline entities and:
//! - Lists the series and their tracks
//! - Scrubs the timeline and prints render snapshots as JSON lines
//! - Replays pointer drags and commits them to the document
//! - Reports the hover label under a pointer
//!
//! ## Architecture
//!
//! The timeline engine lives in `artscrub_timeline`. This binary supplies
//! the collaborators the engine leaves out: settings, the document loader
//! with forward-fill, and a stand-in for the render loop and pointer input.

mod cli;
mod document;
mod error;
mod playback;
mod settings;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("artscrub_app={level},artscrub_timeline={level}"))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting artscrub v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli.run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

//! Run a pong match between two computer players
//!
//! Usage: `pong [config.ron]`
//!
//! Log output is controlled with `RUST_LOG` (default `pong=info`).

use pong::PongConfig;
use tracing::info;
use tracing_subscriber::{prelude::*, registry::Registry, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("pong=info"))?;
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            PongConfig::load(&path)?
        }
        None => PongConfig::default(),
    };

    let summary = pong::run(&config)?;
    info!(
        frames = summary.frames,
        time = summary.time,
        p1_lives = summary.p1_lives,
        p2_lives = summary.p2_lives,
        "done"
    );
    Ok(())
}

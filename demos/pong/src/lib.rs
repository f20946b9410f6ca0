//! Pong - a headless paddle game built on tube timelines
//!
//! Two computer players defend the left and right sides of a field. The
//! game never integrates positions per frame; it predicts the ball's
//! wall bounces and the paddles' movements as keyframes and rewrites that
//! prediction whenever something happens:
//! - A paddle input plans the paddle's movement ahead (`Physics::process_input`)
//! - A paddle hit or a stale prediction re-predicts the ball (`Physics::update`)
//! - A missed ball costs the defender one life and waits for their serve
//!
//! ## Example
//!
//! ```rust
//! use pong::{run, PongConfig};
//!
//! let config = PongConfig {
//!     frames: 40,
//!     ..PongConfig::default()
//! };
//! let summary = run(&config).unwrap();
//! assert_eq!(summary.frames, 40);
//! ```

pub mod ai;
mod config;
mod error;
pub mod physics;
pub mod state;
mod vec2;

pub use config::PongConfig;
pub use error::{Error, Result};
pub use physics::Physics;
pub use state::{EventState, PlayerEvent, PongBall, PongPlayer, PongState, Side};
pub use vec2::{Lerp, Linear, Vec2};

use tracing::{debug, info};
use tube_core::TubeTime;

/// Frames between progress reports
const REPORT_INTERVAL: u64 = 100;

/// Outcome of a simulated match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSummary {
    /// Frames simulated
    pub frames: u64,
    /// Game time when the match stopped
    pub time: TubeTime,
    pub p1_lives: i32,
    pub p2_lives: i32,
}

/// Simulate a match between two computer players.
///
/// Stops after `config.frames` frames, or earlier when a player runs out
/// of lives.
pub fn run(config: &PongConfig) -> Result<MatchSummary> {
    config.validate()?;

    let physics = Physics::new(config.clone());
    let mut state = PongState::new(config);
    let mut now: TubeTime = 0.0;

    let kickoff = PlayerEvent::new(Side::Left, EventState::Start);
    physics.process_input(&mut state, Side::Left, &[kickoff], now)?;
    info!(
        width = config.resolution.x,
        height = config.resolution.y,
        lives = config.lives,
        "match started"
    );

    let mut frames = 0;
    let (mut p1_lives, mut p2_lives) = (config.lives, config.lives);
    while frames < config.frames {
        now += config.frame_time;
        frames += 1;

        for side in [Side::Left, Side::Right] {
            let event = ai::next_event(&mut state, side, now);
            physics.process_input(&mut state, side, &[event], now)?;
        }
        physics.update(&mut state, now)?;

        p1_lives = state.p1.lives.at(now);
        p2_lives = state.p2.lives.at(now);
        if p1_lives <= 0 || p2_lives <= 0 {
            break;
        }

        if frames % REPORT_INTERVAL == 0 {
            let ball = state.ball.position_at(now);
            info!(frames, now, p1_lives, p2_lives, "progress");
            debug!(x = ball.x, y = ball.y, "ball");
        }
    }

    info!(frames, now, p1_lives, p2_lives, "match finished");
    Ok(MatchSummary {
        frames,
        time: now,
        p1_lives,
        p2_lives,
    })
}

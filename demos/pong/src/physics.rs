//! Paddle and ball physics on top of timelines
//!
//! The physics never steps positions frame by frame. It computes when the
//! next events happen (a paddle stops, the ball hits a wall) and writes
//! them as keyframes; frames in between only read the timelines.
//!
//! Writes use the two container modes:
//! - `set_end` when new information replaces the predicted future
//!   (an input, a paddle hit, a re-prediction)
//! - reads through `needs_update` to skip work the timelines already cover

use crate::state::{EventState, PlayerEvent, PongBall, PongPlayer, PongState, Side};
use crate::{PongConfig, Result, Vec2};
use tracing::{debug, info};
use tube_core::TubeTime;

/// Applies inputs and collisions to a [`PongState`]
#[derive(Debug, Clone)]
pub struct Physics {
    config: PongConfig,
}

impl Physics {
    pub fn new(config: PongConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PongConfig {
        &self.config
    }

    /// Apply a player's inputs at `now`.
    ///
    /// Events equal to the player's current state are ignored, so holding
    /// a direction keeps the planned movement instead of restarting it.
    pub fn process_input(
        &self,
        state: &mut PongState,
        side: Side,
        events: &[PlayerEvent],
        now: TubeTime,
    ) -> Result<()> {
        let resolution = state.resolution;
        let horizon = now + self.config.extrapolating_time;

        for event in events {
            let (player, ball) = state.player_and_ball(side);
            let previous = player.state.at(now);
            if previous.state == event.state {
                continue;
            }
            player.state.set_end(now, *event)?;

            match event.state {
                EventState::Up | EventState::Down => {
                    let speed = if event.state == EventState::Up {
                        -self.config.paddle_speed
                    } else {
                        self.config.paddle_speed
                    };
                    let from = player.position.at(now);

                    // Full speed now, at rest once the movement is over
                    player.speed.set_end(now, speed)?;
                    player.speed.set_end(horizon, 0.0)?;

                    let average = (player.speed.at(now) + player.speed.at(horizon)) / 2.0;
                    let to = (from + average * self.config.extrapolating_time)
                        .clamp(0.0, resolution.y);

                    player.position.set_end(now, from)?;
                    player.position.set_end(horizon, to)?;
                    player
                        .state
                        .set_end(horizon, PlayerEvent::new(side, EventState::Idle))?;
                    debug!(?side, from, to, until = horizon, "paddle moving");
                }
                EventState::Idle => {
                    let at = player.position.at(now);
                    player.speed.set_end(now, 0.0)?;
                    player.position.set_end(now, at)?;
                }
                EventState::Start => {
                    let speed = if previous.state == EventState::Lost {
                        let serve = self.serve_speed(side);
                        ball.position.set_end(now, resolution * 0.5)?;
                        info!(?side, "serving");
                        serve
                    } else {
                        ball.speed.at(now)
                    };
                    self.predict_ball(ball, resolution, now, speed)?;
                }
                EventState::Lost => {}
            }
        }
        Ok(())
    }

    /// Advance the game to `now`: paddle hits, re-predictions, lost balls.
    pub fn update(&self, state: &mut PongState, now: TubeTime) -> Result<()> {
        let resolution = state.resolution;
        let margin = self.config.paddle_margin;
        let pos = state.ball.position_at(now);
        let speed = state.ball.speed.at(now);

        let hit_left = pos.x <= margin && speed.x < 0.0 && state.p1.covers(pos.y, now);
        let hit_right =
            pos.x >= resolution.x - margin && speed.x > 0.0 && state.p2.covers(pos.y, now);

        if hit_left || hit_right {
            let reflected = Vec2::new(-speed.x, speed.y);
            let bounces = self.predict_ball(&mut state.ball, resolution, now, reflected)?;
            debug!(x = pos.x, y = pos.y, bounces, "paddle hit");
        } else if state.ball.position.needs_update(now) {
            self.predict_ball(&mut state.ball, resolution, now, speed)?;
        }

        if !hit_left && pos.x < 0.0 {
            self.lose(&mut state.p1, now)?;
        }
        if !hit_right && pos.x > resolution.x {
            self.lose(&mut state.p2, now)?;
        }
        Ok(())
    }

    /// Predict the ball's wall bounces starting at `now` with `speed`.
    ///
    /// The ball's current position and `speed` become the new facts at
    /// `now`; every earlier prediction after `now` is dropped. At most
    /// `prediction_depth` bounces are written. Returns how many were.
    pub fn predict_ball(
        &self,
        ball: &mut PongBall,
        resolution: Vec2,
        now: TubeTime,
        speed: Vec2,
    ) -> Result<usize> {
        let start = ball.position_at(now);
        ball.speed.set_end(now, speed)?;
        ball.position.set_end(now, start)?;

        let mut t = now;
        let mut bounces = 0;
        while bounces < self.config.prediction_depth {
            let mut speed = ball.speed.at(t);
            let pos = ball.position.at(t);

            let until_wall = if speed.y > 0.0 {
                (resolution.y - pos.y) / speed.y
            } else if speed.y < 0.0 {
                pos.y / -speed.y
            } else {
                0.0
            };
            if !(until_wall > 0.0) {
                break;
            }

            t += until_wall;
            ball.position.set_end(t, pos + speed * until_wall)?;
            speed.y = -speed.y;
            ball.speed.set_end(t, speed)?;
            bounces += 1;
        }

        debug!(from = now, until = t, bounces, "ball predicted");
        Ok(bounces)
    }

    fn lose(&self, player: &mut PongPlayer, now: TubeTime) -> Result<()> {
        if player.state.at(now).state == EventState::Lost {
            return Ok(());
        }
        let lives = player.lives.at(now) - 1;
        player.lives.set_end(now, lives)?;
        player
            .state
            .set_end(now, PlayerEvent::new(player.side, EventState::Lost))?;
        info!(side = ?player.side, lives, "ball lost");
        Ok(())
    }

    /// Kickoff speed, pointed away from the side that serves
    fn serve_speed(&self, side: Side) -> Vec2 {
        let speed = self.config.ball_speed;
        match side {
            Side::Left => Vec2::new(speed.x.abs(), speed.y),
            Side::Right => Vec2::new(-speed.x.abs(), speed.y),
        }
    }
}

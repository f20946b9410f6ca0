//! Game state: every changing quantity is a timeline
//!
//! Nothing here stores a plain "current" field. Paddles, ball and player
//! states are all [`ValueContainer`]s, so the physics can look at any
//! instant and rewrite the predicted future when something collides.

use crate::{Linear, PongConfig, Vec2};
use tube_core::{TubeTime, ValueContainer};

/// Which side of the field a player defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// What a player is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventState {
    #[default]
    Idle,
    Up,
    Down,
    /// Serve the ball (after a lost point) or kick off the game
    Start,
    /// The ball went past this player's side
    Lost,
}

/// An input from a player, also stored as the player's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerEvent {
    pub player: Side,
    pub state: EventState,
}

impl PlayerEvent {
    pub fn new(player: Side, state: EventState) -> Self {
        Self { player, state }
    }
}

/// A paddle and its owner's bookkeeping
#[derive(Debug)]
pub struct PongPlayer {
    pub side: Side,
    pub state: ValueContainer<PlayerEvent>,
    pub size: ValueContainer<f64>,
    pub speed: ValueContainer<f64>,
    /// Centre of the paddle along the y axis
    pub position: ValueContainer<f64, Linear>,
    pub lives: ValueContainer<i32>,
}

impl PongPlayer {
    /// Create a player with a centred paddle
    pub fn new(side: Side, config: &PongConfig) -> Self {
        Self {
            side,
            state: ValueContainer::with_initial(PlayerEvent::new(side, EventState::Idle)),
            size: ValueContainer::with_initial(config.paddle_size),
            speed: ValueContainer::new(),
            position: ValueContainer::with_initial(config.resolution.y / 2.0),
            lives: ValueContainer::with_initial(config.lives),
        }
    }

    /// Check whether the paddle spans `y` at `now`
    pub fn covers(&mut self, y: f64, now: TubeTime) -> bool {
        let position = self.position.at(now);
        let half = self.size.at(now) / 2.0;
        y > position - half && y < position + half
    }
}

/// The ball
#[derive(Debug)]
pub struct PongBall {
    pub speed: ValueContainer<Vec2>,
    /// Keyframed at kickoff, collisions and predicted wall bounces
    pub position: ValueContainer<Vec2, Linear>,
}

impl PongBall {
    /// Create a ball at the centre of the field
    pub fn new(config: &PongConfig) -> Self {
        Self {
            speed: ValueContainer::with_initial(config.ball_speed),
            position: ValueContainer::with_initial(config.resolution * 0.5),
        }
    }

    /// Where the ball is at `now`.
    ///
    /// Between keyframes this is the interpolated position. Past the last
    /// keyframe the ball keeps moving with the speed it had there.
    pub fn position_at(&mut self, now: TubeTime) -> Vec2 {
        let interpolated = self.position.at(now);

        let anchor = self.position.current_keyframe();
        if anchor.next().is_some() || !anchor.time().is_finite() {
            return interpolated;
        }
        let (origin, since) = (*anchor.value(), anchor.time());

        origin + self.speed.at(since) * (now - since)
    }
}

/// Everything that makes up one game
#[derive(Debug)]
pub struct PongState {
    pub p1: PongPlayer,
    pub p2: PongPlayer,
    pub ball: PongBall,
    pub resolution: Vec2,
}

impl PongState {
    pub fn new(config: &PongConfig) -> Self {
        Self {
            p1: PongPlayer::new(Side::Left, config),
            p2: PongPlayer::new(Side::Right, config),
            ball: PongBall::new(config),
            resolution: config.resolution,
        }
    }

    pub fn player_mut(&mut self, side: Side) -> &mut PongPlayer {
        match side {
            Side::Left => &mut self.p1,
            Side::Right => &mut self.p2,
        }
    }

    /// Borrow a player and the ball at the same time
    pub fn player_and_ball(&mut self, side: Side) -> (&mut PongPlayer, &mut PongBall) {
        match side {
            Side::Left => (&mut self.p1, &mut self.ball),
            Side::Right => (&mut self.p2, &mut self.ball),
        }
    }
}

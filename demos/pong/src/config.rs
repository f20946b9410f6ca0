//! RON configuration for the pong simulation

use crate::{Error, Result, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Simulation settings
///
/// Every field has a default, so a RON file only needs the values it
/// changes:
///
/// ```
/// use pong::PongConfig;
///
/// let config = PongConfig::from_ron_str("(frames: 100, prediction_depth: 5)").unwrap();
/// assert_eq!(config.frames, 100);
/// assert_eq!(config.prediction_depth, 5);
/// assert_eq!(config.lives, PongConfig::default().lives);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Size of the playing field; the ball bounces off y = 0 and y = resolution.y
    pub resolution: Vec2,
    /// How far ahead a paddle movement is planned
    pub extrapolating_time: f64,
    /// Maximum number of wall bounces predicted in one go
    pub prediction_depth: usize,
    /// Paddle speed at the start of a movement
    pub paddle_speed: f64,
    /// Paddle length
    pub paddle_size: f64,
    /// Distance from a side at which the paddle meets the ball
    pub paddle_margin: f64,
    /// Ball velocity at kickoff and after every serve
    pub ball_speed: Vec2,
    /// Lives per player
    pub lives: i32,
    /// Simulation time per frame
    pub frame_time: f64,
    /// Number of frames to simulate before stopping
    pub frames: u64,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            resolution: Vec2::new(80.0, 40.0),
            extrapolating_time: 10.0,
            prediction_depth: 50,
            paddle_speed: 1.0,
            paddle_size: 8.0,
            paddle_margin: 1.0,
            ball_speed: Vec2::new(1.0, 0.5),
            lives: 3,
            frame_time: 0.5,
            frames: 2000,
        }
    }
}

impl PongConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&content)
    }

    /// Parse and validate configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: PongConfig =
            ron::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings describe a playable field
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.x > 0.0 && self.resolution.y > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "resolution must be positive, got {:?}",
                self.resolution
            )));
        }
        if !(self.frame_time > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "frame_time must be positive, got {}",
                self.frame_time
            )));
        }
        if !(self.extrapolating_time > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "extrapolating_time must be positive, got {}",
                self.extrapolating_time
            )));
        }
        if !(self.paddle_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "paddle_size must be positive, got {}",
                self.paddle_size
            )));
        }
        if self.lives <= 0 {
            return Err(Error::InvalidConfig(format!(
                "lives must be at least 1, got {}",
                self.lives
            )));
        }
        Ok(())
    }
}

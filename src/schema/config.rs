//! Configuration types for playback, actor motion and stair layout.

use serde::{Deserialize, Serialize};

use super::AlgorithmKind;

/// Smallest stair count accepted from interactive input.
pub const MIN_STAIRS: i64 = 1;

/// Largest stair count accepted from configuration or interactive input.
pub const MAX_STAIRS: i64 = 45;

/// Floor applied to positive playback speeds.
pub const MIN_PLAYBACK_SPEED: f64 = 0.1;

fn default_stairs() -> i64 {
    5
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Algorithm to walk through.
    #[serde(default)]
    pub algorithm: AlgorithmKind,
    /// Problem size `n` (number of stairs).
    #[serde(default = "default_stairs")]
    pub stairs: i64,
    /// Discrete step clock parameters.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Actor motion timings and path shape.
    #[serde(default)]
    pub motion: MotionConfig,
    /// Rendering surface geometry.
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::Dp,
            stairs: default_stairs(),
            playback: PlaybackConfig::default(),
            motion: MotionConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Step clock parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial speed multiplier (1.0 = one step per `step_ms`).
    pub speed: f64,
    /// Nominal duration of one step at speed 1.0, in milliseconds.
    pub step_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            step_ms: 1000.0,
        }
    }
}

/// Actor motion phase durations (milliseconds) and path shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Anticipatory pose before climbing.
    pub prepare_ms: f64,
    /// Climb duration for a one-stair move.
    pub climb_one_ms: f64,
    /// Climb duration for a move of two stairs or more.
    pub climb_two_ms: f64,
    /// Pause after arriving, before celebrating.
    pub arrived_ms: f64,
    /// Celebration length before returning to rest.
    pub celebrate_ms: f64,
    /// Number of segments in a climbing path (points = segments + 1).
    pub path_segments: usize,
    /// How far the path bows above the higher endpoint.
    pub arc_height: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            prepare_ms: 300.0,
            climb_one_ms: 800.0,
            climb_two_ms: 1200.0,
            arrived_ms: 800.0,
            celebrate_ms: 1000.0,
            path_segments: 20,
            arc_height: 50.0,
        }
    }
}

/// Rendering surface geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    /// Distance the actor stands above a stair.
    pub stand_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            stand_offset: 30.0,
        }
    }
}

impl EngineConfig {
    /// Step duration at the configured initial speed.
    #[inline]
    pub fn initial_step_ms(&self) -> f64 {
        self.playback.step_ms / self.playback.speed
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stairs > MAX_STAIRS {
            return Err(ConfigError::StairsTooLarge {
                stairs: self.stairs,
                max: MAX_STAIRS,
            });
        }
        if !self.playback.speed.is_finite() || self.playback.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.playback.speed));
        }
        if !self.playback.step_ms.is_finite() || self.playback.step_ms <= 0.0 {
            return Err(ConfigError::InvalidDuration("playback.step_ms"));
        }
        let m = &self.motion;
        for (name, value) in [
            ("motion.prepare_ms", m.prepare_ms),
            ("motion.climb_one_ms", m.climb_one_ms),
            ("motion.climb_two_ms", m.climb_two_ms),
            ("motion.arrived_ms", m.arrived_ms),
            ("motion.celebrate_ms", m.celebrate_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration(name));
            }
        }
        if m.path_segments == 0 {
            return Err(ConfigError::InvalidPathResolution);
        }
        if !(self.layout.width > 0.0 && self.layout.height > 0.0) {
            return Err(ConfigError::InvalidLayout);
        }
        Ok(())
    }
}

/// Validate a stair count typed by a user.
pub fn validate_stairs(input: &str) -> Result<i64, ConfigError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ConfigError::MissingStairs);
    }
    let n: i64 = input
        .parse()
        .map_err(|_| ConfigError::NotAnInteger(input.to_string()))?;
    if n < MIN_STAIRS {
        return Err(ConfigError::StairsTooSmall {
            stairs: n,
            min: MIN_STAIRS,
        });
    }
    if n > MAX_STAIRS {
        return Err(ConfigError::StairsTooLarge {
            stairs: n,
            max: MAX_STAIRS,
        });
    }
    Ok(n)
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown algorithm '{0}' (expected dp, matrix or formula)")]
    UnknownAlgorithm(String),
    #[error("Stair count is required")]
    MissingStairs,
    #[error("Stair count '{0}' is not an integer")]
    NotAnInteger(String),
    #[error("Stair count {stairs} is below the minimum of {min}")]
    StairsTooSmall { stairs: i64, min: i64 },
    #[error("Stair count {stairs} exceeds the maximum of {max}")]
    StairsTooLarge { stairs: i64, max: i64 },
    #[error("Playback speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),
    #[error("Duration {0} must be finite and non-negative")]
    InvalidDuration(&'static str),
    #[error("Climbing path needs at least one segment")]
    InvalidPathResolution,
    #[error("Layout width and height must be positive")]
    InvalidLayout,
}

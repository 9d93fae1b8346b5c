//! Playback state container and its transition function.

use std::sync::Arc;

use serde::Serialize;

use crate::schema::{AlgorithmKind, MIN_PLAYBACK_SPEED, Solution, Step, StepStatus};

/// Authoritative playback state.
///
/// Only [`transition`] produces new values; the fields are read through
/// accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    algorithm: AlgorithmKind,
    /// Steps are immutable, so successive states share one allocation.
    timeline: Arc<[Step]>,
    total_steps: usize,
    current_step: usize,
    is_playing: bool,
    playback_speed: f64,
    /// Indexed by algorithm position, not by timeline step.
    values: Vec<u64>,
    /// Indexed by algorithm position, not by timeline step.
    statuses: Vec<StepStatus>,
    motion_active: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::default(),
            timeline: Arc::from(Vec::new()),
            total_steps: 0,
            current_step: 0,
            is_playing: false,
            playback_speed: 1.0,
            values: Vec::new(),
            statuses: Vec::new(),
            motion_active: false,
        }
    }
}

/// Every way the playback state can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the timeline and per-position data, rewinding to step 0.
    Initialize {
        timeline: Vec<Step>,
        values: Vec<u64>,
        statuses: Vec<StepStatus>,
    },
    /// Switch algorithm. Full reset; only the playback speed survives.
    SetAlgorithm(AlgorithmKind),
    /// Toggle playing/paused.
    PlayPause,
    /// Jump to a step, clamped into the timeline.
    SetCurrentStep(i64),
    /// Rewind to step 0 and pause, keeping timeline and speed.
    ResetAnimation,
    /// Change speed. Non-positive or non-finite values are ignored.
    SetPlaybackSpeed(f64),
    /// Mark whether the actor motion engine owns an in-flight transition.
    SetMotionActive(bool),
}

impl Action {
    pub fn initialize(solution: Solution) -> Self {
        Self::Initialize {
            timeline: solution.timeline,
            values: solution.values,
            statuses: solution.statuses,
        }
    }
}

/// Apply `action` to `state`, returning the next state. Never fails.
pub fn transition(state: PlaybackState, action: Action) -> PlaybackState {
    match action {
        Action::Initialize {
            timeline,
            values,
            statuses,
        } => PlaybackState {
            total_steps: timeline.len(),
            timeline: Arc::from(timeline),
            values,
            statuses,
            current_step: 0,
            is_playing: false,
            motion_active: false,
            ..state
        },
        Action::SetAlgorithm(algorithm) => PlaybackState {
            algorithm,
            playback_speed: state.playback_speed,
            ..PlaybackState::default()
        },
        Action::PlayPause => PlaybackState {
            is_playing: !state.is_playing,
            ..state
        },
        Action::SetCurrentStep(step) => {
            let last = state.total_steps.saturating_sub(1) as i64;
            let current_step = step.clamp(0, last) as usize;
            PlaybackState {
                current_step,
                ..state
            }
        }
        Action::ResetAnimation => PlaybackState {
            current_step: 0,
            is_playing: false,
            motion_active: false,
            ..state
        },
        Action::SetPlaybackSpeed(speed) => {
            if !speed.is_finite() || speed <= 0.0 {
                return state;
            }
            PlaybackState {
                playback_speed: speed.max(MIN_PLAYBACK_SPEED),
                ..state
            }
        }
        Action::SetMotionActive(motion_active) => PlaybackState {
            motion_active,
            ..state
        },
    }
}

impl PlaybackState {
    /// Apply an action in place.
    pub fn apply(&mut self, action: Action) {
        *self = transition(std::mem::take(self), action);
    }

    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    pub fn timeline(&self) -> &[Step] {
        &self.timeline
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn statuses(&self) -> &[StepStatus] {
        &self.statuses
    }

    pub fn motion_active(&self) -> bool {
        self.motion_active
    }

    /// Step at the current index, if the timeline is non-empty.
    pub fn active_step(&self) -> Option<&Step> {
        self.timeline.get(self.current_step)
    }

    /// True when there is no step after the current one.
    pub fn is_at_end(&self) -> bool {
        self.current_step + 1 >= self.total_steps
    }
}

//! Actor motion phase machine.
//!
//! Each time the active step changes the actor is snapped to the resting
//! point of the stair it stood on before that step, then runs
//! `PREPARE -> MOVING -> ARRIVED -> CELEBRATING -> NONE` toward the step's
//! target stair on its own frame loop. A step change mid-cycle aborts the
//! cycle and starts over for the new step.

use serde::Serialize;

use super::easing::ease_in_out_quad;
use super::layout::StairLayout;
use super::path::{ClimbPath, Point};
use crate::algorithms::IndexMap;
use crate::playback::{FrameHandle, FrameQueue, LoopKind};
use crate::schema::{MotionConfig, Step};

/// Motion cycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    None,
    Prepare,
    Moving,
    Arrived,
    Celebrating,
}

impl Phase {
    /// Phase that follows this one in an uninterrupted cycle.
    pub fn next(self) -> Phase {
        match self {
            Phase::None => Phase::Prepare,
            Phase::Prepare => Phase::Moving,
            Phase::Moving => Phase::Arrived,
            Phase::Arrived => Phase::Celebrating,
            Phase::Celebrating => Phase::None,
        }
    }
}

/// How the actor is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pose {
    #[default]
    Standing,
    Thinking,
    ClimbingOne,
    ClimbingTwo,
    Celebrating,
}

/// Observable actor state, handed to the rendering surface each frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionState {
    pub phase: Phase,
    /// Eased fraction of the climb; only advances while moving.
    pub progress: f32,
    pub position: Point,
    pub path: ClimbPath,
    pub pose: Pose,
    /// Speech annotation shown next to the actor.
    pub speech: Option<String>,
    /// Stair the current cycle started from.
    pub from_stair: usize,
    /// Stair the current cycle ends on.
    pub to_stair: usize,
}

impl MotionState {
    fn resting(stair: usize, layout: &StairLayout) -> Self {
        let position = layout.rest_point(stair);
        Self {
            phase: Phase::None,
            progress: 0.0,
            position,
            path: ClimbPath::stationary(position),
            pose: Pose::Standing,
            speech: None,
            from_stair: stair,
            to_stair: stair,
        }
    }

    pub fn show_speech(&self) -> bool {
        self.speech.is_some()
    }
}

/// Owns the actor's motion state and its frame loop.
#[derive(Debug)]
pub struct MotionEngine {
    config: MotionConfig,
    state: MotionState,
    /// Step the current state was derived from.
    step: Option<usize>,
    phase_started: Option<f64>,
    handle: Option<FrameHandle>,
}

impl MotionEngine {
    pub fn new(config: MotionConfig, layout: &StairLayout) -> Self {
        Self {
            config,
            state: MotionState::resting(0, layout),
            step: None,
            phase_started: None,
            handle: None,
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// True while a cycle is in flight.
    pub fn is_active(&self) -> bool {
        self.state.phase != Phase::None
    }

    /// Step the actor is currently following.
    pub fn step(&self) -> Option<usize> {
        self.step
    }

    pub fn handle(&self) -> Option<FrameHandle> {
        self.handle
    }

    /// Cancel the frame loop and put the actor back on stair 0.
    pub fn reset(&mut self, layout: &StairLayout, frames: &mut FrameQueue) {
        self.cancel(frames);
        self.state = MotionState::resting(0, layout);
        self.step = None;
    }

    /// Cancel the frame loop, leaving the actor where it is.
    pub fn cancel(&mut self, frames: &mut FrameQueue) {
        if let Some(handle) = self.handle.take() {
            frames.cancel(handle);
            log::trace!("motion frame {} cancelled", handle.id());
        }
        self.phase_started = None;
    }

    /// Follow `step` of `timeline`.
    ///
    /// Does nothing if `step` is already followed. Otherwise aborts any
    /// cycle in flight, snaps to the resting point the step starts from and
    /// starts a new cycle when the step moves the actor. Returns whether a
    /// cycle was started.
    pub fn follow(
        &mut self,
        step: usize,
        timeline: &[Step],
        map: &IndexMap,
        layout: &StairLayout,
        frames: &mut FrameQueue,
    ) -> bool {
        if self.step == Some(step) {
            return false;
        }
        if self.is_active() {
            log::trace!("motion interrupted in {:?} by step {step}", self.state.phase);
        }
        self.cancel(frames);
        self.step = Some(step);

        let from = if step == 0 { 0 } else { map.target_of(step - 1) };
        let to = map.target_of(step);
        let (from, to) = (from.min(layout.len() - 1), to.min(layout.len() - 1));

        self.state = MotionState::resting(from, layout);
        self.state.to_stair = to;

        if let Some(active) = timeline.get(step).filter(|s| s.is_combining()) {
            self.state.pose = Pose::Thinking;
            self.state.speech = active.simple_explanation().map(str::to_string);
        }

        if from == to {
            return false;
        }

        self.state.path = ClimbPath::arc(
            layout.rest_point(from),
            layout.rest_point(to),
            self.config.path_segments,
            self.config.arc_height,
        );
        self.enter(Phase::Prepare);
        self.handle = Some(frames.request(LoopKind::Motion));
        true
    }

    fn enter(&mut self, phase: Phase) {
        log::trace!("motion {:?} -> {phase:?}", self.state.phase);
        self.state.phase = phase;
        self.phase_started = None;
        match phase {
            Phase::None => {
                self.state.pose = Pose::Standing;
                self.state.speech = None;
            }
            Phase::Prepare => {}
            Phase::Moving => {
                self.state.progress = 0.0;
                self.state.speech = None;
                self.state.pose = if self.distance() <= 1 {
                    Pose::ClimbingOne
                } else {
                    Pose::ClimbingTwo
                };
            }
            Phase::Arrived => {
                self.state.progress = 1.0;
                self.state.position = self.state.path.end();
                self.state.pose = Pose::Standing;
            }
            Phase::Celebrating => self.state.pose = Pose::Celebrating,
        }
    }

    fn distance(&self) -> usize {
        self.state.from_stair.abs_diff(self.state.to_stair)
    }

    fn climb_ms(&self) -> f64 {
        if self.distance() <= 1 {
            self.config.climb_one_ms
        } else {
            self.config.climb_two_ms
        }
    }

    /// Handle one fired frame callback at `now_ms`.
    ///
    /// Advances at most one phase per frame. Returns the phase entered, if
    /// any; `Some(Phase::None)` means the cycle finished.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        frames: &mut FrameQueue,
    ) -> Option<Phase> {
        if self.handle != Some(handle) {
            return None;
        }
        self.handle = None;

        let started = *self.phase_started.get_or_insert(now_ms);
        let elapsed = now_ms - started;

        let phase = self.state.phase;
        let done = match phase {
            Phase::None => return None,
            Phase::Prepare => elapsed >= self.config.prepare_ms,
            Phase::Moving => {
                let duration = self.climb_ms();
                let raw = if duration > 0.0 {
                    (elapsed / duration).min(1.0) as f32
                } else {
                    1.0
                };
                if raw < 1.0 {
                    self.state.progress = ease_in_out_quad(raw);
                    self.state.position = self.state.path.sample(self.state.progress);
                }
                raw >= 1.0
            }
            Phase::Arrived => elapsed >= self.config.arrived_ms,
            Phase::Celebrating => elapsed >= self.config.celebrate_ms,
        };
        let entered = done.then(|| phase.next());

        if let Some(phase) = entered {
            self.enter(phase);
            self.phase_started = Some(now_ms);
        }
        if self.is_active() {
            self.handle = Some(frames.request(LoopKind::Motion));
        }
        entered
    }
}

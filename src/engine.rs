//! Playback engine: one timeline, its step clock and its actor.
//!
//! The engine is the only writer of [`PlaybackState`]. Every transport method
//! turns into one or more [`Action`]s applied through the transition
//! function, after which the step clock and the actor are reconciled with
//! the new state. Hosts drive time by calling [`Engine::tick`] once per
//! display frame.

use serde_json::json;

use crate::algorithms::{self, IndexMap};
use crate::animation::{MotionEngine, MotionState, Phase, StairLayout};
use crate::playback::{
    Action, FrameQueue, LoopKind, PlaybackState, Scheduler, progress_to_step, step_to_progress,
};
use crate::render::{RenderFrame, RenderSurface, Scene};
use crate::schema::{AlgorithmKind, DisplayLanguage, EngineConfig, PreferenceKey, Preferences};

/// What happened during one [`Engine::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Steps committed by the step clock, in order.
    pub steps: Vec<usize>,
    /// Actor phases entered, in order.
    pub phases: Vec<Phase>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.phases.is_empty()
    }
}

pub struct Engine {
    config: EngineConfig,
    state: PlaybackState,
    scheduler: Scheduler,
    motion: MotionEngine,
    frames: FrameQueue,
    map: IndexMap,
    layout: StairLayout,
    stairs: i64,
    result: u64,
    preferences: Option<Box<dyn Preferences>>,
}

impl Engine {
    /// Build the configured walkthrough, paused on step 0.
    pub fn new(config: EngineConfig) -> Self {
        let layout = StairLayout::for_problem(config.stairs, &config.layout);
        let mut engine = Self {
            scheduler: Scheduler::new(config.playback.step_ms),
            motion: MotionEngine::new(config.motion.clone(), &layout),
            state: PlaybackState::default(),
            frames: FrameQueue::new(),
            map: IndexMap::default(),
            layout,
            stairs: config.stairs,
            result: 0,
            preferences: None,
            config,
        };
        engine.dispatch(Action::SetPlaybackSpeed(engine.config.playback.speed));
        engine.rebuild(engine.config.algorithm, engine.config.stairs);
        engine
    }

    /// Like [`Engine::new`], restoring the preferred speed from `preferences`.
    pub fn with_preferences(config: EngineConfig, preferences: Box<dyn Preferences>) -> Self {
        let mut engine = Self::new(config);
        if let Some(speed) = preferences.playback_speed() {
            log::debug!("restoring preferred playback speed {speed}");
            engine.dispatch(Action::SetPlaybackSpeed(speed));
        }
        engine.preferences = Some(preferences);
        engine
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn motion(&self) -> &MotionState {
        self.motion.state()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answer computed by the current builder.
    pub fn result(&self) -> u64 {
        self.result
    }

    /// Current problem size.
    pub fn stairs(&self) -> i64 {
        self.stairs
    }

    pub fn layout(&self) -> &StairLayout {
        &self.layout
    }

    pub fn index_map(&self) -> &IndexMap {
        &self.map
    }

    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }

    pub fn preferences(&self) -> Option<&dyn Preferences> {
        self.preferences.as_deref()
    }

    /// True when neither loop has a callback pending.
    pub fn is_idle(&self) -> bool {
        self.frames.is_idle()
    }

    pub fn play_pause(&mut self) {
        self.dispatch(Action::PlayPause);
    }

    /// Rewind to step 0, pause, and put the actor back on stair 0.
    pub fn reset_animation(&mut self) {
        self.motion.reset(&self.layout, &mut self.frames);
        self.dispatch(Action::ResetAnimation);
    }

    pub fn previous_step(&mut self) {
        let step = self.state.current_step() as i64 - 1;
        self.set_current_step(step);
    }

    pub fn next_step(&mut self) {
        let step = self.state.current_step() as i64 + 1;
        self.set_current_step(step);
    }

    /// Jump to `step` (clamped), pausing playback first.
    pub fn set_current_step(&mut self, step: i64) {
        if self.state.is_playing() {
            self.dispatch(Action::PlayPause);
        }
        self.dispatch(Action::SetCurrentStep(step));
    }

    /// Jump to the step under a scrub bar at `percent`.
    pub fn scrub_to(&mut self, percent: f64) {
        let step = progress_to_step(percent, self.state.total_steps());
        self.set_current_step(step as i64);
    }

    /// Change speed, remembering accepted values in the preference store.
    pub fn set_playback_speed(&mut self, speed: f64) {
        if !speed.is_finite() || speed <= 0.0 {
            log::debug!("ignoring playback speed {speed}");
            return;
        }
        self.dispatch(Action::SetPlaybackSpeed(speed));
        let accepted = self.state.playback_speed();
        if let Some(preferences) = self.preferences.as_mut() {
            preferences.set(PreferenceKey::PlaybackSpeed, json!(accepted));
        }
    }

    /// Switch algorithm: full reset and rebuild for the current size.
    pub fn set_algorithm(&mut self, kind: AlgorithmKind) {
        self.rebuild(kind, self.stairs);
    }

    /// Change the problem size: full reset and rebuild.
    pub fn set_problem_size(&mut self, stairs: i64) {
        self.rebuild(self.state.algorithm(), stairs);
    }

    pub fn display_language(&self) -> DisplayLanguage {
        self.preferences
            .as_ref()
            .and_then(|p| p.display_language())
            .unwrap_or_default()
    }

    pub fn set_display_language(&mut self, language: DisplayLanguage) {
        if let Some(preferences) = self.preferences.as_mut() {
            preferences.set(PreferenceKey::DisplayLanguage, json!(language));
        }
    }

    /// Cancel both frame loops.
    pub fn shutdown(&mut self) {
        self.scheduler.stop(&mut self.frames);
        self.motion.cancel(&mut self.frames);
        self.frames.clear();
    }

    /// Run every frame callback due at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        let mut report = TickReport::default();
        for (handle, kind) in self.frames.drain() {
            match kind {
                LoopKind::Scheduler => {
                    let actions =
                        self.scheduler
                            .on_frame(handle, now_ms, &self.state, &mut self.frames);
                    for action in actions {
                        if let Action::SetCurrentStep(step) = action {
                            report.steps.push(step as usize);
                        }
                        self.dispatch(action);
                    }
                }
                LoopKind::Motion => {
                    if let Some(phase) = self.motion.on_frame(handle, now_ms, &mut self.frames) {
                        report.phases.push(phase);
                        self.sync_motion_flag();
                    }
                }
            }
        }
        report
    }

    /// Snapshot for the rendering surface.
    pub fn frame(&self) -> RenderFrame {
        let state = &self.state;
        let active = state.active_step();
        RenderFrame {
            algorithm: state.algorithm(),
            current_step: state.current_step(),
            total_steps: state.total_steps(),
            is_playing: state.is_playing(),
            playback_speed: state.playback_speed(),
            progress_percent: step_to_progress(state.current_step(), state.total_steps()),
            description: active.map(|s| s.description.clone()).unwrap_or_default(),
            explanation: active.and_then(|s| s.explanation.clone()),
            code: active.and_then(|s| s.code.clone()),
            scene: Scene::at(state.timeline(), state.current_step()),
            stairs: self.layout.stairs().to_vec(),
            motion: self.motion.state().clone(),
        }
    }

    /// Hand the current frame to `surface`.
    pub fn render<S: RenderSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.render(&self.frame())
    }

    fn rebuild(&mut self, kind: AlgorithmKind, stairs: i64) {
        self.scheduler.stop(&mut self.frames);
        self.stairs = stairs;
        self.layout = StairLayout::for_problem(stairs, &self.config.layout);
        self.motion.reset(&self.layout, &mut self.frames);
        self.dispatch(Action::SetAlgorithm(kind));

        let solution = algorithms::build(kind, stairs);
        self.map = IndexMap::new(&solution.timeline);
        self.result = solution.result;
        self.dispatch(Action::initialize(solution));
    }

    fn dispatch(&mut self, action: Action) {
        log::trace!("dispatch {action:?}");
        self.state.apply(action);
        self.scheduler.sync(&self.state, &mut self.frames);
        if self.state.total_steps() > 0 {
            self.motion.follow(
                self.state.current_step(),
                self.state.timeline(),
                &self.map,
                &self.layout,
                &mut self.frames,
            );
        }
        self.sync_motion_flag();
    }

    fn sync_motion_flag(&mut self) {
        let active = self.motion.is_active();
        if self.state.motion_active() != active {
            self.state.apply(Action::SetMotionActive(active));
        }
    }
}

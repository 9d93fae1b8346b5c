//! Discrete step clock.
//!
//! While playing, the scheduler commits one step per
//! `step_ms / playback_speed` of elapsed time, measured against real frame
//! timestamps rather than a loop counter. It never mutates the playback state
//! itself; it returns the actions the owner must apply.

use super::frame::{FrameHandle, FrameQueue, LoopKind};
use super::state::{Action, PlaybackState};
use crate::schema::AlgorithmKind;

/// Identity of the timeline a loop was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunKey {
    algorithm: AlgorithmKind,
    total_steps: usize,
}

impl RunKey {
    fn of(state: &PlaybackState) -> Self {
        Self {
            algorithm: state.algorithm(),
            total_steps: state.total_steps(),
        }
    }
}

/// Frame-driven step scheduler. At most one callback is outstanding.
#[derive(Debug)]
pub struct Scheduler {
    step_ms: f64,
    handle: Option<FrameHandle>,
    /// Timestamp of the last committed step boundary, set on the first frame.
    boundary: Option<f64>,
    run: Option<RunKey>,
}

impl Scheduler {
    /// `step_ms` is the step duration at speed 1.0.
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            handle: None,
            boundary: None,
            run: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<FrameHandle> {
        self.handle
    }

    #[inline]
    pub fn step_duration_ms(&self, speed: f64) -> f64 {
        self.step_ms / speed
    }

    /// Reconcile the loop with `state` after any state change.
    ///
    /// Stops when not playing. Starts (cancelling any previous callback
    /// first) when playing on a different timeline or not yet running.
    pub fn sync(&mut self, state: &PlaybackState, frames: &mut FrameQueue) {
        if !state.is_playing() || state.total_steps() == 0 {
            self.stop(frames);
            return;
        }
        let key = RunKey::of(state);
        if self.is_running() && self.run == Some(key) {
            return;
        }
        self.start(key, frames);
    }

    fn start(&mut self, key: RunKey, frames: &mut FrameQueue) {
        self.stop(frames);
        self.run = Some(key);
        let handle = frames.request(LoopKind::Scheduler);
        self.handle = Some(handle);
        log::debug!(
            "scheduler started for {} ({} steps), frame {}",
            key.algorithm,
            key.total_steps,
            handle.id()
        );
    }

    /// Cancel the outstanding callback, if any. Idempotent.
    pub fn stop(&mut self, frames: &mut FrameQueue) {
        if let Some(handle) = self.handle.take() {
            frames.cancel(handle);
            log::debug!("scheduler stopped, frame {} cancelled", handle.id());
        }
        self.boundary = None;
        self.run = None;
    }

    /// Handle one fired frame callback at time `now_ms`.
    ///
    /// Callbacks that are not the current handle are stale and ignored.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        state: &PlaybackState,
        frames: &mut FrameQueue,
    ) -> Vec<Action> {
        if self.handle != Some(handle) {
            return Vec::new();
        }
        self.handle = None;

        if !state.is_playing() || state.total_steps() == 0 {
            self.stop(frames);
            return Vec::new();
        }
        if state.is_at_end() {
            self.stop(frames);
            log::debug!("scheduler reached the last step");
            return vec![Action::PlayPause];
        }

        let boundary = *self.boundary.get_or_insert(now_ms);
        let duration = self.step_duration_ms(state.playback_speed());
        let elapsed = now_ms - boundary;
        if elapsed < duration {
            self.handle = Some(frames.request(LoopKind::Scheduler));
            return Vec::new();
        }

        let next = state.current_step() + 1;
        self.boundary = Some(if elapsed >= 2.0 * duration {
            now_ms
        } else {
            boundary + duration
        });
        log::debug!("scheduler committed step {next} at {now_ms:.1}ms");

        let mut actions = vec![Action::SetCurrentStep(next as i64)];
        if next + 1 >= state.total_steps() {
            actions.push(Action::PlayPause);
            self.stop(frames);
            log::debug!("scheduler reached the last step");
        } else {
            self.handle = Some(frames.request(LoopKind::Scheduler));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Step;

    fn playing(steps: usize) -> PlaybackState {
        let mut state = PlaybackState::default();
        state.apply(Action::Initialize {
            timeline: (0..steps).map(|i| Step::new(format!("step {i}"))).collect(),
            values: vec![],
            statuses: vec![],
        });
        state.apply(Action::PlayPause);
        state
    }

    /// Fire every due callback at `now`, applying the returned actions.
    fn pump(
        scheduler: &mut Scheduler,
        state: &mut PlaybackState,
        frames: &mut FrameQueue,
        now: f64,
    ) {
        for (handle, kind) in frames.drain() {
            if kind == LoopKind::Scheduler {
                for action in scheduler.on_frame(handle, now, state, frames) {
                    state.apply(action);
                }
                scheduler.sync(state, frames);
            }
        }
    }

    #[test]
    fn test_first_advance_after_one_second() {
        let mut state = playing(10);
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);

        let mut t = 0.0;
        while t < 1000.0 {
            pump(&mut scheduler, &mut state, &mut frames, t);
            assert_eq!(state.current_step(), 0, "advanced early at {t}");
            t += 10.0;
        }
        pump(&mut scheduler, &mut state, &mut frames, 1000.0);
        assert_eq!(state.current_step(), 1);
        assert!(state.is_playing());
    }

    #[test]
    fn test_stops_on_last_step() {
        let mut state = playing(10);
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);

        let mut t = 0.0;
        while t <= 12_000.0 {
            pump(&mut scheduler, &mut state, &mut frames, t);
            t += 10.0;
        }
        assert_eq!(state.current_step(), 9);
        assert!(!state.is_playing());
        assert!(!scheduler.is_running());
        assert!(frames.is_idle());
    }

    #[test]
    fn test_speed_scales_step_duration() {
        let mut state = playing(10);
        state.apply(Action::SetPlaybackSpeed(2.0));
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);

        let mut t = 0.0;
        while t <= 1000.0 {
            pump(&mut scheduler, &mut state, &mut frames, t);
            t += 10.0;
        }
        assert_eq!(state.current_step(), 2);
    }

    #[test]
    fn test_resync_never_duplicates_the_loop() {
        let state = playing(10);
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        for _ in 0..5 {
            scheduler.sync(&state, &mut frames);
        }
        assert_eq!(frames.pending(LoopKind::Scheduler), 1);

        let mut rebuilt = PlaybackState::default();
        rebuilt.apply(Action::SetAlgorithm(AlgorithmKind::Matrix));
        rebuilt.apply(Action::Initialize {
            timeline: vec![Step::new("a"), Step::new("b")],
            values: vec![],
            statuses: vec![],
        });
        rebuilt.apply(Action::PlayPause);
        scheduler.sync(&rebuilt, &mut frames);
        assert_eq!(frames.pending(LoopKind::Scheduler), 1);
    }

    #[test]
    fn test_stale_callback_is_ignored() {
        let state = playing(10);
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);
        let stale = scheduler.handle().unwrap();
        scheduler.stop(&mut frames);
        scheduler.sync(&state, &mut frames);

        assert!(scheduler.on_frame(stale, 5000.0, &state, &mut frames).is_empty());
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_started_on_last_step_stops_immediately() {
        let mut state = playing(3);
        state.apply(Action::SetCurrentStep(2));
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);

        pump(&mut scheduler, &mut state, &mut frames, 0.0);
        assert!(!state.is_playing());
        assert_eq!(state.current_step(), 2);
        assert!(frames.is_idle());
    }

    #[test]
    fn test_pause_cancels_pending_frame() {
        let mut state = playing(5);
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);

        state.apply(Action::PlayPause);
        scheduler.sync(&state, &mut frames);
        assert!(frames.is_idle());
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_long_stall_rebases_to_now() {
        let mut state = playing(10);
        let mut frames = FrameQueue::new();
        let mut scheduler = Scheduler::new(1000.0);
        scheduler.sync(&state, &mut frames);

        pump(&mut scheduler, &mut state, &mut frames, 0.0);
        // One frame after a five second stall commits a single step.
        pump(&mut scheduler, &mut state, &mut frames, 5000.0);
        assert_eq!(state.current_step(), 1);
        pump(&mut scheduler, &mut state, &mut frames, 5500.0);
        assert_eq!(state.current_step(), 1);
        pump(&mut scheduler, &mut state, &mut frames, 6000.0);
        assert_eq!(state.current_step(), 2);
    }
}

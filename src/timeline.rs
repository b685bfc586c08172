//! Tick-driven timelines used by the recoil animator.
//!
//! Both types advance only when ticked by their owner, so they run on the
//! same schedule as the rest of the frame and never block.

use bevy::prelude::*;

use crate::types::ProcessState;

/// Result of advancing a playing [`AnimationProcess`] by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessTick {
    /// Progress after this tick, in `[0, 1]`
    pub progress: f32,
    /// The process reached the end on this tick
    pub finished: bool,
}

/// One normalized timeline running from progress 0 to 1.
///
/// Progress grows by `dt * play_rate` per tick and never decreases while
/// playing. Reaching 1 returns the process to [`ProcessState::Idle`] and
/// reports `finished` exactly once; [`stop`](Self::stop) abandons the run
/// without reporting anything.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::timeline::AnimationProcess;
///
/// let mut process = AnimationProcess::default();
/// process.play_from_start(2.0, Vec2::new(1.0, -2.0));
///
/// assert!(!process.tick(0.25).unwrap().finished);
/// assert!(process.tick(0.25).unwrap().finished);
/// assert!(process.tick(0.25).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationProcess {
    state: ProcessState,
    progress: f32,
    play_rate: f32,
    target: Vec2,
}

impl AnimationProcess {
    /// Restart from progress 0 toward `target`.
    ///
    /// # Arguments
    /// * `play_rate` - Progress per second; non-positive rates finish on the next tick
    /// * `target` - End value fixed for this run (x = yaw, y = pitch)
    pub fn play_from_start(&mut self, play_rate: f32, target: Vec2) {
        self.state = ProcessState::Playing;
        self.progress = 0.0;
        self.play_rate = play_rate;
        self.target = target;
    }

    /// Stop without completing.
    pub fn stop(&mut self) {
        self.state = ProcessState::Idle;
    }

    /// Advance by `dt` seconds.
    ///
    /// # Returns
    /// `None` while idle, otherwise the new progress and whether this tick finished the run
    pub fn tick(&mut self, dt: f32) -> Option<ProcessTick> {
        if self.state != ProcessState::Playing {
            return None;
        }

        self.progress = if self.play_rate > 0.0 {
            (self.progress + dt.max(0.0) * self.play_rate).min(1.0)
        } else {
            1.0
        };

        let finished = self.progress >= 1.0;
        if finished {
            self.state = ProcessState::Idle;
        }

        Some(ProcessTick {
            progress: self.progress,
            finished,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.state == ProcessState::Playing
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }
}

/// Single-shot countdown where every arming replaces the pending one.
///
/// At most one countdown is pending at a time; [`tick`](Self::tick) reports
/// expiry once and disarms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetriggerableDelay {
    remaining: Option<f32>,
}

impl RetriggerableDelay {
    /// Start (or restart) the countdown.
    ///
    /// Negative delays are treated as zero and expire on the next tick.
    pub fn arm(&mut self, delay: f32) {
        self.remaining = Some(delay.max(0.0));
    }

    /// Drop the pending countdown, if any.
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left before expiry, if armed.
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Count down by `dt` seconds.
    ///
    /// # Returns
    /// `true` on the tick the countdown expires
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= dt.max(0.0);
        if *remaining <= 0.0 {
            self.remaining = None;
            return true;
        }
        false
    }
}

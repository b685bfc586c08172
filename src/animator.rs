//! Recoil animator - applies sampled kicks over time and animates them back.
//!
//! The animator runs two timelines. The apply timeline eases the view from
//! zero to a freshly sampled impulse; once it finishes a retriggerable delay
//! starts the reset timeline, which eases the accumulated offset back to zero.
//! Every tick emits only the change since the previous tick, and the
//! accumulated offset tracks exactly what has been emitted, so an interrupted
//! animation can always be undone.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{CurveSettings, RecoilParameters};
use crate::systems::easing::{ease, interp_to};
use crate::systems::sampler::{recoil_scale, sample_strength};
use crate::timeline::{AnimationProcess, RetriggerableDelay};
use crate::types::{CharacterState, OrientationSink};

/// Smoothing speed used to bleed accumulated yaw off while the player turns.
///
/// Independent of the reset timeline speed.
pub const EXTERNAL_YAW_BLEED_RATE: f32 = 10.0;

/// Fraction of the reset baseline pitch that external downward input must
/// cover before the reset restarts from the current offset.
pub const RESET_ABSORB_THRESHOLD: f32 = 1.1;

/// Per-weapon recoil state machine.
///
/// Attach to the entity that fires; feed it with
/// [`RecoilTriggerEvent`](crate::events::RecoilTriggerEvent) and
/// [`LookInputEvent`](crate::events::LookInputEvent) through the plugin
/// systems, or drive it directly from your own code.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::prelude::*;
///
/// let params = RecoilParameters::default().without_reset();
/// let mut animator = RecoilAnimator::with_seed(42);
/// let mut view = RecoilOrientation::new();
///
/// animator.trigger(Some(&params), &RecoilCharacterState::default());
/// for _ in 0..30 {
///     animator.advance(1.0 / 60.0, &mut view);
/// }
///
/// // The kick has fully played out and is now tracked as applied offset.
/// assert!(view.total.y < -0.99);
/// assert_eq!(animator.accumulated_offset(), view.total);
/// ```
#[derive(Component, Clone, Debug)]
pub struct RecoilAnimator {
    apply: AnimationProcess,
    reset: AnimationProcess,
    reset_delay: RetriggerableDelay,
    params: Option<RecoilParameters>,
    accumulated_offset: Vec2,
    last_eased_apply: Vec2,
    last_eased_reset: Vec2,
    reset_baseline: Vec2,
    reset_pitch_absorbed: f32,
    last_frame_delta: f32,
    rng: StdRng,
}

impl Default for RecoilAnimator {
    fn default() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }
}

impl RecoilAnimator {
    /// Creates an animator seeded from the operating system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an animator whose impulses are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            apply: AnimationProcess::default(),
            reset: AnimationProcess::default(),
            reset_delay: RetriggerableDelay::default(),
            params: None,
            accumulated_offset: Vec2::ZERO,
            last_eased_apply: Vec2::ZERO,
            last_eased_reset: Vec2::ZERO,
            reset_baseline: Vec2::ZERO,
            reset_pitch_absorbed: 0.0,
            last_frame_delta: 0.0,
            rng,
        }
    }

    /// Fire one recoil impulse.
    ///
    /// Samples a new target, abandons whatever was animating and starts the
    /// apply timeline from zero. Offset that has not been reset yet stays in
    /// place, so rapid fire stacks.
    ///
    /// # Arguments
    /// * `params` - Recoil configuration; `None` means the weapon has no recoil
    /// * `state` - Character state used for the scale multipliers
    ///
    /// # Returns
    /// `true` if an impulse was started
    pub fn trigger<C: CharacterState + ?Sized>(
        &mut self,
        params: Option<&RecoilParameters>,
        state: &C,
    ) -> bool {
        let Some(params) = params else {
            return false;
        };

        let scale = recoil_scale(params, state);
        let target = sample_strength(params, scale, &mut self.rng);

        self.apply.stop();
        self.reset.stop();

        self.last_eased_apply = Vec2::ZERO;
        self.last_eased_reset = Vec2::ZERO;
        self.reset_pitch_absorbed = 0.0;

        self.apply.play_from_start(params.apply.play_rate, target);
        self.params = Some(params.clone());

        debug!(
            "Recoil kick: yaw {:.3}, pitch {:.3} (scale {:.2}, carried offset {:?})",
            target.x, target.y, scale, self.accumulated_offset
        );
        true
    }

    /// Advance both timelines by one frame.
    ///
    /// Order within a frame: the reset delay counts down (and may start the
    /// reset), then the apply timeline, then the reset timeline. While the
    /// sink is unavailable nothing advances, so no rotation is lost.
    ///
    /// # Arguments
    /// * `dt` - Frame time in seconds; negative values count as zero
    /// * `sink` - Receiver of the incremental rotation
    pub fn advance<S: OrientationSink + ?Sized>(&mut self, dt: f32, sink: &mut S) {
        let dt = dt.max(0.0);
        self.last_frame_delta = dt;

        if !sink.is_available() {
            return;
        }
        let Some(params) = self.params.as_ref() else {
            return;
        };
        let (apply_curve, reset_curve, reset_delay) =
            (params.apply, params.reset.curve, params.reset.delay);

        if self.reset_delay.tick(dt) {
            self.start_reset();
        }

        if let Some(step) = self.apply.tick(dt) {
            let eased = eased_offset(self.apply.target(), step.progress, &apply_curve);
            let delta = eased - self.last_eased_apply;

            sink.apply_orientation_delta(delta.x, delta.y);
            self.accumulated_offset += delta;
            self.last_eased_apply = eased;

            if step.finished {
                self.reset_delay.arm(reset_delay);
            }
        }

        if let Some(step) = self.reset.tick(dt) {
            let eased = eased_offset(self.reset_baseline, step.progress, &reset_curve);
            let delta = eased - self.last_eased_reset;

            sink.apply_orientation_delta(-delta.x, -delta.y);
            self.accumulated_offset -= delta;
            self.last_eased_reset = eased;
        }
    }

    /// Start animating the accumulated offset back to zero.
    ///
    /// Called when the post-apply delay expires. Does nothing if the reset is
    /// disabled or a new kick is still being applied.
    pub fn start_reset(&mut self) {
        let Some(params) = self.params.as_ref() else {
            return;
        };
        if !params.reset.enabled || self.apply.is_playing() {
            return;
        }

        self.reset.stop();

        self.last_eased_apply = Vec2::ZERO;
        self.last_eased_reset = Vec2::ZERO;
        self.reset_baseline = self.accumulated_offset;

        self.reset
            .play_from_start(params.reset.curve.play_rate, self.reset_baseline);

        debug!("Recoil reset from {:?}", self.reset_baseline);
    }

    /// Report yaw the player added on their own.
    ///
    /// Any non-zero turn pulls the accumulated yaw toward zero, so the reset
    /// does not swing the view back across a deliberate turn.
    pub fn notify_external_yaw(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        self.accumulated_offset.x = interp_to(
            self.accumulated_offset.x,
            0.0,
            self.last_frame_delta,
            EXTERNAL_YAW_BLEED_RATE,
        );
    }

    /// Report pitch the player added on their own.
    ///
    /// Pulling down (positive pitch) counteracts recoil and shrinks the
    /// accumulated offset, never past zero. Looking up while a reset plays
    /// counts against the reset; once it exceeds the baseline pitch by the
    /// absorb threshold, the reset restarts from the current offset.
    pub fn notify_external_pitch(&mut self, delta: f32) {
        if delta > 0.0 {
            self.accumulated_offset.y = (self.accumulated_offset.y + delta).min(0.0);
        }

        if delta < 0.0 && self.reset.is_playing() {
            self.reset_pitch_absorbed += delta.abs();
            if self.reset_pitch_absorbed >= self.reset_baseline.y.abs() * RESET_ABSORB_THRESHOLD {
                self.start_reset();
                self.reset_pitch_absorbed = 0.0;
            }
        }
    }

    /// Stop everything and forget the applied offset without animating.
    ///
    /// Used on weapon switches; the view keeps its current rotation.
    pub fn reset_state(&mut self) {
        self.apply.stop();
        self.reset.stop();
        self.reset_delay.cancel();

        self.accumulated_offset = Vec2::ZERO;
        self.reset_baseline = Vec2::ZERO;
        self.reset_pitch_absorbed = 0.0;
    }

    /// Offset currently applied to the view and not yet reset (x = yaw, y = pitch).
    pub fn accumulated_offset(&self) -> Vec2 {
        self.accumulated_offset
    }

    /// Offset the running (or last) reset is removing.
    pub fn reset_baseline(&self) -> Vec2 {
        self.reset_baseline
    }

    /// Downward pitch absorbed against the running reset.
    pub fn reset_pitch_absorbed(&self) -> f32 {
        self.reset_pitch_absorbed
    }

    /// Target of the current (or last) kick.
    pub fn apply_target(&self) -> Vec2 {
        self.apply.target()
    }

    pub fn apply_progress(&self) -> f32 {
        self.apply.progress()
    }

    pub fn reset_progress(&self) -> f32 {
        self.reset.progress()
    }

    pub fn is_applying(&self) -> bool {
        self.apply.is_playing()
    }

    pub fn is_resetting(&self) -> bool {
        self.reset.is_playing()
    }

    /// Whether a reset start is scheduled.
    pub fn has_pending_reset(&self) -> bool {
        self.reset_delay.is_pending()
    }

    /// Nothing is animating or scheduled.
    pub fn is_idle(&self) -> bool {
        !self.is_applying() && !self.is_resetting() && !self.has_pending_reset()
    }

    /// Parameters of the last trigger.
    pub fn parameters(&self) -> Option<&RecoilParameters> {
        self.params.as_ref()
    }
}

fn eased_offset(target: Vec2, progress: f32, curve: &CurveSettings) -> Vec2 {
    Vec2::new(
        ease(0.0, target.x, progress, curve.easing, curve.exponent, curve.steps),
        ease(0.0, target.y, progress, curve.easing, curve.exponent, curve.steps),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{RecoilCharacterState, RecoilOrientation, ResetSettings, StrengthRange};
    use crate::types::EasingFunction;

    const DT: f32 = 1.0 / 60.0;
    const EPS: f32 = 1.0e-4;

    #[derive(Default)]
    struct DeltaLog {
        deltas: Vec<Vec2>,
    }

    impl DeltaLog {
        fn sum(&self) -> Vec2 {
            self.deltas.iter().copied().sum()
        }
    }

    impl OrientationSink for DeltaLog {
        fn apply_orientation_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
            self.deltas.push(Vec2::new(delta_yaw, delta_pitch));
        }
    }

    fn idle_state() -> RecoilCharacterState {
        RecoilCharacterState::default()
    }

    fn fixed_kick(yaw: f32, vertical: f32) -> RecoilParameters {
        RecoilParameters::default()
            .with_vertical(StrengthRange::new(vertical, vertical))
            .with_horizontal(StrengthRange::new(yaw, yaw))
    }

    fn run(animator: &mut RecoilAnimator, sink: &mut DeltaLog, frames: usize) {
        for _ in 0..frames {
            animator.advance(DT, sink);
        }
    }

    #[test]
    fn test_missing_parameters_is_noop() {
        let mut animator = RecoilAnimator::with_seed(1);
        let mut sink = DeltaLog::default();

        assert!(!animator.trigger(None, &idle_state()));
        run(&mut animator, &mut sink, 10);

        assert!(sink.deltas.is_empty());
        assert!(animator.is_idle());
    }

    #[test]
    fn test_apply_episode_stays_in_range() {
        let params = RecoilParameters::default();

        for seed in 0..20 {
            let mut animator = RecoilAnimator::with_seed(seed);
            let mut sink = DeltaLog::default();
            animator.trigger(Some(&params), &idle_state());

            let mut frames = 0;
            while animator.is_applying() {
                animator.advance(DT, &mut sink);
                frames += 1;
                assert!(frames < 1000, "apply never finished");
            }

            assert_eq!(sink.deltas.len(), frames);
            assert!((20..=21).contains(&frames), "apply took {} frames", frames);
            let total = sink.sum();
            assert!(total.x >= -0.5 - EPS && total.x <= 0.5 + EPS, "yaw {}", total.x);
            assert!(total.y >= -2.0 - EPS && total.y <= -1.0 + EPS, "pitch {}", total.y);
            assert!(!animator.is_resetting());
            assert!(animator.has_pending_reset());
        }
    }

    #[test]
    fn test_full_cycle_self_cancels() {
        let params = RecoilParameters::default()
            .with_apply(CurveSettings::linear(5.0).with_easing(EasingFunction::EaseOut, 3.0))
            .with_reset(ResetSettings {
                enabled: true,
                delay: 0.1,
                curve: CurveSettings::linear(2.0).with_easing(EasingFunction::SinusoidalInOut, 2.0),
            });
        let mut animator = RecoilAnimator::with_seed(7);
        let mut sink = DeltaLog::default();

        animator.trigger(Some(&params), &idle_state());
        run(&mut animator, &mut sink, 120);

        assert!(animator.is_idle());
        assert!(sink.sum().length() < EPS, "residual {:?}", sink.sum());
        assert!(animator.accumulated_offset().length() < EPS);
    }

    #[test]
    fn test_accumulated_matches_emitted() {
        let params = RecoilParameters::default();
        let mut animator = RecoilAnimator::with_seed(3);
        let mut sink = DeltaLog::default();

        animator.trigger(Some(&params), &idle_state());
        for _ in 0..200 {
            animator.advance(DT, &mut sink);
            assert!((animator.accumulated_offset() - sink.sum()).length() < EPS);
        }
    }

    #[test]
    fn test_retrigger_mid_apply_does_not_replay() {
        let params = fixed_kick(0.5, 2.0)
            .with_apply(CurveSettings::linear(2.0))
            .without_reset();
        let mut animator = RecoilAnimator::with_seed(4);
        let mut sink = DeltaLog::default();

        animator.trigger(Some(&params), &idle_state());
        run(&mut animator, &mut sink, 15);
        let before = sink.sum();
        assert!(animator.is_applying());

        animator.trigger(Some(&params), &idle_state());
        animator.advance(DT, &mut sink);

        let delta = *sink.deltas.last().unwrap();
        assert!(delta.length() <= animator.apply_target().length() + EPS);
        assert!(delta.length() < 0.1, "first delta after retrigger {:?}", delta);

        // Partial progress stays applied and the new kick stacks on top.
        run(&mut animator, &mut sink, 60);
        let stacked = sink.sum();
        assert!((stacked.y - (before.y - 2.0)).abs() < EPS, "{:?} vs {:?}", stacked, before);
    }

    #[test]
    fn test_progress_monotonic_within_episode() {
        let mut animator = RecoilAnimator::with_seed(5);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&RecoilParameters::default()), &idle_state());

        let mut last = 0.0;
        while animator.is_applying() {
            animator.advance(0.007, &mut sink);
            let progress = animator.apply_progress();
            assert!(progress >= last && progress <= 1.0);
            last = progress;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_zero_nudges_are_noops() {
        let mut animator = RecoilAnimator::with_seed(6);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&fixed_kick(1.0, 1.0)), &idle_state());
        run(&mut animator, &mut sink, 10);

        let offset = animator.accumulated_offset();
        let emitted = sink.deltas.len();
        animator.notify_external_yaw(0.0);
        animator.notify_external_pitch(0.0);

        assert_eq!(animator.accumulated_offset(), offset);
        assert_eq!(animator.reset_pitch_absorbed(), 0.0);
        assert_eq!(sink.deltas.len(), emitted);
    }

    fn animator_resetting_from(pitch: f32) -> (RecoilAnimator, DeltaLog) {
        let params = fixed_kick(0.0, -pitch)
            .with_apply(CurveSettings::linear(120.0))
            .with_reset(ResetSettings {
                enabled: true,
                delay: 0.0,
                curve: CurveSettings::linear(0.1),
            });
        let mut animator = RecoilAnimator::with_seed(8);
        let mut sink = DeltaLog::default();

        animator.trigger(Some(&params), &idle_state());
        // Frame 1 finishes the kick, frame 2 starts the reset.
        run(&mut animator, &mut sink, 2);
        assert!(animator.is_resetting());
        (animator, sink)
    }

    #[test]
    fn test_early_reset_retrigger() {
        let (mut animator, mut sink) = animator_resetting_from(-10.0);
        assert!((animator.reset_baseline().y + 10.0).abs() < EPS);
        run(&mut animator, &mut sink, 3);
        assert!(animator.reset_progress() > 0.0);

        animator.notify_external_pitch(-6.0);
        assert_eq!(animator.reset_pitch_absorbed(), 6.0);
        assert!(animator.reset_progress() > 0.0);

        animator.notify_external_pitch(-6.0);
        assert_eq!(animator.reset_pitch_absorbed(), 0.0);
        assert_eq!(animator.reset_progress(), 0.0);
        assert!(animator.is_resetting());
        assert_eq!(animator.reset_baseline(), animator.accumulated_offset());
    }

    #[test]
    fn test_downward_nudge_below_threshold_keeps_reset() {
        let (mut animator, _) = animator_resetting_from(-10.0);
        animator.notify_external_pitch(-5.0);
        animator.notify_external_pitch(-5.0);
        assert_eq!(animator.reset_pitch_absorbed(), 10.0);
    }

    #[test]
    fn test_positive_pitch_clamped_at_zero() {
        let mut animator = RecoilAnimator::with_seed(9);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&fixed_kick(0.0, 2.0).without_reset()), &idle_state());
        run(&mut animator, &mut sink, 30);
        assert!((animator.accumulated_offset().y + 2.0).abs() < EPS);

        animator.notify_external_pitch(0.5);
        assert!((animator.accumulated_offset().y + 1.5).abs() < EPS);

        animator.notify_external_pitch(5.0);
        assert_eq!(animator.accumulated_offset().y, 0.0);
    }

    #[test]
    fn test_external_yaw_bleeds_offset() {
        let mut animator = RecoilAnimator::with_seed(10);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&fixed_kick(1.0, 1.0).without_reset()), &idle_state());
        run(&mut animator, &mut sink, 30);

        let before = animator.accumulated_offset();
        animator.notify_external_yaw(0.3);
        let after = animator.accumulated_offset();

        // 1/60 s at rate 10 removes a sixth of the yaw.
        assert!((after.x - before.x * (1.0 - DT * EXTERNAL_YAW_BLEED_RATE)).abs() < EPS);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn test_disabled_reset_keeps_offset() {
        let mut animator = RecoilAnimator::with_seed(11);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&fixed_kick(0.0, 1.0).without_reset()), &idle_state());
        run(&mut animator, &mut sink, 300);

        assert!(!animator.is_resetting());
        assert!((animator.accumulated_offset().y + 1.0).abs() < EPS);
    }

    #[test]
    fn test_reset_waits_for_delay() {
        let params = fixed_kick(0.0, 1.0)
            .with_apply(CurveSettings::linear(120.0))
            .with_reset(ResetSettings {
                enabled: true,
                delay: 0.25,
                curve: CurveSettings::linear(1.0),
            });
        let mut animator = RecoilAnimator::with_seed(12);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&params), &idle_state());

        animator.advance(DT, &mut sink);
        assert!(animator.has_pending_reset());
        run(&mut animator, &mut sink, 10);
        assert!(!animator.is_resetting());
        run(&mut animator, &mut sink, 10);
        assert!(animator.is_resetting());
    }

    #[test]
    fn test_retrigger_during_delay_rearms_reset() {
        let first = fixed_kick(0.0, 1.0)
            .with_apply(CurveSettings::linear(120.0))
            .with_reset(ResetSettings {
                enabled: true,
                delay: 0.25,
                curve: CurveSettings::linear(1.0),
            });
        let second = first.clone().with_apply(CurveSettings::linear(2.0));
        let mut animator = RecoilAnimator::with_seed(16);
        let mut sink = DeltaLog::default();

        animator.trigger(Some(&first), &idle_state());
        animator.advance(DT, &mut sink);
        run(&mut animator, &mut sink, 10);
        assert!(animator.has_pending_reset());

        // The first delay runs out while the second kick is still applying.
        animator.trigger(Some(&second), &idle_state());
        run(&mut animator, &mut sink, 10);
        assert!(animator.is_applying());
        assert!(!animator.has_pending_reset());
        assert!(!animator.is_resetting());

        while animator.is_applying() {
            animator.advance(DT, &mut sink);
            assert!(!animator.is_resetting());
        }
        assert!(animator.has_pending_reset());

        let mut waited = 0;
        while !animator.is_resetting() {
            animator.advance(DT, &mut sink);
            waited += 1;
            assert!(waited <= 20, "reset never started");
        }
        // 0.25 s at 60 fps
        assert!((15..=16).contains(&waited), "reset started after {} frames", waited);
        assert!((animator.reset_baseline().y + 2.0).abs() < 0.05);

        let mut starts = 1;
        let mut was_resetting = true;
        let mut last_progress = animator.reset_progress();
        for _ in 0..120 {
            animator.advance(DT, &mut sink);
            if animator.is_resetting() {
                if !was_resetting || animator.reset_progress() < last_progress {
                    starts += 1;
                }
                last_progress = animator.reset_progress();
            }
            was_resetting = animator.is_resetting();
        }
        assert_eq!(starts, 1);
        assert!(animator.is_idle());
        assert!(sink.sum().length() < EPS);
    }

    #[test]
    fn test_trigger_during_reset_stacks_remaining_offset() {
        let (mut animator, mut sink) = animator_resetting_from(-4.0);
        run(&mut animator, &mut sink, 30);
        let remaining = animator.accumulated_offset();
        assert!(remaining.y < 0.0 && remaining.y > -4.0);

        let params = animator.parameters().cloned();
        animator.trigger(params.as_ref(), &idle_state());
        assert!(!animator.is_resetting());

        animator.advance(DT, &mut sink);
        assert!((animator.accumulated_offset().y - (remaining.y - 4.0)).abs() < EPS);
    }

    #[test]
    fn test_reset_state_is_immediate() {
        let mut animator = RecoilAnimator::with_seed(13);
        let mut sink = DeltaLog::default();
        animator.trigger(Some(&RecoilParameters::default()), &idle_state());
        run(&mut animator, &mut sink, 10);

        let emitted = sink.deltas.len();
        animator.reset_state();
        run(&mut animator, &mut sink, 120);

        assert!(animator.is_idle());
        assert_eq!(animator.accumulated_offset(), Vec2::ZERO);
        assert_eq!(animator.reset_baseline(), Vec2::ZERO);
        assert_eq!(sink.deltas.len(), emitted);
    }

    #[test]
    fn test_unavailable_sink_pauses() {
        let mut animator = RecoilAnimator::with_seed(14);
        animator.trigger(Some(&fixed_kick(0.0, 1.0).without_reset()), &idle_state());

        let mut absent: Option<RecoilOrientation> = None;
        for _ in 0..60 {
            animator.advance(DT, &mut absent);
        }
        assert!(animator.is_applying());
        assert_eq!(animator.apply_progress(), 0.0);

        let mut view = RecoilOrientation::new();
        for _ in 0..30 {
            animator.advance(DT, &mut view);
        }
        assert!((view.total.y + 1.0).abs() < EPS);
    }

    #[test]
    fn test_state_scales_impulse() {
        let params = fixed_kick(0.0, 2.0).without_reset();
        let crouched = RecoilCharacterState {
            crouching: true,
            ..Default::default()
        };
        let mut animator = RecoilAnimator::with_seed(15);
        let mut sink = DeltaLog::default();

        animator.trigger(Some(&params), &crouched);
        run(&mut animator, &mut sink, 30);

        assert!((sink.sum().y + 0.5).abs() < EPS);
    }
}

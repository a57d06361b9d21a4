//! Property tweens and the shared per-tick animation scheduler.
//!
//! One [`Animator`] serves every live chart. The host drives it with
//! explicit `tick(now)` calls carrying a monotonic millisecond clock; the
//! scheduler self-terminates by reporting `wants_tick() == false` once no
//! chart has running items. Within one tick every chart's pending tweens
//! advance before any chart is reported for redraw.

use crate::element::AnimProp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a chart registered with the animator.
pub type ChartId = u64;

/// Standard easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation (no easing)
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    #[default]
    EaseInOut,
    /// Cubic ease in
    CubicIn,
    /// Cubic ease out
    CubicOut,
    /// Cubic ease in and out
    CubicInOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Key of an animated property: which element of which dataset, and what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationKey {
    /// Dataset index within the chart
    pub dataset_index: usize,
    /// Element index within the dataset
    pub element_index: usize,
    /// The animated property
    pub prop: AnimProp,
}

impl AnimationKey {
    /// Create a key.
    #[must_use]
    pub const fn new(dataset_index: usize, element_index: usize, prop: AnimProp) -> Self {
        Self {
            dataset_index,
            element_index,
            prop,
        }
    }
}

/// A single in-flight property transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    /// The property this tween drives
    pub key: AnimationKey,
    /// Start value
    pub from: f64,
    /// End value
    pub to: f64,
    /// Start timestamp in milliseconds; set by [`Animator::start`]
    pub start: f64,
    /// Duration in milliseconds
    pub duration: f64,
    /// Easing function
    pub easing: Easing,
    /// Loop forever, reflecting at each end
    pub looping: bool,
    active: bool,
}

impl Tween {
    /// Create a tween for a property.
    #[must_use]
    pub fn new(key: AnimationKey, from: f64, to: f64, duration: f64, easing: Easing) -> Self {
        Self {
            key,
            from,
            to,
            start: 0.0,
            duration,
            easing,
            looping: false,
            active: true,
        }
    }

    /// Whether the tween is still in flight.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Advance to `now`, returning the property value to write.
    ///
    /// Deactivates once `now - start >= duration` (non-looping), in which
    /// case the returned value is exactly `to`.
    pub fn tick(&mut self, now: f64) -> f64 {
        let elapsed = now - self.start;
        if self.duration <= 0.0 {
            self.active = false;
            return self.to;
        }
        let factor = if self.looping {
            // Reflect across [0, 2): forward then backward, forever.
            let phase = (elapsed / self.duration).rem_euclid(2.0);
            if phase > 1.0 {
                2.0 - phase
            } else {
                phase
            }
        } else {
            let t = (elapsed / self.duration).clamp(0.0, 1.0);
            if elapsed >= self.duration {
                self.active = false;
                return self.to;
            }
            t
        };
        let eased = self.easing.apply(factor);
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Force-complete the tween, returning the final value.
    pub fn cancel(&mut self) -> f64 {
        self.active = false;
        self.to
    }
}

#[derive(Debug, Default)]
struct ChartSet {
    items: Vec<Tween>,
    running: bool,
    start: f64,
    duration: f64,
}

/// Result of one scheduler tick.
#[derive(Debug, Default, PartialEq)]
pub struct TickOutcome {
    /// Charts that had at least one property advance and need a redraw
    pub redraw: Vec<ChartId>,
    /// Charts whose animation set drained this tick
    pub completed: Vec<ChartId>,
}

/// The shared per-tick animation scheduler.
#[derive(Debug, Default)]
pub struct Animator {
    charts: HashMap<ChartId, ChartSet>,
}

impl Animator {
    /// Create an empty animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tweens to a chart's active set. No-op for an empty list.
    ///
    /// A new tween for a key that already has one in flight replaces it:
    /// the table keyed by `(dataset, element, property)` is the
    /// interruption bookkeeping.
    pub fn add(&mut self, chart: ChartId, tweens: Vec<Tween>) {
        if tweens.is_empty() {
            return;
        }
        let set = self.charts.entry(chart).or_default();
        for tween in tweens {
            set.items.retain(|existing| existing.key != tween.key);
            set.items.push(tween);
        }
    }

    /// Mark a chart's set running from `now`.
    pub fn start(&mut self, chart: ChartId, now: f64) {
        if let Some(set) = self.charts.get_mut(&chart) {
            if set.items.is_empty() {
                return;
            }
            set.running = true;
            set.start = now;
            set.duration = set
                .items
                .iter()
                .map(|item| item.duration)
                .fold(0.0, f64::max);
            for item in &mut set.items {
                item.start = now;
            }
        }
    }

    /// Whether any chart still has running items.
    ///
    /// When this turns false the scheduler has self-terminated; the host
    /// stops ticking until the next `start`.
    #[must_use]
    pub fn wants_tick(&self) -> bool {
        self.charts.values().any(|set| set.running)
    }

    /// Whether a given chart has a running set.
    #[must_use]
    pub fn running(&self, chart: ChartId) -> bool {
        self.charts.get(&chart).is_some_and(|set| set.running)
    }

    /// Progress of a chart's running set in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, chart: ChartId, now: f64) -> f64 {
        self.charts.get(&chart).map_or(1.0, |set| {
            if !set.running || set.duration <= 0.0 {
                1.0
            } else {
                ((now - set.start) / set.duration).clamp(0.0, 1.0)
            }
        })
    }

    /// Advance every running chart's tweens to `now`.
    ///
    /// `apply` receives each property write. Finished items are
    /// swap-removed (order not preserved; tweens are independent). Each
    /// item advances at most once per tick.
    pub fn tick(
        &mut self,
        now: f64,
        apply: &mut dyn FnMut(ChartId, AnimationKey, f64),
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let mut ids: Vec<ChartId> = self
            .charts
            .iter()
            .filter(|(_, set)| set.running)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();

        for id in ids {
            let Some(set) = self.charts.get_mut(&id) else {
                continue;
            };
            let mut drew = false;
            let mut i = set.items.len();
            while i > 0 {
                i -= 1;
                let value = set.items[i].tick(now);
                apply(id, set.items[i].key, value);
                drew = true;
                if !set.items[i].active() {
                    set.items.swap_remove(i);
                }
            }
            if drew {
                outcome.redraw.push(id);
            }
            if set.items.is_empty() {
                set.running = false;
                outcome.completed.push(id);
            }
        }
        outcome
    }

    /// Force-cancel every in-flight tween for a chart, snapping each
    /// property to its final value, and report completion synchronously.
    pub fn stop(&mut self, chart: ChartId, apply: &mut dyn FnMut(ChartId, AnimationKey, f64)) {
        if let Some(set) = self.charts.get_mut(&chart) {
            for item in &mut set.items {
                let value = item.cancel();
                apply(chart, item.key, value);
            }
            set.items.clear();
            set.running = false;
        }
    }

    /// Drop a chart's animation set entirely (chart destroyed).
    pub fn remove(&mut self, chart: ChartId) {
        self.charts.remove(&chart);
    }

    /// Number of in-flight tweens for a chart.
    #[must_use]
    pub fn item_count(&self, chart: ChartId) -> usize {
        self.charts.get(&chart).map_or(0, |set| set.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(prop: AnimProp) -> AnimationKey {
        AnimationKey::new(0, 0, prop)
    }

    // -------------------------------------------------------------------------
    // Easing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
        ] {
            assert!((easing.apply(0.0)).abs() < 1e-9);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    // -------------------------------------------------------------------------
    // Tween tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tween_terminal_convergence() {
        let mut tween = Tween::new(key(AnimProp::Y), 0.0, 100.0, 500.0, Easing::EaseInOut);
        tween.start = 1000.0;
        assert_eq!(tween.tick(1500.0), 100.0);
        assert!(!tween.active());
    }

    #[test]
    fn test_tween_midpoint_linear() {
        let mut tween = Tween::new(key(AnimProp::Y), 0.0, 100.0, 500.0, Easing::Linear);
        tween.start = 0.0;
        assert!((tween.tick(250.0) - 50.0).abs() < 1e-9);
        assert!(tween.active());
    }

    #[test]
    fn test_tween_cancel_snaps_to_final() {
        let mut tween = Tween::new(key(AnimProp::Y), 0.0, 100.0, 500.0, Easing::Linear);
        tween.start = 0.0;
        let _ = tween.tick(100.0);
        assert_eq!(tween.cancel(), 100.0);
        assert!(!tween.active());
    }

    #[test]
    fn test_tween_zero_duration_completes_immediately() {
        let mut tween = Tween::new(key(AnimProp::Y), 0.0, 100.0, 0.0, Easing::Linear);
        assert_eq!(tween.tick(0.0), 100.0);
        assert!(!tween.active());
    }

    #[test]
    fn test_tween_loop_reflects() {
        let mut tween = Tween::new(key(AnimProp::Y), 0.0, 100.0, 100.0, Easing::Linear);
        tween.looping = true;
        tween.start = 0.0;
        assert!((tween.tick(50.0) - 50.0).abs() < 1e-9);
        // Phase 1.5 reflects back to 0.5
        assert!((tween.tick(150.0) - 50.0).abs() < 1e-9);
        assert!(tween.active());
    }

    // -------------------------------------------------------------------------
    // Animator tests
    // -------------------------------------------------------------------------

    fn tween_to(prop: AnimProp, to: f64, duration: f64) -> Tween {
        Tween::new(key(prop), 0.0, to, duration, Easing::Linear)
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut animator = Animator::new();
        animator.add(1, Vec::new());
        assert!(!animator.wants_tick());
        assert_eq!(animator.item_count(1), 0);
    }

    #[test]
    fn test_start_records_max_duration() {
        let mut animator = Animator::new();
        animator.add(
            1,
            vec![tween_to(AnimProp::X, 1.0, 200.0), tween_to(AnimProp::Y, 1.0, 700.0)],
        );
        animator.start(1, 0.0);
        assert!(animator.running(1));
        assert!((animator.progress(1, 350.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tick_applies_and_drains() {
        let mut animator = Animator::new();
        animator.add(1, vec![tween_to(AnimProp::Y, 100.0, 100.0)]);
        animator.start(1, 0.0);

        let mut writes = Vec::new();
        let outcome = animator.tick(50.0, &mut |chart, k, v| writes.push((chart, k, v)));
        assert_eq!(outcome.redraw, vec![1]);
        assert!(outcome.completed.is_empty());
        assert_eq!(writes.len(), 1);
        assert!((writes[0].2 - 50.0).abs() < 1e-9);

        let outcome = animator.tick(100.0, &mut |_, _, v| writes.push((1, key(AnimProp::Y), v)));
        assert_eq!(outcome.completed, vec![1]);
        assert!(!animator.wants_tick());
        assert_eq!(writes.last().map(|w| w.2), Some(100.0));
    }

    #[test]
    fn test_new_tween_replaces_same_key() {
        let mut animator = Animator::new();
        animator.add(1, vec![tween_to(AnimProp::Y, 100.0, 100.0)]);
        animator.add(1, vec![tween_to(AnimProp::Y, 50.0, 100.0)]);
        assert_eq!(animator.item_count(1), 1);
    }

    #[test]
    fn test_stop_snaps_synchronously() {
        let mut animator = Animator::new();
        animator.add(1, vec![tween_to(AnimProp::Y, 100.0, 1000.0)]);
        animator.start(1, 0.0);

        let mut writes = Vec::new();
        animator.stop(1, &mut |_, k, v| writes.push((k, v)));
        assert_eq!(writes, vec![(key(AnimProp::Y), 100.0)]);
        assert!(!animator.running(1));
        assert!(!animator.wants_tick());
    }

    #[test]
    fn test_all_charts_advance_before_any_redraw_reported() {
        let mut animator = Animator::new();
        animator.add(1, vec![tween_to(AnimProp::Y, 100.0, 100.0)]);
        animator.add(2, vec![tween_to(AnimProp::Y, 100.0, 100.0)]);
        animator.start(1, 0.0);
        animator.start(2, 0.0);
        let outcome = animator.tick(10.0, &mut |_, _, _| {});
        assert_eq!(outcome.redraw, vec![1, 2]);
    }
}

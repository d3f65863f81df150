//! Forward-looking orbit trail
//!
//! Samples the orbit from "now" to `now + window` at a fixed step into a
//! fixed-capacity arena. Only the prefix `[0, written)` is meaningful.

use bevy::log::{debug, info};
use bevy::math::Vec3;
use bevy::math::bounding::BoundingSphere;
use chrono::{DateTime, Duration, Utc};

use crate::config::TrackerConfig;
use crate::core::space::SceneMapper;
use crate::orbital::OrbitPropagator;

/// Upper bound on trail samples regardless of window and step
pub const MAX_TRAIL_SAMPLES: usize = 100_000;

/// Window and spacing of the trail samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailConfig {
    pub window_minutes: f64,
    pub step_seconds: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            window_minutes: 90.0,
            step_seconds: 15.0,
        }
    }
}

impl From<&TrackerConfig> for TrailConfig {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            window_minutes: config.orbit_window_minutes,
            step_seconds: config.orbit_sample_seconds,
        }
    }
}

impl TrailConfig {
    /// `ceil(window / step) + 1`, so both ends of the window are sampled,
    /// capped at [`MAX_TRAIL_SAMPLES`]
    pub fn sample_count(&self) -> usize {
        let window_s = self.window_minutes * 60.0;
        if !(window_s.is_finite() && self.step_seconds.is_finite() && self.step_seconds > 0.0) {
            return 1;
        }
        let intervals = (window_s / self.step_seconds).ceil().max(0.0) as usize;
        intervals.saturating_add(1).min(MAX_TRAIL_SAMPLES)
    }

    /// Offset of sample `i` from the start of the window
    pub fn offset(&self, i: usize) -> Duration {
        Duration::milliseconds((i as f64 * self.step_seconds * 1000.0).round() as i64)
    }
}

/// Arena of scene positions with a valid-length cursor
#[derive(Debug, Clone, Default)]
pub struct TrailBuffer {
    slots: Box<[Vec3]>,
    written: usize,
    bounds: Option<BoundingSphere>,
}

impl TrailBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Vec3::ZERO; capacity].into_boxed_slice(),
            written: 0,
            bounds: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// The drawable prefix
    pub fn visible(&self) -> &[Vec3] {
        &self.slots[..self.written]
    }

    pub fn bounds(&self) -> Option<BoundingSphere> {
        self.bounds
    }

    /// Swap in a larger arena. Never shrinks; old contents are discarded.
    fn ensure_capacity(&mut self, needed: usize) {
        if self.slots.len() < needed {
            debug!(
                "[TRAIL] growing arena {} -> {} slots",
                self.slots.len(),
                needed
            );
            self.slots = vec![Vec3::ZERO; needed].into_boxed_slice();
            self.written = 0;
            self.bounds = None;
        }
    }

    fn clear(&mut self) {
        self.written = 0;
        self.bounds = None;
    }

    fn push(&mut self, p: Vec3) {
        self.slots[self.written] = p;
        self.written += 1;
    }

    fn last_written(&self) -> Option<Vec3> {
        self.written.checked_sub(1).map(|i| self.slots[i])
    }

    fn recompute_bounds(&mut self) {
        self.bounds = bounding_sphere(self.visible());
    }
}

/// Sphere centered on the box around `points` and reaching the farthest one
fn bounding_sphere(points: &[Vec3]) -> Option<BoundingSphere> {
    let first = *points.first()?;
    let (min, max) = points
        .iter()
        .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    let center = (min + max) * 0.5;
    let radius = points
        .iter()
        .map(|p| p.distance_squared(center))
        .fold(0.0_f32, f32::max)
        .sqrt();
    Some(BoundingSphere::new(center, radius))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailState {
    #[default]
    Uninitialized,
    Ready,
    Refreshing,
}

#[derive(Debug, Clone, Default)]
pub struct OrbitTrailBuilder {
    config: TrailConfig,
    mapper: SceneMapper,
    buffer: TrailBuffer,
    state: TrailState,
}

impl OrbitTrailBuilder {
    pub fn new(config: TrailConfig, mapper: SceneMapper) -> Self {
        Self {
            config,
            mapper,
            buffer: TrailBuffer::with_capacity(config.sample_count()),
            state: TrailState::Uninitialized,
        }
    }

    pub fn config(&self) -> TrailConfig {
        self.config
    }

    /// Takes effect on the next refresh, growing the arena if needed.
    pub fn set_config(&mut self, config: TrailConfig) {
        self.config = config;
    }

    pub fn set_mapper(&mut self, mapper: SceneMapper) {
        self.mapper = mapper;
    }

    pub fn buffer(&self) -> &TrailBuffer {
        &self.buffer
    }

    pub fn state(&self) -> TrailState {
        self.state
    }

    /// Forget every sample and go back to `Uninitialized`
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = TrailState::Uninitialized;
    }

    /// Resample the window starting at `now` from the propagator.
    pub fn refresh(&mut self, propagator: &OrbitPropagator, now: DateTime<Utc>) {
        let mapper = self.mapper;
        self.refresh_with(now, |t| {
            let sample = propagator.propagate(t).ok()?;
            mapper.to_scene_finite(sample.position_ecef(sample.gmst()))
        });
    }

    /// Resample using `sample_at`, which returns `None` for an unusable instant.
    ///
    /// A failed sample repeats the last good one from this pass; failures
    /// before the first good sample are dropped.
    pub fn refresh_with<F>(&mut self, now: DateTime<Utc>, mut sample_at: F)
    where
        F: FnMut(DateTime<Utc>) -> Option<Vec3>,
    {
        self.state = TrailState::Refreshing;
        let count = self.config.sample_count();
        let had_samples = !self.buffer.is_empty();

        self.buffer.ensure_capacity(count);
        self.buffer.clear();

        for i in 0..count {
            let t = now + self.config.offset(i);
            match sample_at(t).filter(|p| p.is_finite()) {
                Some(p) => self.buffer.push(p),
                None => {
                    if let Some(last) = self.buffer.last_written() {
                        self.buffer.push(last);
                    }
                }
            }
        }

        if self.buffer.is_empty() {
            if had_samples {
                info!("[TRAIL] no valid samples; trail emptied");
            }
        } else {
            self.buffer.recompute_bounds();
        }
        debug!("[TRAIL] refreshed {}/{} samples", self.buffer.written(), count);
        self.state = TrailState::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::mock_data::mock_iss_tle;

    fn loaded() -> (OrbitPropagator, DateTime<Utc>) {
        let mut propagator = OrbitPropagator::default();
        let state = propagator.load_tle(&mock_iss_tle()).expect("valid TLE");
        let epoch = state.epoch_utc;
        (propagator, epoch)
    }

    #[test]
    fn test_default_window_has_361_samples() {
        assert_eq!(TrailConfig::default().sample_count(), 361);
    }

    #[test]
    fn test_sample_count_rounds_up() {
        let config = TrailConfig {
            window_minutes: 1.0,
            step_seconds: 7.0,
        };
        // 60 / 7 = 8.57 -> 9 intervals -> 10 samples
        assert_eq!(config.sample_count(), 10);
        assert_eq!(config.offset(3), Duration::seconds(21));
    }

    #[test]
    fn test_sample_count_is_capped() {
        let huge_window = TrailConfig {
            window_minutes: 1e300,
            step_seconds: 15.0,
        };
        assert_eq!(huge_window.sample_count(), MAX_TRAIL_SAMPLES);

        let tiny_step = TrailConfig {
            window_minutes: 90.0,
            step_seconds: 1e-4,
        };
        assert_eq!(tiny_step.sample_count(), MAX_TRAIL_SAMPLES);
    }

    #[test]
    fn test_sanitized_extremes_stay_bounded() {
        let config = TrackerConfig {
            orbit_window_minutes: 1e300,
            orbit_sample_seconds: 1e-4,
            ..Default::default()
        }
        .sanitized();
        let count = TrailConfig::from(&config).sample_count();
        assert!(count > 1 && count <= MAX_TRAIL_SAMPLES);
    }

    #[test]
    fn test_refresh_fills_whole_window() {
        let (propagator, epoch) = loaded();
        let mut builder = OrbitTrailBuilder::default();
        assert_eq!(builder.state(), TrailState::Uninitialized);

        builder.refresh(&propagator, epoch);
        assert_eq!(builder.state(), TrailState::Ready);
        let buffer = builder.buffer();
        assert_eq!(buffer.written(), 361);
        assert!(buffer.written() <= buffer.capacity());
        for p in buffer.visible() {
            assert!((2.05..2.2).contains(&p.length()), "|p| = {}", p.length());
        }
        let bounds = buffer.bounds().expect("bounds");
        assert!(bounds.radius() > 2.0 && bounds.radius() < 2.5, "r = {}", bounds.radius());
    }

    #[test]
    fn test_first_sample_matches_live_position() {
        let (propagator, epoch) = loaded();
        let mapper = SceneMapper::default();
        let mut builder = OrbitTrailBuilder::new(TrailConfig::default(), mapper);
        builder.refresh(&propagator, epoch);

        let sample = propagator.propagate(epoch).expect("sample");
        let live = mapper.to_scene(sample.position_ecef(sample.gmst()));
        assert_eq!(builder.buffer().visible()[0], live);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (propagator, epoch) = loaded();
        let now = epoch + Duration::minutes(42);
        let mut a = OrbitTrailBuilder::default();
        let mut b = OrbitTrailBuilder::default();
        a.refresh(&propagator, now);
        b.refresh(&propagator, now);
        b.refresh(&propagator, now);
        assert_eq!(a.buffer().visible(), b.buffer().visible());
        let sphere = |buffer: &TrailBuffer| buffer.bounds().map(|s| (s.center, s.radius()));
        assert_eq!(sphere(a.buffer()), sphere(b.buffer()));
    }

    #[test]
    fn test_gap_repeats_last_valid_sample() {
        let config = TrailConfig {
            window_minutes: 1.0,
            step_seconds: 15.0,
        };
        let now = Utc::now();
        let mut builder = OrbitTrailBuilder::new(config, SceneMapper::default());
        let mut i = 0;
        builder.refresh_with(now, |_| {
            i += 1;
            match i {
                3 | 4 => None,
                n => Some(Vec3::splat(n as f32)),
            }
        });
        let visible = builder.buffer().visible();
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[1], Vec3::splat(2.0));
        assert_eq!(visible[2], Vec3::splat(2.0));
        assert_eq!(visible[3], Vec3::splat(2.0));
        assert_eq!(visible[4], Vec3::splat(5.0));
    }

    #[test]
    fn test_leading_failures_are_skipped() {
        let config = TrailConfig {
            window_minutes: 1.0,
            step_seconds: 15.0,
        };
        let now = Utc::now();
        let mut builder = OrbitTrailBuilder::new(config, SceneMapper::default());
        let mut i = 0;
        builder.refresh_with(now, |_| {
            i += 1;
            (i > 2).then(|| Vec3::splat(i as f32))
        });
        assert_eq!(
            builder.buffer().visible(),
            &[Vec3::splat(3.0), Vec3::splat(4.0), Vec3::splat(5.0)]
        );
    }

    #[test]
    fn test_non_finite_samples_count_as_failures() {
        let config = TrailConfig {
            window_minutes: 0.5,
            step_seconds: 15.0,
        };
        let mut builder = OrbitTrailBuilder::new(config, SceneMapper::default());
        let mut i = 0;
        builder.refresh_with(Utc::now(), |_| {
            i += 1;
            Some(if i == 2 { Vec3::NAN } else { Vec3::ONE })
        });
        assert!(builder.buffer().visible().iter().all(|p| p.is_finite()));
        assert_eq!(builder.buffer().written(), 3);
    }

    #[test]
    fn test_all_failures_empty_the_trail() {
        let (propagator, epoch) = loaded();
        let mut builder = OrbitTrailBuilder::default();
        builder.refresh(&propagator, epoch);
        assert!(!builder.buffer().is_empty());

        builder.refresh_with(epoch, |_| None);
        assert!(builder.buffer().visible().is_empty());
        assert!(builder.buffer().bounds().is_none());
        assert_eq!(builder.state(), TrailState::Ready);
    }

    #[test]
    fn test_unloaded_propagator_yields_empty_trail() {
        let mut builder = OrbitTrailBuilder::default();
        builder.refresh(&OrbitPropagator::default(), Utc::now());
        assert!(builder.buffer().is_empty());
    }

    #[test]
    fn test_arena_grows_but_never_shrinks() {
        let (propagator, epoch) = loaded();
        let mut builder = OrbitTrailBuilder::default();
        builder.refresh(&propagator, epoch);
        assert_eq!(builder.buffer().capacity(), 361);

        builder.set_config(TrailConfig {
            window_minutes: 180.0,
            step_seconds: 15.0,
        });
        builder.refresh(&propagator, epoch);
        assert_eq!(builder.buffer().capacity(), 721);
        assert_eq!(builder.buffer().written(), 721);

        builder.set_config(TrailConfig {
            window_minutes: 30.0,
            step_seconds: 15.0,
        });
        builder.refresh(&propagator, epoch);
        assert_eq!(builder.buffer().capacity(), 721);
        assert_eq!(builder.buffer().written(), 121);
    }

    #[test]
    fn test_reset_returns_to_uninitialized() {
        let (propagator, epoch) = loaded();
        let mut builder = OrbitTrailBuilder::default();
        builder.refresh(&propagator, epoch);
        builder.reset();
        assert_eq!(builder.state(), TrailState::Uninitialized);
        assert!(builder.buffer().is_empty());
    }
}

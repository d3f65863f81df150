//! The visualization instance: owns the orbital state, the trail and both timers

use bevy::prelude::*;
use chrono::{DateTime, Utc};

use crate::config::TrackerConfig;
use crate::core::space::SceneMapper;
use crate::orbital::{IntervalTimer, OrbitPropagator, PropagationError};
use crate::satellite::live::{FrameOutcome, LiveStateUpdater, ReadoutSink, TrackedObjectHandle};
use crate::satellite::trail::{OrbitTrailBuilder, TrailBuffer, TrailConfig, TrailState};
use crate::tle::TleSet;

/// Tracks one object. Inert until `start`, inert again after `stop`.
#[derive(Resource, Debug, Clone)]
pub struct IssTracker {
    config: TrackerConfig,
    propagator: OrbitPropagator,
    updater: LiveStateUpdater,
    trail: OrbitTrailBuilder,
    tle_timer: IntervalTimer,
    trail_timer: IntervalTimer,
    running: bool,
}

impl Default for IssTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl IssTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let config = config.sanitized();
        let mapper = SceneMapper::new(config.scene_earth_radius);
        Self {
            propagator: OrbitPropagator::default(),
            updater: LiveStateUpdater::new(mapper),
            trail: OrbitTrailBuilder::new(TrailConfig::from(&config), mapper),
            tle_timer: IntervalTimer::new(config.tle_refresh_interval),
            trail_timer: IntervalTimer::new(config.trail_refresh_interval),
            running: false,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn propagator(&self) -> &OrbitPropagator {
        &self.propagator
    }

    pub fn trail(&self) -> &TrailBuffer {
        self.trail.buffer()
    }

    pub fn trail_state(&self) -> TrailState {
        self.trail.state()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arm the TLE timer so the first fetch is requested right away. The trail
    /// timer follows once elements are available.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.running = true;
        self.tle_timer.start(now);
        if self.propagator.is_loaded() {
            self.trail_timer.start(now);
        }
    }

    /// Stop both timers and drop the trail. Frame updates become no-ops.
    pub fn stop(&mut self) {
        self.running = false;
        self.tle_timer.stop();
        self.trail_timer.stop();
        self.trail.reset();
    }

    /// Swap in elements from `tle`. On error the previous elements stay.
    pub fn load_tle(&mut self, tle: &TleSet, now: DateTime<Utc>) -> Result<(), PropagationError> {
        self.propagator.load_tle(tle)?;
        if self.running && !self.trail_timer.is_running() {
            self.trail_timer.start(now);
        }
        Ok(())
    }

    /// True when a TLE fetch should be requested
    pub fn poll_tle_due(&mut self, now: DateTime<Utc>) -> bool {
        self.running && self.tle_timer.poll(now)
    }

    /// Rebuild the trail if its timer is due. Returns whether it ran.
    pub fn tick_trail(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running || !self.trail_timer.poll(now) {
            return false;
        }
        self.trail.refresh(&self.propagator, now);
        true
    }

    pub fn on_frame<H, S>(&self, now: DateTime<Utc>, handle: &mut H, sink: &mut S) -> FrameOutcome
    where
        H: TrackedObjectHandle + ?Sized,
        S: ReadoutSink + ?Sized,
    {
        if !self.running {
            return FrameOutcome::Idle;
        }
        self.updater.update(&self.propagator, now, handle, sink)
    }

    /// Apply a new configuration without dropping the loaded elements.
    ///
    /// The trail arena grows on the next refresh if the window needs more slots.
    pub fn set_config(&mut self, config: TrackerConfig) {
        let config = config.sanitized();
        let mapper = SceneMapper::new(config.scene_earth_radius);
        self.updater.set_mapper(mapper);
        self.trail.set_mapper(mapper);
        self.trail.set_config(TrailConfig::from(&config));
        self.tle_timer.set_interval(config.tle_refresh_interval);
        self.trail_timer.set_interval(config.trail_refresh_interval);
        self.config = config;
    }
}

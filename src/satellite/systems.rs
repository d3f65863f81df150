//! Satellite systems for propagation, trail refresh and teardown

use crate::config::TrackerConfig;
use crate::orbital::WallClock;
use crate::satellite::components::TrackedIss;
use crate::satellite::live::IssReadout;
use crate::satellite::resources::IssReadoutRes;
use crate::satellite::tracker::IssTracker;
use bevy::prelude::*;

/// Startup system arming the tracker's timers
pub fn start_tracker_system(clock: Res<WallClock>, mut tracker: ResMut<IssTracker>) {
    tracker.start(clock.now());
    info!("[INIT] ISS tracker started");
}

/// System to re-propagate at "now" and move the tracked entity.
///
/// The readout resource is only written when a readout was produced, so its
/// change detection tracks actual updates.
pub fn live_state_system(
    clock: Res<WallClock>,
    tracker: Res<IssTracker>,
    mut readout: ResMut<IssReadoutRes>,
    mut q: Query<&mut Transform, With<TrackedIss>>,
) {
    let Ok(mut transform) = q.single_mut() else {
        return;
    };
    let mut latest: Option<IssReadout> = None;
    let outcome = tracker.on_frame(clock.now(), &mut *transform, &mut latest);
    if latest.is_some() {
        readout.latest = latest;
    }
    debug!("[LIVE] {:?}", outcome);
}

/// System driving the wall-clock trail refresh
pub fn trail_refresh_system(clock: Res<WallClock>, mut tracker: ResMut<IssTracker>) {
    tracker.tick_trail(clock.now());
}

/// System pushing `TrackerConfig` edits into the tracker
pub fn apply_config_system(config: Res<TrackerConfig>, mut tracker: ResMut<IssTracker>) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    tracker.set_config(config.clone());
    info!("[CONFIG] tracker configuration updated");
}

/// System stopping the tracker once the tracked entity is gone
pub fn teardown_on_removal_system(
    mut removed: RemovedComponents<TrackedIss>,
    mut tracker: ResMut<IssTracker>,
    mut readout: ResMut<IssReadoutRes>,
) {
    if removed.read().count() == 0 || !tracker.is_running() {
        return;
    }
    tracker.stop();
    readout.latest = None;
    info!("[TEARDOWN] tracked entity removed; tracker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::{Clock, ManualClock};
    use crate::tle::mock_data::mock_iss_tle;
    use std::sync::Arc;

    fn test_app() -> (App, ManualClock) {
        let clock = ManualClock::new(mock_iss_tle().epoch_utc);
        let mut app = App::new();
        app.insert_resource(WallClock(Arc::new(clock.clone())))
            .insert_resource(TrackerConfig::default())
            .init_resource::<IssTracker>()
            .init_resource::<IssReadoutRes>()
            .add_systems(Startup, start_tracker_system)
            .add_systems(
                Update,
                (
                    apply_config_system,
                    trail_refresh_system,
                    live_state_system,
                    teardown_on_removal_system,
                )
                    .chain(),
            );
        (app, clock)
    }

    #[test]
    fn test_live_system_moves_tracked_entity() {
        let (mut app, clock) = test_app();
        let entity = app
            .world_mut()
            .spawn((Transform::default(), TrackedIss))
            .id();
        app.update();
        {
            let mut tracker = app.world_mut().resource_mut::<IssTracker>();
            tracker
                .load_tle(&mock_iss_tle(), clock.now())
                .expect("valid TLE");
        }
        app.update();

        let transform = app.world().get::<Transform>(entity).expect("transform");
        assert!(transform.translation.length() > 2.0);
        assert!(app.world().resource::<IssReadoutRes>().latest.is_some());
        assert_eq!(app.world().resource::<IssTracker>().trail().written(), 361);
    }

    #[test]
    fn test_despawning_tracked_entity_stops_tracker() {
        let (mut app, clock) = test_app();
        let entity = app
            .world_mut()
            .spawn((Transform::default(), TrackedIss))
            .id();
        app.update();
        app.world_mut()
            .resource_mut::<IssTracker>()
            .load_tle(&mock_iss_tle(), clock.now())
            .expect("valid TLE");
        app.update();

        app.world_mut().despawn(entity);
        app.update();

        let tracker = app.world().resource::<IssTracker>();
        assert!(!tracker.is_running());
        assert!(tracker.trail().is_empty());
        assert!(app.world().resource::<IssReadoutRes>().latest.is_none());
    }

    #[derive(Resource, Default)]
    struct ReadoutChanges(u32);

    fn count_readout_changes(readout: Res<IssReadoutRes>, mut changes: ResMut<ReadoutChanges>) {
        if readout.is_changed() {
            changes.0 += 1;
        }
    }

    #[test]
    fn test_readout_only_changes_when_published() {
        let (mut app, clock) = test_app();
        app.init_resource::<ReadoutChanges>().add_systems(
            Update,
            count_readout_changes.after(teardown_on_removal_system),
        );
        app.world_mut().spawn((Transform::default(), TrackedIss));

        // Nothing loaded: only the insertion counts
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(app.world().resource::<ReadoutChanges>().0, 1);
        assert!(app.world().resource::<IssReadoutRes>().latest.is_none());

        app.world_mut()
            .resource_mut::<IssTracker>()
            .load_tle(&mock_iss_tle(), clock.now())
            .expect("valid TLE");
        app.update();
        app.update();
        assert_eq!(app.world().resource::<ReadoutChanges>().0, 3);
    }

    #[test]
    fn test_config_resource_change_reaches_tracker() {
        let (mut app, _clock) = test_app();
        app.update();
        app.world_mut()
            .resource_mut::<TrackerConfig>()
            .orbit_window_minutes = 45.0;
        app.update();
        let tracker = app.world().resource::<IssTracker>();
        assert_eq!(tracker.config().orbit_window_minutes, 45.0);
    }
}

//! TLE processing systems

use crate::orbital::WallClock;
use crate::satellite::IssTracker;
use crate::tle::types::{FetchChannels, FetchCommand, FetchResultMsg};
use bevy::prelude::*;

/// System to ask the worker for a fresh TLE whenever the tracker's refresh timer is due
pub fn request_tle_refresh_system(
    clock: Res<WallClock>,
    mut tracker: ResMut<IssTracker>,
    fetch: Option<Res<FetchChannels>>,
) {
    // Leave the timer armed until a worker exists to serve it
    let Some(fetch) = fetch else { return };
    if !tracker.poll_tle_due(clock.now()) {
        return;
    }
    if let Err(e) = fetch.cmd_tx.send(FetchCommand::Fetch) {
        warn!("[TLE REQUEST] worker unavailable: {}", e);
    }
}

/// System to drain fetch results and hand new element sets to the tracker
pub fn process_fetch_results_system(
    clock: Res<WallClock>,
    mut tracker: ResMut<IssTracker>,
    fetch: Option<Res<FetchChannels>>,
) {
    let Some(fetch) = fetch else { return };
    let Ok(guard) = fetch.res_rx.lock() else {
        return;
    };
    while let Ok(msg) = guard.try_recv() {
        match msg {
            FetchResultMsg::Success { tle, origin } => {
                match tracker.load_tle(&tle, clock.now()) {
                    Ok(()) => info!(
                        "[SGP4] loaded {} from {} (epoch {})",
                        tle.name.as_deref().unwrap_or("unnamed object"),
                        origin,
                        tle.epoch_utc.to_rfc3339()
                    ),
                    Err(e) => warn!(
                        "[SGP4] rejected TLE from {}: {}; keeping previous elements",
                        origin, e
                    ),
                }
            }
            FetchResultMsg::Failure { error } => {
                warn!(
                    "[TLE DISPATCH] fetch failed: {}; keeping previous elements",
                    error
                );
            }
        }
    }
}

//! TLE data types and communication structures

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender},
};

/// A two-line element set for one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TleSet {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
}

impl TleSet {
    /// Catalog number from columns 3-7 of line 1
    pub fn norad_id(&self) -> Option<u32> {
        self.line1.get(2..7).and_then(|s| s.trim().parse().ok())
    }
}

/// Where a delivered TLE came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TleOrigin {
    Cache,
    Upstream,
    LocalFallback,
}

impl fmt::Display for TleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TleOrigin::Cache => write!(f, "cache"),
            TleOrigin::Upstream => write!(f, "upstream"),
            TleOrigin::LocalFallback => write!(f, "local fallback"),
        }
    }
}

/// Commands for the TLE fetcher worker thread
#[derive(Debug)]
pub enum FetchCommand {
    Fetch,
}

/// Results from the TLE fetcher worker thread
#[derive(Debug)]
pub enum FetchResultMsg {
    Success { tle: TleSet, origin: TleOrigin },
    Failure { error: String },
}

/// Resource containing channels for communicating with the TLE worker thread
#[derive(Resource)]
pub struct FetchChannels {
    pub cmd_tx: Sender<FetchCommand>,
    pub res_rx: Arc<Mutex<Receiver<FetchResultMsg>>>,
}

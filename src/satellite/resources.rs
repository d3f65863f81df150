//! Satellite resources shared with the UI

use bevy::prelude::*;

use crate::satellite::live::IssReadout;

/// Latest readout of the tracked object, written only when a frame produced one
#[derive(Resource, Default, Debug)]
pub struct IssReadoutRes {
    pub latest: Option<IssReadout>,
}

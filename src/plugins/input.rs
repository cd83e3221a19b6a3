use bevy::prelude::*;

use crate::systems::{hotkey_system, input_system};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PilotInputSet;

/// Merges the selected command source into each craft's controller once per frame.
///
/// Keyboard and gamepad state come from Bevy's `InputPlugin` when it is installed; without it
/// those sources read as centred sticks.
pub struct PilotInputPlugin;

impl Plugin for PilotInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (hotkey_system, input_system).chain().in_set(PilotInputSet),
        );
    }
}

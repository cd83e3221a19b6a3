use bevy::prelude::*;

use crate::{
    components::{
        FlightCommand, FlightController, FlightRequest, Hotkeys, InputManager, SourceContext,
    },
    link::CommandReceiver,
    resources::{AgentAction, VirtualJoysticks},
};

/// Hotkeys work in every input mode.
pub fn hotkey_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut query: Query<(Entity, &mut InputManager)>,
    mut commands: EventWriter<FlightCommand>,
) {
    let Some(keys) = keys else {
        return;
    };
    let hotkeys = Hotkeys::read(&keys);
    if hotkeys == Hotkeys::default() {
        return;
    }

    for (entity, mut input) in query.iter_mut() {
        if let Some(mode) = hotkeys.select_mode {
            input.set_mode(mode);
        }
        if hotkeys.calibrate {
            commands.send(FlightCommand {
                entity,
                request: FlightRequest::StartCalibration,
            });
        }
        if hotkeys.toggle_stabilization {
            commands.send(FlightCommand {
                entity,
                request: FlightRequest::ToggleStabilization,
            });
        }
    }
}

/// Reads the active source of every craft and forwards the command to its controller.
pub fn input_system(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    gamepads: Query<&Gamepad>,
    joysticks: Option<Res<VirtualJoysticks>>,
    receiver: Option<Res<CommandReceiver>>,
    agent: Option<Res<AgentAction>>,
    mut query: Query<(&mut InputManager, &mut FlightController)>,
) {
    let dt = time.delta_secs_f64();
    let ctx = SourceContext {
        keys: keys.as_deref(),
        gamepad: gamepads.iter().next(),
        joysticks: joysticks.as_deref(),
        network: receiver.as_ref().and_then(|r| r.command()),
        agent: agent.as_deref(),
    };

    for (mut input, mut controller) in query.iter_mut() {
        let command = input.update(&ctx, dt);
        controller.set_control_inputs(command);
    }
}

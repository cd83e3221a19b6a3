use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    components::ControlCommand,
    resources::{AgentAction, VirtualJoysticks},
    utils::lerp,
};

/// Selectable command source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Keyboard,
    Gamepad,
    VirtualJoystick,
    Network,
    Agent,
}

impl InputMode {
    /// Selection order, matching the digit hotkeys.
    pub const ALL: [InputMode; 5] = [
        InputMode::Keyboard,
        InputMode::Gamepad,
        InputMode::VirtualJoystick,
        InputMode::Network,
        InputMode::Agent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InputMode::Keyboard => "Keyboard",
            InputMode::Gamepad => "Gamepad",
            InputMode::VirtualJoystick => "VirtualJoystick",
            InputMode::Network => "Network",
            InputMode::Agent => "Agent",
        }
    }

    /// Display names in selection order, for mode pickers.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|mode| mode.name()).collect()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key assignments for the keyboard source.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardBindings {
    pub thrust_up: KeyCode,
    pub thrust_down: KeyCode,
    pub pitch_forward: KeyCode,
    pub pitch_backward: KeyCode,
    pub roll_left: KeyCode,
    pub roll_right: KeyCode,
    pub yaw_left: KeyCode,
    pub yaw_right: KeyCode,
}

impl Default for KeyboardBindings {
    fn default() -> Self {
        Self {
            thrust_up: KeyCode::Space,
            thrust_down: KeyCode::ShiftLeft,
            pitch_forward: KeyCode::KeyW,
            pitch_backward: KeyCode::KeyS,
            roll_left: KeyCode::KeyA,
            roll_right: KeyCode::KeyD,
            yaw_left: KeyCode::KeyQ,
            yaw_right: KeyCode::KeyE,
        }
    }
}

impl KeyboardBindings {
    pub fn read(&self, keys: &ButtonInput<KeyCode>) -> ControlCommand {
        let axis = |positive: KeyCode, negative: KeyCode| {
            let mut value = 0.0;
            if keys.pressed(positive) {
                value += 1.0;
            }
            if keys.pressed(negative) {
                value -= 1.0;
            }
            value
        };

        ControlCommand {
            thrust: axis(self.thrust_up, self.thrust_down),
            pitch: axis(self.pitch_forward, self.pitch_backward),
            roll: axis(self.roll_left, self.roll_right),
            yaw: axis(self.yaw_right, self.yaw_left),
        }
    }
}

/// Stick assignment for the gamepad source: left stick thrust/yaw, right stick pitch/roll.
/// Right stick X is mirrored like the virtual sticks, so pushing right is a negative roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadAxes {
    /// Deflections smaller than this read as zero
    pub deadzone: f64,
}

impl Default for GamepadAxes {
    fn default() -> Self {
        Self { deadzone: 0.05 }
    }
}

impl GamepadAxes {
    pub fn read(&self, gamepad: &Gamepad) -> ControlCommand {
        let left = gamepad.left_stick();
        let right = gamepad.right_stick();
        let dz = |v: f32| {
            let v = f64::from(v);
            if v.abs() < self.deadzone {
                0.0
            } else {
                v
            }
        };

        ControlCommand {
            thrust: dz(left.y),
            pitch: dz(right.y),
            roll: dz(-right.x),
            yaw: dz(left.x),
        }
    }
}

/// Everything a source may read from during one tick. Absent providers are `None`.
#[derive(Default, Clone, Copy)]
pub struct SourceContext<'a> {
    pub keys: Option<&'a ButtonInput<KeyCode>>,
    pub gamepad: Option<&'a Gamepad>,
    pub joysticks: Option<&'a VirtualJoysticks>,
    pub network: Option<ControlCommand>,
    pub agent: Option<&'a AgentAction>,
}

/// The active command source.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Keyboard(KeyboardBindings),
    Gamepad(GamepadAxes),
    VirtualJoystick,
    Network,
    Agent,
}

impl InputSource {
    pub fn mode(&self) -> InputMode {
        match self {
            InputSource::Keyboard(_) => InputMode::Keyboard,
            InputSource::Gamepad(_) => InputMode::Gamepad,
            InputSource::VirtualJoystick => InputMode::VirtualJoystick,
            InputSource::Network => InputMode::Network,
            InputSource::Agent => InputMode::Agent,
        }
    }

    /// Raw command of this source. A missing provider reads as all zeros.
    pub fn read(&self, ctx: &SourceContext) -> ControlCommand {
        match self {
            InputSource::Keyboard(bindings) => {
                ctx.keys.map(|keys| bindings.read(keys)).unwrap_or_default()
            }
            InputSource::Gamepad(axes) => ctx.gamepad.map(|pad| axes.read(pad)).unwrap_or_default(),
            InputSource::VirtualJoystick => ctx
                .joysticks
                .map(VirtualJoysticks::command)
                .unwrap_or_default(),
            InputSource::Network => ctx.network.unwrap_or_default(),
            InputSource::Agent => ctx.agent.map(|a| a.command).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub mode: InputMode,
    /// Smoothing time constant [s]
    pub smoothing: f64,
    /// Global gain applied after smoothing, in [0.1, 3]
    pub sensitivity: f64,
    pub invert_pitch: bool,
    pub invert_roll: bool,
    pub invert_yaw: bool,
    pub gamepad: GamepadAxes,
    #[serde(skip)]
    pub keyboard: KeyboardBindings,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mode: InputMode::Keyboard,
            smoothing: 0.1,
            sensitivity: 1.0,
            invert_pitch: false,
            invert_roll: false,
            invert_yaw: false,
            gamepad: GamepadAxes::default(),
            keyboard: KeyboardBindings::default(),
        }
    }
}

/// Operator hotkeys pressed this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hotkeys {
    pub calibrate: bool,
    pub toggle_stabilization: bool,
    pub select_mode: Option<InputMode>,
}

impl Hotkeys {
    const MODE_KEYS: [KeyCode; 5] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];

    pub fn read(keys: &ButtonInput<KeyCode>) -> Self {
        let select_mode = Self::MODE_KEYS
            .iter()
            .position(|&key| keys.just_pressed(key))
            .and_then(InputMode::from_index);

        Self {
            calibrate: keys.just_pressed(KeyCode::KeyC),
            toggle_stabilization: keys.just_pressed(KeyCode::KeyT),
            select_mode,
        }
    }
}

/// Merges the active source into one smoothed command per tick.
#[derive(Component, Debug, Clone)]
pub struct InputManager {
    pub config: InputConfig,
    source: InputSource,
    smoothed: ControlCommand,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        let source = Self::source_for(&config, config.mode);
        Self {
            config,
            source,
            smoothed: ControlCommand::default(),
        }
    }

    fn source_for(config: &InputConfig, mode: InputMode) -> InputSource {
        match mode {
            InputMode::Keyboard => InputSource::Keyboard(config.keyboard.clone()),
            InputMode::Gamepad => InputSource::Gamepad(config.gamepad),
            InputMode::VirtualJoystick => InputSource::VirtualJoystick,
            InputMode::Network => InputSource::Network,
            InputMode::Agent => InputSource::Agent,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.source.mode()
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        if mode != self.mode() {
            info!("Input mode set to {}", mode);
            self.source = Self::source_for(&self.config, mode);
            self.config.mode = mode;
        }
    }

    /// Selects a mode by its position in `InputMode::ALL`. Out-of-range indices are ignored.
    pub fn set_mode_index(&mut self, index: usize) -> bool {
        match InputMode::from_index(index) {
            Some(mode) => {
                self.set_mode(mode);
                true
            }
            None => {
                warn!("Ignoring unknown input mode index {}", index);
                false
            }
        }
    }

    /// Reads the active source and advances smoothing by `dt`. Returns the command for the
    /// flight controller; the controller clamps it.
    pub fn update(&mut self, ctx: &SourceContext, dt: f64) -> ControlCommand {
        let raw = self.source.read(ctx);
        self.apply(raw, dt)
    }

    /// Inversion, smoothing and sensitivity applied to a raw command.
    pub fn apply(&mut self, mut raw: ControlCommand, dt: f64) -> ControlCommand {
        if self.config.invert_pitch {
            raw.pitch = -raw.pitch;
        }
        if self.config.invert_roll {
            raw.roll = -raw.roll;
        }
        if self.config.invert_yaw {
            raw.yaw = -raw.yaw;
        }

        let factor = if self.config.smoothing > 0.0 {
            dt / self.config.smoothing
        } else {
            1.0
        };
        let s = &mut self.smoothed;
        s.thrust = lerp(s.thrust, raw.thrust, factor);
        s.pitch = lerp(s.pitch, raw.pitch, factor);
        s.roll = lerp(s.roll, raw.roll, factor);
        s.yaw = lerp(s.yaw, raw.yaw, factor);

        let k = self.config.sensitivity;
        ControlCommand::new(s.thrust * k, s.pitch * k, s.roll * k, s.yaw * k)
    }

    /// Smoothed command before sensitivity.
    pub fn current_input(&self) -> ControlCommand {
        self.smoothed
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

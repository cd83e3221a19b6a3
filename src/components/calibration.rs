use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Time spent at hover thrust before sampling starts [s]
    pub settle_delay: f64,
    /// Length of the sampling window [s]
    pub measurement_window: f64,
    /// Gain from mean angular rate to thrust offset [N per rad/s]
    pub factor: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            settle_delay: 1.0,
            measurement_window: 3.0,
            factor: 0.05,
        }
    }
}

/// Drift calibration, advanced once per control tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CalibrationRoutine {
    #[default]
    Idle,
    Settling {
        elapsed: f64,
    },
    Measuring {
        accumulated: Vector3<f64>,
        samples: u32,
        elapsed: f64,
    },
    Applying {
        average: Vector3<f64>,
    },
}

impl CalibrationRoutine {
    pub fn is_active(&self) -> bool {
        !matches!(self, CalibrationRoutine::Idle)
    }

    /// Begins a session. Returns false and leaves the session untouched if one is running.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        *self = CalibrationRoutine::Settling { elapsed: 0.0 };
        true
    }

    /// Advances the session by one tick with the latest angular-velocity sample.
    ///
    /// Returns the motor offsets (mixing order) on the tick the session completes, after which
    /// the routine is idle again.
    pub fn tick(
        &mut self,
        dt: f64,
        angular_velocity: &Vector3<f64>,
        config: &CalibrationConfig,
    ) -> Option<[f64; 4]> {
        match self {
            CalibrationRoutine::Idle => None,
            CalibrationRoutine::Settling { elapsed } => {
                *elapsed += dt;
                if *elapsed >= config.settle_delay {
                    *self = CalibrationRoutine::Measuring {
                        accumulated: Vector3::zeros(),
                        samples: 0,
                        elapsed: 0.0,
                    };
                }
                None
            }
            CalibrationRoutine::Measuring {
                accumulated,
                samples,
                elapsed,
            } => {
                *accumulated += angular_velocity;
                *samples += 1;
                *elapsed += dt;
                if *elapsed >= config.measurement_window {
                    let average = *accumulated / f64::from(*samples);
                    *self = CalibrationRoutine::Applying { average };
                }
                None
            }
            CalibrationRoutine::Applying { average } => {
                let offsets = calibration_offsets(average, config.factor);
                *self = CalibrationRoutine::Idle;
                Some(offsets)
            }
        }
    }
}

/// Maps a mean body angular rate to per-motor thrust offsets (mixing order).
///
/// A positive pitch rate (nose rising) is countered by more rear thrust, a positive roll rate
/// (right side dropping) by more right thrust.
pub fn calibration_offsets(average: &Vector3<f64>, factor: f64) -> [f64; 4] {
    let p = average.x;
    let q = average.y;
    [
        factor * (-q - p),
        factor * (-q + p),
        factor * (q - p),
        factor * (q + p),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run_to_completion(
        routine: &mut CalibrationRoutine,
        omega: Vector3<f64>,
        dt: f64,
    ) -> (usize, Vec<[f64; 4]>) {
        let config = CalibrationConfig::default();
        let mut ticks = 0;
        let mut results = Vec::new();
        while routine.is_active() && ticks < 10_000 {
            if let Some(offsets) = routine.tick(dt, &omega, &config) {
                results.push(offsets);
            }
            ticks += 1;
        }
        (ticks, results)
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut routine = CalibrationRoutine::Idle;
        let out = routine.tick(0.1, &Vector3::zeros(), &CalibrationConfig::default());
        assert!(out.is_none());
        assert_eq!(routine, CalibrationRoutine::Idle);
    }

    #[test]
    fn test_second_start_ignored() {
        let mut routine = CalibrationRoutine::default();
        assert!(routine.start());
        routine.tick(0.5, &Vector3::zeros(), &CalibrationConfig::default());
        assert!(!routine.start());
        assert_eq!(routine, CalibrationRoutine::Settling { elapsed: 0.5 });
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut routine = CalibrationRoutine::default();
        routine.start();
        let (ticks, results) = run_to_completion(&mut routine, Vector3::new(0.2, -0.4, 0.0), 0.01);

        assert_eq!(results.len(), 1);
        assert!(!routine.is_active());
        // 1 s settle + 3 s window + 1 applying tick, give or take float accumulation.
        assert!((400..=403).contains(&ticks), "took {} ticks", ticks);

        let offsets = results[0];
        assert_relative_eq!(offsets[0], 0.05 * (0.4 - 0.2), epsilon = 1e-9);
        assert_relative_eq!(offsets[1], 0.05 * (0.4 + 0.2), epsilon = 1e-9);
        assert_relative_eq!(offsets[2], 0.05 * (-0.4 - 0.2), epsilon = 1e-9);
        assert_relative_eq!(offsets[3], 0.05 * (-0.4 + 0.2), epsilon = 1e-9);
    }

    #[test]
    fn test_offsets_counter_drift() {
        // Nose rising: rear motors gain, front motors lose.
        let nose_up = calibration_offsets(&Vector3::new(0.0, 1.0, 0.0), 0.05);
        assert!(nose_up[0] < 0.0 && nose_up[1] < 0.0);
        assert!(nose_up[2] > 0.0 && nose_up[3] > 0.0);

        // Right side dropping: right motors gain.
        let right_down = calibration_offsets(&Vector3::new(1.0, 0.0, 0.0), 0.05);
        assert!(right_down[1] > 0.0 && right_down[3] > 0.0);
        assert!(right_down[0] < 0.0 && right_down[2] < 0.0);

        let none = calibration_offsets(&Vector3::new(0.0, 0.0, 3.0), 0.05);
        assert_eq!(none, [0.0; 4]);
    }
}

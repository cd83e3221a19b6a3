use bevy::prelude::*;
use nalgebra::Vector3;

/// Result of a successful ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point [m]
    pub distance: f64,
    /// Surface normal at the hit point (world frame, unit length)
    pub normal: Vector3<f64>,
}

/// Scene geometry the sensors can cast rays against. Implemented by the engine.
pub trait Raycast {
    /// Casts a ray from `origin` along the unit vector `direction`, returning the closest hit
    /// within `max_distance`.
    fn cast(&self, origin: &Vector3<f64>, direction: &Vector3<f64>, max_distance: f64)
        -> Option<RayHit>;
}

/// Infinite horizontal plane at a fixed elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    /// Height of the plane above the world origin [m]
    pub elevation: f64,
}

impl FlatGround {
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl Default for FlatGround {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Raycast for FlatGround {
    fn cast(
        &self,
        origin: &Vector3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        // NED: the plane sits at z = -elevation and its normal points up (-z).
        let plane_z = -self.elevation;
        if direction.z.abs() < f64::EPSILON {
            return None;
        }

        let distance = (plane_z - origin.z) / direction.z;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }

        Some(RayHit {
            distance,
            normal: Vector3::new(0.0, 0.0, -1.0),
        })
    }
}

/// Ground geometry used by the ground-distance sensor. Without this resource every cast misses.
#[derive(Resource)]
pub struct GroundProbe(pub Box<dyn Raycast + Send + Sync>);

impl GroundProbe {
    pub fn new(raycast: impl Raycast + Send + Sync + 'static) -> Self {
        Self(Box::new(raycast))
    }

    pub fn flat(elevation: f64) -> Self {
        Self::new(FlatGround::new(elevation))
    }

    pub fn cast(
        &self,
        origin: &Vector3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        self.0.cast(origin, direction, max_distance)
    }
}

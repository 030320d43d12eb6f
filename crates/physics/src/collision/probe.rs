//! Ground probe query.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layers::LayerMask;

/// Closest surface found by a probe ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeHit {
    /// Surface normal at the hit point, pointing away from the surface.
    pub normal: Vec3,

    /// Distance from the ray origin to the hit point.
    pub distance: f32,

    /// Layer of the collider that was hit.
    pub layer: u8,
}

/// Ray query primitive supplied by the physics collaborator.
///
/// The controller issues at most one probe per tick, straight down the
/// gravity direction, when it tries to snap back onto ground.
pub trait GroundProbe {
    /// Cast a ray and return the closest hit on a layer included in `mask`.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (unit length)
    /// * `max_distance` - Maximum distance to cast
    /// * `mask` - Layers the ray may hit
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
        -> Option<ProbeHit>;
}

impl<P: GroundProbe + ?Sized> GroundProbe for &P {
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        (**self).probe(origin, direction, max_distance, mask)
    }
}

/// A probe that never hits anything.
///
/// Useful for bodies floating in empty space and for tests that only exercise
/// contact classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn probe(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<ProbeHit> {
        None
    }
}

//! Physics collaborator interface.

use glam::Vec3;
use ledgerun_physics::{ContactSample, GroundProbe};

/// Contacts reported for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactBatch {
    /// Entered and continuing contacts alike.
    pub samples: Vec<ContactSample>,

    /// Whether every contact for the tick has been delivered.
    ///
    /// An incomplete batch defers classification to the next tick.
    pub complete: bool,
}

impl ContactBatch {
    /// A batch holding every contact of its tick.
    pub fn complete(samples: Vec<ContactSample>) -> Self {
        Self {
            samples,
            complete: true,
        }
    }

    /// A batch whose tick is still receiving contacts.
    pub fn partial(samples: Vec<ContactSample>) -> Self {
        Self {
            samples,
            complete: false,
        }
    }
}

/// Rigid body driven by the locomotion controller.
pub trait PhysicsBody {
    /// Gravity acting on the body.
    fn gravity(&self) -> Vec3;

    fn position(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    /// Take the contacts gathered since the last call.
    fn drain_contacts(&mut self) -> ContactBatch;

    /// Ray query used for ground snapping.
    fn ground_probe(&self) -> &dyn GroundProbe;

    /// Velocity to integrate in the next physics step.
    fn set_velocity(&mut self, velocity: Vec3);

    /// Advance the body by one physics step.
    fn integrate(&mut self, delta_time: f32);
}

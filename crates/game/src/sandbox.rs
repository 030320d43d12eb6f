//! Minimal kinematic body for demos and tests.
//!
//! The body is a sphere that integrates gravity and the commanded velocity,
//! then pushes itself out of whatever a few short rays find. Each surface it
//! rests against is reported as a contact for the next tick. It has no mass,
//! friction or restitution; it exists so the controller can be driven without
//! a full physics engine.

use glam::Vec3;
use ledgerun_physics::{CollisionWorld, ContactSample, GroundProbe, LayerMask};

use crate::body::{ContactBatch, PhysicsBody};

/// Distance within which a surface still counts as touching.
const CONTACT_SKIN: f32 = 0.02;

/// Layer used for ordinary floors and walls.
pub const GROUND_LAYER: u8 = 0;

/// Layer used for stair treads.
pub const STAIRS_LAYER: u8 = 1;

/// Sphere body over a static [`CollisionWorld`].
#[derive(Debug)]
pub struct SandboxBody {
    world: CollisionWorld,
    position: Vec3,
    velocity: Vec3,
    gravity: Vec3,
    radius: f32,
    contacts: Vec<ContactSample>,
    /// Report the next batch as incomplete.
    withhold_completion: bool,
}

impl SandboxBody {
    /// Create a body of radius 0.5 at `position` under standard gravity.
    pub fn new(world: CollisionWorld, position: Vec3) -> Self {
        Self {
            world,
            position,
            velocity: Vec3::ZERO,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            radius: 0.5,
            contacts: Vec::new(),
            withhold_completion: false,
        }
    }

    /// Body resting on [`flat_floor`] at the origin.
    pub fn on_flat_floor() -> Self {
        Self::new(flat_floor(), Vec3::new(0.0, 0.5, 0.0))
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Mark the next contact batch incomplete, as if the physics step had not
    /// finished reporting.
    pub fn withhold_completion(&mut self) {
        self.withhold_completion = true;
    }

    /// Push out of nearby surfaces and record them as contacts.
    fn resolve_contacts(&mut self, up: Vec3) {
        let mut directions = vec![-up];
        let lateral = self.velocity - up * self.velocity.dot(up);
        if let Some(dir) = lateral.try_normalize() {
            directions.push(dir);
        }

        let reach = self.radius * 2.0 + CONTACT_SKIN;
        for dir in directions {
            let Some(hit) = self.world.raycast(self.position, dir, reach, LayerMask::ALL) else {
                continue;
            };

            // Distance from the center to the hit plane.
            let facing = -dir.dot(hit.normal);
            if facing <= 0.0 {
                continue;
            }
            let gap = hit.distance * facing;
            if gap > self.radius + CONTACT_SKIN {
                continue;
            }

            if gap < self.radius {
                self.position += hit.normal * (self.radius - gap);
            }
            let into = self.velocity.dot(hit.normal);
            if into < 0.0 {
                self.velocity -= hit.normal * into;
            }
            self.contacts.push(ContactSample::new(hit.normal, hit.layer));
        }
    }
}

impl PhysicsBody for SandboxBody {
    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn drain_contacts(&mut self) -> ContactBatch {
        let samples = std::mem::take(&mut self.contacts);
        if std::mem::take(&mut self.withhold_completion) {
            ContactBatch::partial(samples)
        } else {
            ContactBatch::complete(samples)
        }
    }

    fn ground_probe(&self) -> &dyn GroundProbe {
        &self.world
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn integrate(&mut self, delta_time: f32) {
        let up = (-self.gravity).try_normalize().unwrap_or(Vec3::Y);

        self.velocity += self.gravity * delta_time;
        self.position += self.velocity * delta_time;

        self.resolve_contacts(up);
    }
}

// ============================================================================
// Test Courses
// ============================================================================

/// A 40x10 floor whose top face is the plane y = 0.
pub fn flat_floor() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(20.0, 0.5, 5.0),
        GROUND_LAYER,
    );
    world
}

/// Floor from x = -20 to 60 with a wall at its left end, a walkable 20 degree
/// ramp and a 40 degree ramp on the stairs layer.
///
/// ```text
///  wall |        floor (y = 0)        |
///  x=-20        x≈28: 20° ramp    x≈49: 40° stairs
/// ```
pub fn test_course() -> CollisionWorld {
    let mut world = flat_floor();
    world.add_box(
        Vec3::new(40.0, -0.5, 0.0),
        Vec3::new(20.0, 0.5, 5.0),
        GROUND_LAYER,
    );

    // Wall at the left end of the floor
    world.add_box(
        Vec3::new(-20.5, 2.0, 0.0),
        Vec3::new(0.5, 2.0, 5.0),
        GROUND_LAYER,
    );

    // Ramps rising towards +X
    world.add_rotated_box(
        Vec3::new(30.0, 0.0, 0.0),
        Vec3::new(5.0, 0.5, 5.0),
        Vec3::new(0.0, 0.0, 20f32.to_radians()),
        GROUND_LAYER,
    );
    world.add_rotated_box(
        Vec3::new(50.0, 0.0, 0.0),
        Vec3::new(5.0, 0.5, 5.0),
        Vec3::new(0.0, 0.0, 40f32.to_radians()),
        STAIRS_LAYER,
    );

    world
}

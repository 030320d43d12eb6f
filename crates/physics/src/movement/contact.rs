//! Per-tick contact accumulation.
//!
//! The physics collaborator reports every contact active during a tick,
//! whether it just began or continues from earlier ticks. Each sample is
//! sorted into the ground or steep sum by how closely its normal points along
//! the up axis. Sums are commutative, so delivery order never matters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ground::SurfaceThresholds;

/// Contacts whose up-dot falls at or below this are overhangs and ceilings.
pub const STEEP_MIN_UP_DOT: f32 = -0.01;

/// A single contact reported by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactSample {
    /// Contact normal pointing from the surface towards the character (unit length).
    pub normal: Vec3,

    /// Layer of the surface the character touches.
    pub layer: u8,
}

impl ContactSample {
    /// Create a new contact sample.
    pub fn new(normal: Vec3, layer: u8) -> Self {
        Self { normal, layer }
    }
}

/// How a contact sample was sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Ground,
    Steep,
    Ignored,
}

/// Transient contact sums for one tick.
///
/// Created fresh by [`ContactAccumulator::begin`] at the start of every tick
/// and dropped once classification and velocity solving have read it, so no
/// contact data can leak into the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactAccumulator {
    /// Sum of ground normals, or the resolved ground normal after classification.
    pub contact_normal: Vec3,

    /// Sum of steep normals.
    pub steep_normal: Vec3,

    /// Number of ground contacts this tick.
    pub ground_contact_count: u32,

    /// Number of steep contacts this tick.
    pub steep_contact_count: u32,
}

impl Default for ContactAccumulator {
    fn default() -> Self {
        Self::begin()
    }
}

impl ContactAccumulator {
    /// Start an empty accumulation for a new tick.
    pub fn begin() -> Self {
        Self {
            contact_normal: Vec3::ZERO,
            steep_normal: Vec3::ZERO,
            ground_contact_count: 0,
            steep_contact_count: 0,
        }
    }

    /// Sort one contact into the ground or steep sum.
    pub fn add(
        &mut self,
        sample: &ContactSample,
        up_axis: Vec3,
        thresholds: &SurfaceThresholds,
    ) -> ContactKind {
        let up_dot = up_axis.dot(sample.normal);
        if up_dot >= thresholds.min_dot(sample.layer) {
            self.ground_contact_count += 1;
            self.contact_normal += sample.normal;
            ContactKind::Ground
        } else if up_dot > STEEP_MIN_UP_DOT {
            self.steep_contact_count += 1;
            self.steep_normal += sample.normal;
            ContactKind::Steep
        } else {
            ContactKind::Ignored
        }
    }

    /// Sort every contact of a tick.
    pub fn extend<'a, I>(&mut self, samples: I, up_axis: Vec3, thresholds: &SurfaceThresholds)
    where
        I: IntoIterator<Item = &'a ContactSample>,
    {
        for sample in samples {
            self.add(sample, up_axis, thresholds);
        }
    }

    /// Check if any ground contact was recorded (or promoted).
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.ground_contact_count > 0
    }

    /// Check if any steep contact was recorded.
    #[inline]
    pub fn on_steep(&self) -> bool {
        self.steep_contact_count > 0
    }
}

//! Static collision geometry answering ground probe queries.
//!
//! The world stores layered parry3d shapes and answers ray queries through
//! them. It is enough for a headless character sandbox; a full engine would
//! implement [`GroundProbe`] on top of its own query pipeline instead.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::Ray;
use parry3d::shape::SharedShape;

use super::layers::LayerMask;
use super::probe::{GroundProbe, ProbeHit};

/// A piece of static geometry in the world.
#[derive(Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Surface layer (0-31).
    pub layer: u8,
}

impl std::fmt::Debug for CollisionBrush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionBrush")
            .field("id", &self.id)
            .field("layer", &self.layer)
            .field("translation", &self.transform.translation.vector)
            .finish()
    }
}

/// The collision world containing all static geometry.
///
/// Supports:
/// - Axis-aligned and rotated boxes (floors, ramps, stair treads)
/// - Convex hulls
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `layer` - Surface layer of the box
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layer: u8) -> u32 {
        self.add_rotated_box(center, half_extents, Vec3::ZERO, layer)
    }

    /// Add a rotated box to the world.
    ///
    /// `rotation` is a scaled axis (axis * angle in radians), so a ramp rising
    /// towards +X by 30 degrees is `Vec3::new(0.0, 0.0, 30f32.to_radians())`.
    pub fn add_rotated_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Vec3,
        layer: u8,
    ) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(rotation.x, rotation.y, rotation.z),
        );
        self.push(shape, transform, layer)
    }

    /// Add a convex hull to the world.
    ///
    /// Returns the brush ID, or `None` if the hull couldn't be computed.
    pub fn add_convex_hull(&mut self, points: &[Vec3], layer: u8) -> Option<u32> {
        let parry_points: Vec<Point<Real>> = points
            .iter()
            .map(|p| Point::new(p.x, p.y, p.z))
            .collect();

        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push(shape, Isometry::identity(), layer))
    }

    fn push(&mut self, shape: SharedShape, transform: Isometry<Real>, layer: u8) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            layer,
        });

        id
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Cast a ray through the world and return the closest hit.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (will be normalized)
    /// * `max_distance` - Maximum trace distance
    /// * `mask` - Layers the ray may hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 0.5 || max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<ProbeHit> = None;

        for brush in &self.brushes {
            if !mask.includes(brush.layer) {
                continue;
            }

            let Some(hit) = brush
                .shape
                .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
            else {
                continue;
            };

            let distance = hit.time_of_impact;
            if distance > max_distance {
                continue;
            }

            let is_closer = closest.map_or(true, |c| distance < c.distance);
            if is_closer {
                // A ray starting inside a solid reports a zero normal.
                let normal = Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z)
                    .try_normalize()
                    .unwrap_or(-dir);
                closest = Some(ProbeHit {
                    normal,
                    distance,
                    layer: brush.layer,
                });
            }
        }

        closest
    }
}

impl GroundProbe for CollisionWorld {
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        self.raycast(origin, direction, max_distance, mask)
    }
}

// ============================================================================
// Tests
// ============================================================================

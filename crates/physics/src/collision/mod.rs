//! Collision queries used by the locomotion controller.
//!
//! The controller never owns geometry. It asks a [`GroundProbe`] for a single
//! downward ray when it needs to reacquire ground, and classifies surfaces by
//! the layer index each hit or contact reports.
//!
//! # Key Types
//!
//! - [`LayerMask`]: 32-bit set of surface layers (ground probe mask, stairs mask)
//! - [`GroundProbe`]: ray query primitive supplied by the physics collaborator
//! - [`ProbeHit`]: normal, distance and layer of the closest hit
//! - [`CollisionWorld`]: static parry3d geometry implementing [`GroundProbe`]

mod layers;
mod probe;
mod world;

pub use layers::LayerMask;
pub use probe::{GroundProbe, NoGround, ProbeHit};
pub use world::CollisionWorld;

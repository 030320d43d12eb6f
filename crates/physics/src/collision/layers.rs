//! Surface layer masks.
//!
//! Every collider belongs to exactly one layer (0-31). Masks select which
//! layers a ray query may hit and which layers use the looser stairs slope
//! threshold.

use serde::{Deserialize, Serialize};

/// Highest valid layer index.
pub const MAX_LAYER: u8 = 31;

/// A set of surface layers, one bit per layer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// No layers.
    pub const NONE: Self = Self(0);

    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing a single layer.
    ///
    /// Layer indices above [`MAX_LAYER`] produce an empty mask.
    #[inline]
    pub fn layer(layer: u8) -> Self {
        if layer > MAX_LAYER {
            Self::NONE
        } else {
            Self(1 << layer)
        }
    }

    /// Check if the given layer index is part of this mask.
    #[inline]
    pub fn includes(self, layer: u8) -> bool {
        layer <= MAX_LAYER && (self.0 & (1 << layer)) != 0
    }

    /// Check if any of the given layers are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Add a layer to this mask.
    #[inline]
    pub fn with(self, layer: u8) -> Self {
        self | Self::layer(layer)
    }

    /// Remove a layer from this mask.
    #[inline]
    pub fn without(self, layer: u8) -> Self {
        Self(self.0 & !Self::layer(layer).0)
    }

    /// Check if no layer is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for LayerMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

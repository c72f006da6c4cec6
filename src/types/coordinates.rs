//! Coordinate systems for 1-D radial discretizations.

use serde::{Deserialize, Serialize};

/// Coordinate system of a 1-D fictitious mesh.
///
/// The discriminant is the exponent of the radial geometry weight
/// `r^d`: 0 for planar slabs, 1 for cylinders, 2 for spheres.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// Slab geometry, weight 1 everywhere
    #[default]
    Planar,
    /// Cylindrical, weight r
    Cylindrical,
    /// Spherical, weight r²
    Spherical,
}

impl CoordinateSystem {
    /// Map a numeric coordinate id (0, 1, 2) to a coordinate system.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Planar),
            1 => Some(Self::Cylindrical),
            2 => Some(Self::Spherical),
            _ => None,
        }
    }

    /// Exponent of the radial weight.
    #[inline]
    pub fn exponent(self) -> i32 {
        match self {
            Self::Planar => 0,
            Self::Cylindrical => 1,
            Self::Spherical => 2,
        }
    }

    /// Geometry weight `r^d`.
    #[inline]
    pub fn weight(self, r: f64) -> f64 {
        r.powi(self.exponent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(CoordinateSystem::from_id(0), Some(CoordinateSystem::Planar));
        assert_eq!(CoordinateSystem::from_id(2), Some(CoordinateSystem::Spherical));
        assert_eq!(CoordinateSystem::from_id(3), None);
    }

    #[test]
    fn test_planar_weight_is_one() {
        for r in [0.0, 0.3, 7.0] {
            assert_eq!(CoordinateSystem::Planar.weight(r), 1.0);
        }
    }

    #[test]
    fn test_spherical_weight() {
        assert!((CoordinateSystem::Spherical.weight(0.5) - 0.25).abs() < 1e-15);
    }
}

//! 1-D fictitious-mesh geometry.
//!
//! N nodes span [0, L] with spacing Δr = L/(N−1), node l at r_l = l·Δr.
//! The geometry weight at node l is g_l = r_l^d with d the coordinate
//! exponent (0 planar, 1 cylindrical, 2 spherical). Between two nodes the
//! weight is the average of the two node weights:
//!
//! flux_upper(l) = ½(g_l + g_{l+1}) · D̄ / Δr²
//! flux_lower(l) = ½(g_l + g_{l−1}) · D̄ / Δr²
//!
//! where D̄ is the mean diffusivity of the two nodes.

use log::debug;

use crate::error::{ConfigurationError, Result};
use crate::params::check_positive;
use crate::types::{CoordinateSystem, MicroNodeIndex};

/// Node layout and geometry weights of a microscale mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MicroscaleGeometry {
    num_nodes: usize,
    length: f64,
    coordinates: CoordinateSystem,
    dr: f64,
}

impl MicroscaleGeometry {
    /// Create a geometry. Requires `num_nodes >= 2` and `length > 0`.
    pub fn new(
        object: &'static str,
        num_nodes: usize,
        length: f64,
        coordinates: CoordinateSystem,
    ) -> Result<Self> {
        if num_nodes < 2 {
            return Err(ConfigurationError::OutOfRange {
                object,
                parameter: "num_nodes",
                value: num_nodes as f64,
                expected: "must be >= 2",
            });
        }
        check_positive(object, "micro_length", length)?;
        let dr = length / (num_nodes - 1) as f64;
        debug!("{object}: {num_nodes} nodes over {length} ({coordinates:?}), dr = {dr}");
        Ok(Self {
            num_nodes,
            length,
            coordinates,
            dr,
        })
    }

    /// Resolve a numeric coordinate id (0, 1, 2).
    pub fn coordinates_from_id(object: &'static str, coord_id: u32) -> Result<CoordinateSystem> {
        CoordinateSystem::from_id(coord_id).ok_or(ConfigurationError::OutOfRange {
            object,
            parameter: "coord_id",
            value: coord_id as f64,
            expected: "must be 0, 1, or 2",
        })
    }

    /// Validate a node index against this mesh.
    pub fn node(&self, object: &'static str, node_id: usize) -> Result<MicroNodeIndex> {
        if node_id >= self.num_nodes {
            return Err(ConfigurationError::OutOfRange {
                object,
                parameter: "node_id",
                value: node_id as f64,
                expected: "must be in [0, num_nodes - 1]",
            });
        }
        Ok(MicroNodeIndex::new(node_id))
    }

    /// Upper neighbor of `node`, or an error if it is the last node.
    pub fn upper(&self, object: &'static str, node: MicroNodeIndex) -> Result<MicroNodeIndex> {
        node.upper(self.num_nodes).ok_or_else(|| {
            ConfigurationError::invalid(
                object,
                format!("node {node} has no upper neighbor on {} nodes", self.num_nodes),
            )
        })
    }

    /// Lower neighbor of `node`, or an error if it is node 0.
    pub fn lower(&self, object: &'static str, node: MicroNodeIndex) -> Result<MicroNodeIndex> {
        node.lower().ok_or_else(|| {
            ConfigurationError::invalid(object, format!("node {node} has no lower neighbor"))
        })
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Total length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Coordinate system.
    pub fn coordinates(&self) -> CoordinateSystem {
        self.coordinates
    }

    /// Node spacing Δr.
    pub fn dr(&self) -> f64 {
        self.dr
    }

    /// Radial position of a node.
    #[inline]
    pub fn position(&self, node: MicroNodeIndex) -> f64 {
        node.get() as f64 * self.dr
    }

    /// Geometry weight g_l = r_l^d.
    #[inline]
    pub fn weight(&self, node: MicroNodeIndex) -> f64 {
        self.coordinates.weight(self.position(node))
    }

    /// Capacity weight for time-derivative terms.
    ///
    /// Node 0 uses r = Δr/2 so cylindrical and spherical centres keep a
    /// positive capacity.
    #[inline]
    pub fn capacity_weight(&self, node: MicroNodeIndex) -> f64 {
        if node.get() == 0 {
            self.coordinates.weight(0.5 * self.dr)
        } else {
            self.weight(node)
        }
    }

    /// Interface weight between `node` and its upper neighbor.
    #[inline]
    pub fn upper_weight(&self, node: MicroNodeIndex) -> f64 {
        let next = MicroNodeIndex::new(node.get() + 1);
        0.5 * (self.weight(node) + self.weight(next))
    }

    /// Interface weight between `node` and its lower neighbor (0 at node 0).
    #[inline]
    pub fn lower_weight(&self, node: MicroNodeIndex) -> f64 {
        match node.lower() {
            Some(prev) => 0.5 * (self.weight(node) + self.weight(prev)),
            None => 0.0,
        }
    }

    /// Flux coefficient to the upper neighbor for diffusivities `d_self`, `d_upper`.
    #[inline]
    pub fn upper_flux(&self, node: MicroNodeIndex, d_self: f64, d_upper: f64) -> f64 {
        self.upper_weight(node) * 0.5 * (d_self + d_upper) / (self.dr * self.dr)
    }

    /// Flux coefficient to the lower neighbor for diffusivities `d_self`, `d_lower`.
    #[inline]
    pub fn lower_flux(&self, node: MicroNodeIndex, d_self: f64, d_lower: f64) -> f64 {
        self.lower_weight(node) * 0.5 * (d_self + d_lower) / (self.dr * self.dr)
    }

    /// Trapezoid quadrature weights for ∫ f(r) r^d dr over [0, L].
    pub fn integration_weights(&self) -> Vec<f64> {
        (0..self.num_nodes)
            .map(|l| {
                let node = MicroNodeIndex::new(l);
                let end = l == 0 || l + 1 == self.num_nodes;
                let h = if end { 0.5 * self.dr } else { self.dr };
                h * self.weight(node)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-14;

    #[test]
    fn test_planar_weights_are_one() {
        let g = MicroscaleGeometry::new("Test", 6, 2.0, CoordinateSystem::Planar).unwrap();
        for l in 0..6 {
            assert!((g.weight(MicroNodeIndex::new(l)) - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn test_spherical_weight() {
        let g = MicroscaleGeometry::new("Test", 5, 1.0, CoordinateSystem::Spherical).unwrap();
        assert!((g.dr() - 0.25).abs() < TOL);
        assert!((g.weight(MicroNodeIndex::new(2)) - 0.25).abs() < TOL);
        assert!((g.capacity_weight(MicroNodeIndex::new(0)) - 0.015625).abs() < TOL);
    }

    #[test]
    fn test_flux_coefficients() {
        // cylindrical, dr = 0.5: g1 = 0.5, g2 = 1.0 → upper weight 0.75
        let g = MicroscaleGeometry::new("Test", 3, 1.0, CoordinateSystem::Cylindrical).unwrap();
        let node = MicroNodeIndex::new(1);
        assert!((g.upper_flux(node, 1.0, 3.0) - 0.75 * 2.0 / 0.25).abs() < TOL);
        assert!((g.lower_flux(node, 1.0, 1.0) - 0.25 / 0.25).abs() < TOL);
    }

    #[test]
    fn test_construction_errors() {
        assert!(MicroscaleGeometry::new("Test", 1, 1.0, CoordinateSystem::Planar).is_err());
        assert!(MicroscaleGeometry::new("Test", 3, 0.0, CoordinateSystem::Planar).is_err());
        let g = MicroscaleGeometry::new("Test", 3, 1.0, CoordinateSystem::Planar).unwrap();
        assert!(g.node("Test", 3).is_err());
        let last = g.node("Test", 2).unwrap();
        assert!(g.upper("Test", last).is_err());
        assert!(g.lower("Test", MicroNodeIndex::new(0)).is_err());
        assert!(MicroscaleGeometry::coordinates_from_id("Test", 3).is_err());
    }

    #[test]
    fn test_integration_weights_planar() {
        let g = MicroscaleGeometry::new("Test", 5, 1.0, CoordinateSystem::Planar).unwrap();
        let total: f64 = g.integration_weights().iter().sum();
        assert!((total - 1.0).abs() < TOL);
    }
}

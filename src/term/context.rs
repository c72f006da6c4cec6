//! Per-point evaluation contexts supplied by the host.
//!
//! A context is built fresh for every evaluation call and borrowed by the
//! term for the duration of that call only. Terms never store a context.

use nalgebra::Vector3;

use crate::types::{FieldId, PostprocessorId};

/// State of one field at one quadrature point (or node).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldValue {
    /// Current value
    pub value: f64,
    /// Value at the previous time step
    pub old: f64,
    /// Spatial gradient
    pub gradient: Vector3<f64>,
    /// Time derivative
    pub dot: f64,
}

impl FieldValue {
    /// A field with a value and zero gradient.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            old: value,
            gradient: Vector3::zeros(),
            dot: 0.0,
        }
    }

    /// Set the gradient.
    pub fn with_gradient(mut self, gradient: Vector3<f64>) -> Self {
        self.gradient = gradient;
        self
    }

    /// Set the old value.
    pub fn with_old(mut self, old: f64) -> Self {
        self.old = old;
        self
    }

    /// Set the time derivative.
    pub fn with_dot(mut self, dot: f64) -> Self {
        self.dot = dot;
        self
    }
}

/// Anything that exposes a per-point field table.
pub trait FieldSource {
    /// All field values at this point, indexed by [`FieldId`].
    fn fields(&self) -> &[FieldValue];

    /// Postprocessor values, indexed by [`PostprocessorId`].
    fn postprocessors(&self) -> &[f64];

    /// Value of one field.
    #[inline]
    fn field(&self, id: FieldId) -> &FieldValue {
        &self.fields()[id]
    }

    /// Value of one postprocessor.
    #[inline]
    fn postprocessor(&self, id: PostprocessorId) -> f64 {
        self.postprocessors()[id]
    }
}

/// Context for volumetric and integrated-boundary term evaluation.
///
/// Provides everything needed to evaluate one term at one quadrature point
/// for one (test, trial) function pair.
#[derive(Clone, Copy, Debug)]
pub struct QpContext<'a> {
    /// All field values at this point
    pub fields: &'a [FieldValue],
    /// Postprocessor values
    pub postprocessors: &'a [f64],
    /// Test function value ψ_i
    pub test: f64,
    /// Test function gradient ∇ψ_i
    pub grad_test: Vector3<f64>,
    /// Trial (shape) function value φ_j
    pub phi: f64,
    /// Trial function gradient ∇φ_j
    pub grad_phi: Vector3<f64>,
    /// Current simulation time
    pub time: f64,
    /// Current time step size
    pub dt: f64,
    /// Derivative of a field's time derivative with respect to its value
    pub du_dot_du: f64,
    /// Physical position of the point
    pub position: Vector3<f64>,
    /// Outward unit normal (zero for volumetric points)
    pub normal: Vector3<f64>,
}

impl<'a> QpContext<'a> {
    /// Create a context with unit test/trial functions and zero gradients.
    pub fn new(fields: &'a [FieldValue]) -> Self {
        Self {
            fields,
            postprocessors: &[],
            test: 1.0,
            grad_test: Vector3::zeros(),
            phi: 1.0,
            grad_phi: Vector3::zeros(),
            time: 0.0,
            dt: 1.0,
            du_dot_du: 1.0,
            position: Vector3::zeros(),
            normal: Vector3::zeros(),
        }
    }

    /// Set the test function value and gradient.
    pub fn with_test(mut self, test: f64, grad_test: Vector3<f64>) -> Self {
        self.test = test;
        self.grad_test = grad_test;
        self
    }

    /// Set the trial function value and gradient.
    pub fn with_trial(mut self, phi: f64, grad_phi: Vector3<f64>) -> Self {
        self.phi = phi;
        self.grad_phi = grad_phi;
        self
    }

    /// Set time and step size; `du_dot_du` becomes the implicit-Euler `1/dt`.
    pub fn with_time(mut self, time: f64, dt: f64) -> Self {
        self.time = time;
        self.dt = dt;
        if dt > 0.0 {
            self.du_dot_du = 1.0 / dt;
        }
        self
    }

    /// Override `du_dot_du` for other time integrators.
    pub fn with_du_dot_du(mut self, du_dot_du: f64) -> Self {
        self.du_dot_du = du_dot_du;
        self
    }

    /// Set postprocessor values.
    pub fn with_postprocessors(mut self, postprocessors: &'a [f64]) -> Self {
        self.postprocessors = postprocessors;
        self
    }

    /// Set the outward normal (boundary points).
    pub fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = normal;
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Same context over a different field table.
    pub fn with_fields(mut self, fields: &'a [FieldValue]) -> Self {
        self.fields = fields;
        self
    }
}

impl FieldSource for QpContext<'_> {
    #[inline]
    fn fields(&self) -> &[FieldValue] {
        self.fields
    }

    #[inline]
    fn postprocessors(&self) -> &[f64] {
        self.postprocessors
    }
}

/// Context for auxiliary evaluators and initial conditions.
#[derive(Clone, Copy, Debug)]
pub struct AuxContext<'a> {
    /// All field values at this point
    pub fields: &'a [FieldValue],
    /// Postprocessor values
    pub postprocessors: &'a [f64],
    /// Current simulation time
    pub time: f64,
    /// Current time step size
    pub dt: f64,
    /// Physical position
    pub position: Vector3<f64>,
    /// Current value of the auxiliary variable being computed
    pub current: f64,
    /// Value of the auxiliary variable at the previous step
    pub old: f64,
}

impl<'a> AuxContext<'a> {
    /// Create a context at time zero.
    pub fn new(fields: &'a [FieldValue]) -> Self {
        Self {
            fields,
            postprocessors: &[],
            time: 0.0,
            dt: 1.0,
            position: Vector3::zeros(),
            current: 0.0,
            old: 0.0,
        }
    }

    /// Set time and step size.
    pub fn with_time(mut self, time: f64, dt: f64) -> Self {
        self.time = time;
        self.dt = dt;
        self
    }

    /// Set current and old values of the auxiliary variable.
    pub fn with_current(mut self, current: f64, old: f64) -> Self {
        self.current = current;
        self.old = old;
        self
    }

    /// Set postprocessor values.
    pub fn with_postprocessors(mut self, postprocessors: &'a [f64]) -> Self {
        self.postprocessors = postprocessors;
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }
}

impl FieldSource for AuxContext<'_> {
    #[inline]
    fn fields(&self) -> &[FieldValue] {
        self.fields
    }

    #[inline]
    fn postprocessors(&self) -> &[f64] {
        self.postprocessors
    }
}

/// Which side of an interface a residual belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The primary subdomain
    Element,
    /// The subdomain across the interface
    Neighbor,
}

/// Jacobian block of an interface term: (test side, trial side).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JacobianBlock {
    /// Element residual w.r.t. element variable
    ElementElement,
    /// Element residual w.r.t. neighbor variable
    ElementNeighbor,
    /// Neighbor residual w.r.t. element variable
    NeighborElement,
    /// Neighbor residual w.r.t. neighbor variable
    NeighborNeighbor,
}

impl JacobianBlock {
    /// All four blocks.
    pub const ALL: [JacobianBlock; 4] = [
        JacobianBlock::ElementElement,
        JacobianBlock::ElementNeighbor,
        JacobianBlock::NeighborElement,
        JacobianBlock::NeighborNeighbor,
    ];

    /// Side whose test function multiplies this block.
    pub fn test_side(self) -> Side {
        match self {
            Self::ElementElement | Self::ElementNeighbor => Side::Element,
            Self::NeighborElement | Self::NeighborNeighbor => Side::Neighbor,
        }
    }

    /// Side whose trial function this block differentiates against.
    pub fn trial_side(self) -> Side {
        match self {
            Self::ElementElement | Self::NeighborElement => Side::Element,
            Self::ElementNeighbor | Self::NeighborNeighbor => Side::Neighbor,
        }
    }
}

/// Context for interface terms on a shared boundary between two subdomains.
#[derive(Clone, Copy, Debug)]
pub struct InterfaceContext<'a> {
    /// Field values on the element side
    pub element_fields: &'a [FieldValue],
    /// Field values on the neighbor side
    pub neighbor_fields: &'a [FieldValue],
    /// Element-side test function value
    pub test: f64,
    /// Neighbor-side test function value
    pub test_neighbor: f64,
    /// Element-side trial function value
    pub phi: f64,
    /// Neighbor-side trial function value
    pub phi_neighbor: f64,
    /// Current simulation time
    pub time: f64,
    /// Outward normal from the element side
    pub normal: Vector3<f64>,
}

impl<'a> InterfaceContext<'a> {
    /// Create an interface context with unit test/trial functions.
    pub fn new(element_fields: &'a [FieldValue], neighbor_fields: &'a [FieldValue]) -> Self {
        Self {
            element_fields,
            neighbor_fields,
            test: 1.0,
            test_neighbor: 1.0,
            phi: 1.0,
            phi_neighbor: 1.0,
            time: 0.0,
            normal: Vector3::zeros(),
        }
    }

    /// Set test function values on both sides.
    pub fn with_test(mut self, test: f64, test_neighbor: f64) -> Self {
        self.test = test;
        self.test_neighbor = test_neighbor;
        self
    }

    /// Set trial function values on both sides.
    pub fn with_trial(mut self, phi: f64, phi_neighbor: f64) -> Self {
        self.phi = phi;
        self.phi_neighbor = phi_neighbor;
        self
    }

    /// Field table of one side.
    #[inline]
    pub fn side_fields(&self, side: Side) -> &'a [FieldValue] {
        match side {
            Side::Element => self.element_fields,
            Side::Neighbor => self.neighbor_fields,
        }
    }

    /// Test function of one side.
    #[inline]
    pub fn side_test(&self, side: Side) -> f64 {
        match side {
            Side::Element => self.test,
            Side::Neighbor => self.test_neighbor,
        }
    }

    /// Trial function of one side.
    #[inline]
    pub fn side_phi(&self, side: Side) -> f64 {
        match side {
            Side::Element => self.phi,
            Side::Neighbor => self.phi_neighbor,
        }
    }
}

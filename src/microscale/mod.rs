//! Microscale diffusion stencil over a fictitious 1-D mesh.
//!
//! Each microscale node is a separate field on the real mesh; the stencil
//! only supplies geometry weights and neighbor bookkeeping, computed once
//! at construction.

mod geometry;

pub use geometry::MicroscaleGeometry;

//! # Miller Module
//!
//! Crystallographic planes: solving `(h k l)` into a normal and spacing, cutting
//! the plane to a finite polygon, and picking the atoms that lie on it.
//!
//! - [`solver`] - Reciprocal-lattice construction of the plane normal and d-spacing
//! - [`clipper`] - Sutherland–Hodgman section of a plane with an axis-aligned cube
//! - [`membership`] - Atoms within a distance tolerance of a plane

pub mod clipper;
pub mod membership;
pub mod solver;

//! # Workflows Module
//!
//! High-level entry points that tie the geometry routines of [`crate::core`]
//! together for a caller that just wants something to draw.
//!
//! - **Scene Workflow** ([`scene`]) - Atoms, bonds, the unit cell and every requested
//!   Miller plane section for one structure, lattice constant and repeat count.

pub mod scene;

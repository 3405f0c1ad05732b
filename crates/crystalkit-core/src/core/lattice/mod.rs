//! # Lattice Module
//!
//! Real-space geometry of a repeated crystal structure.
//!
//! - [`points`] - Expands a basis over a `repeat³` block of cells, merging shared sites
//! - [`bonds`] - Connects atoms closer than a structure-specific first-shell cutoff
//! - [`unit_cell`] - Corners and wireframe edges of the conventional cell
//!
//! Every routine is a pure function of its inputs; the builders can be called
//! concurrently from any number of threads.

pub mod bonds;
pub mod points;
pub mod unit_cell;

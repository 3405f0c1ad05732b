//! # Core Module
//!
//! The stateless geometry kernel of crystalkit.
//!
//! ## Overview
//!
//! Given a structure definition (a fractional basis, three lattice vectors and a
//! lattice constant), the core module builds everything a crystal viewer draws:
//! the repeated point set, the bonds between nearest neighbours, the unit cell
//! wireframe and any number of Miller planes sectioned to a bounding box.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Structures, atoms, bonds, planes and polygons
//! - **Built-in Structures** ([`catalog`]) - Static table of common cubic and hexagonal lattices
//! - **Structure Files** ([`io`]) - TOML loader for user-defined structures
//! - **Real-space Geometry** ([`lattice`]) - Point sets, bonds and unit cells
//! - **Planes** ([`miller`]) - Plane solving, clipping and atom membership
//! - **Vector Math** ([`utils`]) - Small helpers over `nalgebra` vectors
//!
//! Every routine takes its inputs by reference and returns freshly allocated
//! values, so all of them are safe to call concurrently.

pub mod catalog;
pub mod io;
pub mod lattice;
pub mod miller;
pub mod models;
pub mod utils;

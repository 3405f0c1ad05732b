//! # Core Models Module
//!
//! Plain value types exchanged between the geometry routines and their callers.
//!
//! ## Overview
//!
//! Every model here is produced fresh by a pure function call and owns its data;
//! there are no back-references between entities and nothing is mutated after
//! construction. This keeps each routine re-entrant and lets callers memoize on
//! their inputs if they wish.
//!
//! ## Key Components
//!
//! - [`structure`] - Structure definitions: basis, lattice vectors, default constant
//! - [`atom`] - Generated lattice sites and the bonds between them
//! - [`plane`] - Miller indices, solved planes and clipped plane polygons
//!
//! ## Usage
//!
//! ```ignore
//! use crystalkit::core::models::structure::{BasisAtom, LatticeVectors, Structure};
//!
//! let structure = Structure {
//!     id: "bcc".to_string(),
//!     name: "Body-centred cubic".to_string(),
//!     basis: vec![BasisAtom::new(0.0, 0.0, 0.0), BasisAtom::new(0.5, 0.5, 0.5)],
//!     vectors: LatticeVectors::cubic(),
//!     default_lattice_constant: 2.87,
//! };
//! structure.validate(1e-9)?;
//! ```

pub mod atom;
pub mod plane;
pub mod structure;

//! # I/O Module
//!
//! Read-only loaders for user-supplied structure definitions.
//!
//! The built-in structures live in [`crate::core::catalog`]; this module lets a
//! caller layer additional definitions from a TOML file over them. Nothing in
//! the kernel writes files.
//!
//! ```toml
//! [[structure]]
//! id = "cscl"
//! name = "Caesium chloride"
//! default-lattice-constant = 4.12
//! vectors = [[1, 0, 0], [0, 1, 0], [0, 0, 1]]
//! basis = [
//!     { position = [0.0, 0.0, 0.0], species = "Cs" },
//!     { position = [0.5, 0.5, 0.5], species = "Cl" },
//! ]
//! ```

pub mod structures;

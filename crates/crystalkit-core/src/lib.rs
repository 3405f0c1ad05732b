//! # crystalkit
//!
//! A geometry kernel for crystal-lattice visualisation: repeated point sets,
//! nearest-neighbour bonds, unit cell wireframes and Miller planes sectioned to
//! a bounding box.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Atom`,
//!   `Plane`), the built-in structure catalog, and the pure geometry routines
//!   (`lattice`, `miller`).
//!
//! - **[`engine`]: Settings and Errors.** The [`engine::config::KernelConfig`] that
//!   every tolerance-dependent routine accepts, and the aggregate
//!   [`engine::error::KernelError`].
//!
//! - **[`workflows`]: The Public API.** [`workflows::scene::build`] runs the full
//!   pipeline for a structure and a list of Miller indices.
//!
//! Nothing in the library holds mutable shared state; every call is re-entrant.

pub mod core;
pub mod engine;
pub mod workflows;

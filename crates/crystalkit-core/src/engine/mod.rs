//! # Engine Module
//!
//! Run-wide settings and the aggregate error type shared by the workflows.
//!
//! - **Configuration** ([`config`]) - Numeric tolerances of every geometry routine,
//!   with a validating builder and a TOML loader
//! - **Error Handling** ([`error`]) - [`error::KernelError`], which every lower-level
//!   error converts into

pub mod config;
pub mod error;

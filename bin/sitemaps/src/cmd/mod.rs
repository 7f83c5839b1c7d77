//! CLI command implementations.

pub mod build;
pub mod check;
pub mod index;

//! Replacement-track assembly.

pub mod assembler;

pub use assembler::{assemble, GapPolicy};

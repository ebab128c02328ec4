//! API documentation assembly.

pub mod assembler;

pub use assembler::assemble;

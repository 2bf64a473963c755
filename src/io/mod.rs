//! File input and output.

pub mod wav;

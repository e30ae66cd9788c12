//! Network implementations.

pub mod classification;

pub use classification::*;

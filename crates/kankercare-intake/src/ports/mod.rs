//! Ports module (Hexagonal Architecture)
//!
//! Interfaces the submission pipeline needs from external sinks.

pub mod outbound;

pub use outbound::*;

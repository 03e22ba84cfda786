//! # Domain Layer
//!
//! Core definitions shared by every other layer: configuration, the parsed
//! command type, and the chat platform trait.

pub mod config;
pub mod traits;
pub mod types;

//! # Strings Module
//!
//! Centralizes user-facing text so wording lives in one place.

pub mod help;
pub mod messages;

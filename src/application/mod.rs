//! # Application Layer
//!
//! The relay core: access gating, command routing, response formatting, and
//! delivery planning. Nothing in here touches a platform SDK directly.

pub mod access;
pub mod delivery;
pub mod formatter;
pub mod router;

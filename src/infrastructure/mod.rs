//! # Infrastructure Layer
//!
//! Adapters for the outside world: the Discord gateway and the automation
//! webhook.

pub mod discord;
pub mod webhook;

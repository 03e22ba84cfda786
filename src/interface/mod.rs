//! # Interface Layer
//!
//! Handlers for the commands answered locally, without the relay.

pub mod commands;

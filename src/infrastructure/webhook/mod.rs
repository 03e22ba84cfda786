//! # Webhook Infrastructure
//!
//! Everything needed to call the automation endpoint: token signing and the
//! authenticated HTTP relay.

pub mod client;
pub mod error;
pub mod token;

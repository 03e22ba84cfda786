//! # Commands Module

pub mod help;
pub mod misc;

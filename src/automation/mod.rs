//! Click automation core.
//!
//! This module provides:
//! - Synthetic input sequences for a logical click (`input`)
//! - The OS input facilities seam and its Win32 implementation (`platform`)
//! - State shared between the UI and the worker (`state`)
//! - The background click worker (`worker`)

pub mod input;
pub mod platform;
pub mod state;
pub mod worker;

pub use platform::default_backend;

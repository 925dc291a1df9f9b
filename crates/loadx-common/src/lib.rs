//! Common utilities for loadx
//!
//! This crate provides the error type shared by the driver adapter and the
//! Python extension.

pub mod error;

pub use error::{BridgeError, Result};

//! Common crate
//!
//! Shared error handling for the Floe connector crates.

pub mod error;

pub use error::{Error, Result};

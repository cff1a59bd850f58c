//! Core configuration and error types shared across the zbx-bootstrap crates

pub mod config;
pub mod error;

pub use config::*;
pub use error::*;

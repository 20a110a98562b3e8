//! Stacks Tag Core - Foundational Types
//!
//! Error taxonomy, configuration and platform types shared by the
//! tagging runtime and the `stacks-tag` CLI.

pub mod config;
pub mod error;
pub mod platform;

// Re-export commonly used types
pub use config::{ImageConfig, TaggingConfig};
pub use error::{Result, TagError};
pub use platform::Platform;

/// Stacks Tag version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

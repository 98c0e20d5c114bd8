//! Shared building blocks: configuration and non-empty lists.

pub mod config;
pub mod nonempty;

pub use config::{ClientConfig, ConfigError};
pub use nonempty::NonEmpty;

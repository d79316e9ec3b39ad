//! # Suggester Config
//!
//! Type-safe bot configuration for the Suggester bot.
//!
//! This crate loads the process-wide settings file (token, owner and global
//! staff lists, display palette, control emojis, store location, logging)
//! with environment overrides and validation. Per-server settings live in
//! the document store and are handled by `suggester-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::*;

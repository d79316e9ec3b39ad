//! # Suggester Bot
//!
//! Discord bot for submitting, reviewing and tracking community suggestions.
//!
//! This is the binary crate that wires the configuration, the document store
//! and the localized catalog into the Poise framework and runs the gateway
//! client until shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;

pub use bot::*;
pub use error::*;

//! # Suggester Commands
//!
//! Discord command and event handling for the Suggester bot, built on Poise.
//!
//! The `config` command parses its arguments into a [`config::parse::ConfigCommand`]
//! and applies it to a guild snapshot through [`config::execute::execute`], so the
//! settings logic is testable without a gateway connection. Reaction events
//! refresh feed posts through [`feed::update_feed_message`].

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod convert;
pub mod directory;
pub mod events;
pub mod feed;
pub mod framework;
pub mod permissions;
pub mod reply;

pub use context::{CommandError, Context, Data};
pub use framework::{commands, create_framework, on_error};
pub use permissions::PermissionLevel;
pub use reply::Reply;

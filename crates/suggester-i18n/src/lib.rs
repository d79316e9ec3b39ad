//! Internationalization support for the Suggester bot
//!
//! Every user-visible string lives in `locales/<tag>/main.ftl`. The build
//! script validates those files and embeds them, so [`Catalog::bundled`]
//! needs no file access at runtime.
//!
//! # Example
//!
//! ```rust
//! use suggester_i18n::{args, Catalog, Locale};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::bundled(&Locale::default())?;
//! let footer = catalog.format(
//!     &Locale::default(),
//!     "suggestion-footer",
//!     &args!["id" => 42],
//! );
//! assert_eq!(footer, "Suggestion ID: 42");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod locale;

pub use catalog::{Catalog, MessageArgs, BUNDLED_LOCALES};
pub use error::{I18nError, I18nResult};
pub use locale::{Locale, DEFAULT_LOCALE};

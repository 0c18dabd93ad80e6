//! Loading of hexagonal factory descriptions.
//!
//! [`load`], [`load_str`] and [`load_file`] turn the line-oriented text
//! format described in [`loader`] into a validated
//! [`GameGrid`](lms_core::grid::GameGrid) with its chains attached.
//! [`GameLoader`] runs the same pipeline with a custom [`LoaderConfig`].

pub mod config;
pub mod error;
pub mod loader;

pub use config::{ConfigError, LoaderConfig};
pub use error::{FormatError, LoadError};
pub use loader::{GameLoader, load, load_file, load_str};

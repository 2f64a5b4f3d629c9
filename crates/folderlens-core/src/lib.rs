//! FolderLens Core — error type, configuration, shared result alias.

pub mod config;
pub mod error;

pub use config::{DataPaths, FolderLensConfig};
pub use error::{Error, Result};

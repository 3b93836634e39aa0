//! Firmware resource manifest generation.
//!
//! Scans a directory for firmware images and writes a Qt `.qrc` file
//! that references each one under a fixed root prefix.

pub mod config;
pub mod discover;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod writer;

pub use config::{GeneratorConfig, DEFAULT_OUTPUT, DEFAULT_PATTERN, DEFAULT_RESOURCE_PREFIX, DEFAULT_ROOT_PREFIX};
pub use discover::discover;
pub use error::{ManifestError, ManifestResult};
pub use generator::{CheckOutcome, GenerateReport, Generator};
pub use manifest::{Manifest, ManifestEntry};
pub use writer::ManifestWriter;

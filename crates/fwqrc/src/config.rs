//! Generator Configuration
//!
//! Optional JSON settings layered under command-line flags. Every field
//! left unset falls back to the historical script behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ManifestError, ManifestResult};
use crate::generator::Generator;

/// Glob matched relative to the base directory.
pub const DEFAULT_PATTERN: &str = "*/*.bin";

/// Manifest file name, written inside the base directory.
pub const DEFAULT_OUTPUT: &str = "res_fw.qrc";

/// Root prefix the existing `res_fw.qrc` consumers were generated with.
pub const DEFAULT_ROOT_PREFIX: &str = r"D:\WorkLoad\Robotics\VESC\vesc_tool\res/firmwares/";

pub const DEFAULT_RESOURCE_PREFIX: &str = "/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub dir: Option<PathBuf>,
    pub pattern: Option<String>,
    pub root_prefix: Option<String>,
    pub resource_prefix: Option<String>,
    pub output: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Read a JSON config file. Relative paths inside it are taken as-is,
    /// i.e. relative to the working directory of the process.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        let config = Self::from_json(&content).map_err(|source| ManifestError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded generator config from {:?}", path);
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: GeneratorConfig) -> Self {
        Self {
            dir: overrides.dir.or(self.dir),
            pattern: overrides.pattern.or(self.pattern),
            root_prefix: overrides.root_prefix.or(self.root_prefix),
            resource_prefix: overrides.resource_prefix.or(self.resource_prefix),
            output: overrides.output.or(self.output),
        }
    }

    /// Resolve defaults and build the generator.
    pub fn into_generator(self) -> Generator {
        let base_dir = self.dir.unwrap_or_else(|| PathBuf::from("."));
        let output = self.output.unwrap_or_else(|| base_dir.join(DEFAULT_OUTPUT));

        Generator {
            base_dir,
            pattern: self.pattern.unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            root_prefix: self.root_prefix.unwrap_or_else(|| DEFAULT_ROOT_PREFIX.to_string()),
            resource_prefix: self
                .resource_prefix
                .unwrap_or_else(|| DEFAULT_RESOURCE_PREFIX.to_string()),
            output,
        }
    }
}

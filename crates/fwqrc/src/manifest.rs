//! Manifest Types
//!
//! A discovered firmware path and the `.qrc` document listing them.

use crate::writer::{entry_line, header, FOOTER};

/// One firmware file as found by traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path exactly as the traversal reported it, e.g. `./a/x.bin`.
    pub discovered: String,
    /// Forward-slash path with the leading `./` removed, e.g. `a/x.bin`.
    pub relative: String,
}

impl ManifestEntry {
    pub fn from_discovered(raw: impl Into<String>) -> Self {
        let discovered = raw.into();
        let normalized = discovered.replace('\\', "/");
        let relative = match normalized.strip_prefix("./") {
            Some(rest) => rest.to_string(),
            None => normalized,
        };

        Self { discovered, relative }
    }

    /// Path as written between the `<file>` tags.
    pub fn resource_path(&self, root_prefix: &str) -> String {
        format!("{}{}", root_prefix, self.relative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub root_prefix: String,
    pub resource_prefix: String,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(root_prefix: impl Into<String>, resource_prefix: impl Into<String>) -> Self {
        Self {
            root_prefix: root_prefix.into(),
            resource_prefix: resource_prefix.into(),
            entries: Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = header(&self.resource_prefix);
        for entry in &self.entries {
            out.push_str(&entry_line(&self.root_prefix, entry));
        }
        out.push_str(FOOTER);
        out
    }
}

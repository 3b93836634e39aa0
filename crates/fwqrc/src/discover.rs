//! Firmware Discovery
//!
//! Walks the base directory with `read_dir`, matching each path component
//! of the pattern against entry names. Matches come out in the order the
//! OS lists directory entries, depth first; nothing here sorts or
//! deduplicates.

use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::error::{ManifestError, ManifestResult};
use crate::manifest::ManifestEntry;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    // Hidden files and directories are skipped unless named explicitly.
    require_literal_leading_dot: true,
};

/// One open directory in the walk.
struct Frame {
    dir: PathBuf,
    relative: PathBuf,
    entries: ReadDir,
    depth: usize,
}

/// Lazy iterator over matched entries.
pub struct Discovery {
    components: Vec<Pattern>,
    stack: Vec<Frame>,
}

impl Discovery {
    pub fn new(base_dir: &Path, pattern: &str) -> ManifestResult<Self> {
        let components = pattern
            .split(|c: char| c == '/' || c == MAIN_SEPARATOR)
            .filter(|c| !c.is_empty() && *c != ".")
            .map(Pattern::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ManifestError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;

        let mut stack = Vec::new();
        if !components.is_empty() {
            match fs::read_dir(base_dir) {
                Ok(entries) => stack.push(Frame {
                    dir: base_dir.to_path_buf(),
                    relative: PathBuf::new(),
                    entries,
                    depth: 0,
                }),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Base directory {:?} does not exist", base_dir);
                }
                Err(source) => {
                    return Err(ManifestError::Traverse {
                        path: base_dir.to_path_buf(),
                        source,
                    })
                }
            }
        }

        debug!("Scanning {:?} for {:?}", base_dir, pattern);
        Ok(Self { components, stack })
    }

    fn to_entry(relative: &Path) -> ManifestResult<ManifestEntry> {
        let relative_str = relative
            .to_str()
            .ok_or_else(|| ManifestError::NonUtf8Path(relative.to_path_buf()))?;

        // Re-anchor at "./" so entries look the same whatever the base dir.
        let entry = ManifestEntry::from_discovered(format!(".{}{}", MAIN_SEPARATOR, relative_str));
        debug!("Discovered {}", entry.relative);
        Ok(entry)
    }
}

impl Iterator for Discovery {
    type Item = ManifestResult<ManifestEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let entry = match frame.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(source)) => {
                    return Some(Err(ManifestError::Traverse {
                        path: frame.dir.clone(),
                        source,
                    }))
                }
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            let name = entry.file_name();
            // Names that are not UTF-8 can never match a pattern.
            let Some(name) = name.to_str() else {
                continue;
            };

            let depth = frame.depth;
            if !self.components[depth].matches_with(name, MATCH_OPTIONS) {
                continue;
            }

            let relative = frame.relative.join(name);
            if depth + 1 == self.components.len() {
                return Some(Self::to_entry(&relative));
            }

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match fs::read_dir(&path) {
                Ok(entries) => self.stack.push(Frame {
                    dir: path,
                    relative,
                    entries,
                    depth: depth + 1,
                }),
                Err(source) => return Some(Err(ManifestError::Traverse { path, source })),
            }
        }
    }
}

/// Collect every entry matching `pattern` below `base_dir`.
pub fn discover(base_dir: &Path, pattern: &str) -> ManifestResult<Vec<ManifestEntry>> {
    Discovery::new(base_dir, pattern)?.collect()
}

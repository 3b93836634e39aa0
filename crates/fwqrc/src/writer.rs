//! Streaming `.qrc` writer.
//!
//! Lines are emitted as soon as they are known, so a failed run leaves the
//! partial document on disk.

use std::io::{self, Write};

use crate::manifest::ManifestEntry;

/// Closing lines. No newline after `</RCC>`.
pub const FOOTER: &str = "\t</qresource>\n</RCC>";

pub fn header(resource_prefix: &str) -> String {
    format!("<RCC>\n\t<qresource prefix=\"{}\">\n", resource_prefix)
}

pub fn entry_line(root_prefix: &str, entry: &ManifestEntry) -> String {
    format!("\t\t<file>{}</file>\n", entry.resource_path(root_prefix))
}

pub struct ManifestWriter<'a, W: Write> {
    inner: W,
    root_prefix: &'a str,
    resource_prefix: &'a str,
    entries: usize,
}

impl<'a, W: Write> ManifestWriter<'a, W> {
    pub fn new(inner: W, root_prefix: &'a str, resource_prefix: &'a str) -> Self {
        Self {
            inner,
            root_prefix,
            resource_prefix,
            entries: 0,
        }
    }

    pub fn begin(&mut self) -> io::Result<()> {
        self.inner.write_all(header(self.resource_prefix).as_bytes())
    }

    pub fn entry(&mut self, entry: &ManifestEntry) -> io::Result<()> {
        self.inner
            .write_all(entry_line(self.root_prefix, entry).as_bytes())?;
        self.entries += 1;
        Ok(())
    }

    /// Number of `<file>` lines written so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Write the closing tags, flush, and hand back the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(FOOTER.as_bytes())?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

//! Manifest Generator
//!
//! Runs discovery and writes the `.qrc` document in one pass.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::discover::Discovery;
use crate::error::{ManifestError, ManifestResult};
use crate::manifest::Manifest;
use crate::writer::ManifestWriter;

/// Fully resolved generator settings. Build one through
/// [`GeneratorConfig::into_generator`](crate::GeneratorConfig::into_generator)
/// to get the defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub base_dir: PathBuf,
    pub pattern: String,
    pub root_prefix: String,
    pub resource_prefix: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub entries: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    UpToDate,
    Stale,
    Missing,
}

impl Generator {
    /// Write the manifest to `self.output`, truncating whatever was there.
    ///
    /// The file is opened before discovery starts, and entries are written
    /// as they are found. On error the partial file stays on disk.
    pub fn run(&self) -> ManifestResult<GenerateReport> {
        let file = File::create(&self.output).map_err(|e| ManifestError::io(&self.output, e))?;
        let mut writer = ManifestWriter::new(BufWriter::new(file), &self.root_prefix, &self.resource_prefix);

        writer.begin().map_err(|e| self.output_error(e))?;
        for entry in Discovery::new(&self.base_dir, &self.pattern)? {
            writer.entry(&entry?).map_err(|e| self.output_error(e))?;
        }

        let entries = writer.entries();
        // Explicit flush so a failure surfaces here rather than in Drop.
        writer.finish().map_err(|e| self.output_error(e))?;

        info!("Wrote {} firmware entries to {:?}", entries, self.output);
        Ok(GenerateReport {
            output: self.output.clone(),
            entries,
        })
    }

    pub fn manifest(&self) -> ManifestResult<Manifest> {
        let mut manifest = Manifest::new(self.root_prefix.clone(), self.resource_prefix.clone());
        for entry in Discovery::new(&self.base_dir, &self.pattern)? {
            manifest.entries.push(entry?);
        }
        Ok(manifest)
    }

    /// The document `run` would write, without touching the output file.
    pub fn render(&self) -> ManifestResult<String> {
        Ok(self.manifest()?.render())
    }

    /// Compare the output file against a fresh render.
    pub fn check(&self) -> ManifestResult<CheckOutcome> {
        let expected = self.render()?;
        let current = match fs::read(&self.output) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(CheckOutcome::Missing),
            Err(e) => return Err(ManifestError::io(&self.output, e)),
        };

        if current == expected.as_bytes() {
            debug!("{:?} is up to date", self.output);
            Ok(CheckOutcome::UpToDate)
        } else {
            Ok(CheckOutcome::Stale)
        }
    }

    fn output_error(&self, source: io::Error) -> ManifestError {
        ManifestError::io(&self.output, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use std::path::Path;

    const ROOT: &str = "/opt/vesc_tool/res/firmwares/";

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"\x7fELF").unwrap();
    }

    fn generator_for(dir: &Path) -> Generator {
        GeneratorConfig {
            dir: Some(dir.to_path_buf()),
            root_prefix: Some(ROOT.to_string()),
            ..Default::default()
        }
        .into_generator()
    }

    /// Subdirectory names in the order the OS lists them.
    fn listing_order(root: &Path) -> Vec<String> {
        fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().into_string().unwrap())
            .collect()
    }

    fn file_lines(content: &str) -> Vec<&str> {
        content.lines().filter(|l| l.starts_with("\t\t<file>")).collect()
    }

    #[test]
    fn test_run_writes_one_line_per_firmware() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/x.bin");
        touch(dir.path(), "b/y.bin");

        let generator = generator_for(dir.path());
        let report = generator.run().unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(report.output, dir.path().join("res_fw.qrc"));

        let content = fs::read_to_string(&report.output).unwrap();
        let expected: Vec<String> = listing_order(dir.path())
            .into_iter()
            .map(|d| {
                let file = if d == "a" { "x.bin" } else { "y.bin" };
                format!("\t\t<file>/opt/vesc_tool/res/firmwares/{}/{}</file>", d, file)
            })
            .collect();
        assert_eq!(file_lines(&content), expected);
        assert!(content.starts_with("<RCC>\n\t<qresource prefix=\"/\">\n"));
        assert!(content.ends_with("\t</qresource>\n</RCC>"));
    }

    #[test]
    fn test_run_with_no_matches_writes_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator_for(dir.path());
        generator.run().unwrap();

        let content = fs::read_to_string(&generator.output).unwrap();
        assert_eq!(content, "<RCC>\n\t<qresource prefix=\"/\">\n\t</qresource>\n</RCC>");
    }

    #[test]
    fn test_output_file_is_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/x.bin");
        let generator = generator_for(dir.path());
        generator.run().unwrap();
        generator.run().unwrap();

        let content = fs::read_to_string(&generator.output).unwrap();
        assert_eq!(file_lines(&content).len(), 1);
    }

    #[test]
    fn test_written_order_follows_directory_listing() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid", "beta", "omega", "c"] {
            touch(dir.path(), &format!("{}/f.bin", name));
        }

        let generator = generator_for(dir.path());
        generator.run().unwrap();
        let content = fs::read_to_string(&generator.output).unwrap();

        let expected: Vec<String> = listing_order(dir.path())
            .into_iter()
            .map(|d| format!("\t\t<file>{}{}/f.bin</file>", ROOT, d))
            .collect();
        assert_eq!(file_lines(&content), expected);
        assert_eq!(generator.render().unwrap(), content);
    }

    #[test]
    fn test_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "hw_60/VESC_default.bin");
        touch(dir.path(), "hw_75_300/VESC_default.bin");
        touch(dir.path(), "hw_410/VESC_servoout.bin");

        let generator = generator_for(dir.path());
        generator.run().unwrap();
        let first = fs::read(&generator.output).unwrap();
        generator.run().unwrap();
        let second = fs::read(&generator.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_new_firmware_adds_one_line() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/x.bin");
        touch(dir.path(), "b/y.bin");

        let generator = generator_for(dir.path());
        generator.run().unwrap();
        let before = fs::read_to_string(&generator.output).unwrap();

        touch(dir.path(), "c/z.bin");
        generator.run().unwrap();
        let after = fs::read_to_string(&generator.output).unwrap();

        let before_lines = file_lines(&before);
        let after_lines = file_lines(&after);
        assert_eq!(after_lines.len(), before_lines.len() + 1);
        for line in &before_lines {
            assert!(after_lines.contains(line));
        }
        assert!(after_lines.contains(&"\t\t<file>/opt/vesc_tool/res/firmwares/c/z.bin</file>"));
    }

    #[test]
    fn test_run_truncates_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator_for(dir.path());
        fs::write(&generator.output, "STALE".repeat(1024)).unwrap();

        generator.run().unwrap();
        let content = fs::read_to_string(&generator.output).unwrap();
        assert_eq!(content, "<RCC>\n\t<qresource prefix=\"/\">\n\t</qresource>\n</RCC>");
    }

    #[test]
    fn test_render_matches_written_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/x.bin");
        touch(dir.path(), "b/y.bin");

        let generator = generator_for(dir.path());
        let rendered = generator.render().unwrap();
        assert!(!generator.output.exists());

        generator.run().unwrap();
        assert_eq!(fs::read_to_string(&generator.output).unwrap(), rendered);
    }

    #[test]
    fn test_check_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/x.bin");
        let generator = generator_for(dir.path());

        assert_eq!(generator.check().unwrap(), CheckOutcome::Missing);
        generator.run().unwrap();
        assert_eq!(generator.check().unwrap(), CheckOutcome::UpToDate);

        touch(dir.path(), "b/y.bin");
        assert_eq!(generator.check().unwrap(), CheckOutcome::Stale);
    }

    #[test]
    fn test_unwritable_output_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = generator_for(dir.path());
        generator.output = dir.path().join("missing").join("res_fw.qrc");

        match generator.run() {
            Err(ManifestError::Io { path, .. }) => assert_eq!(path, generator.output),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_pattern_leaves_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = generator_for(dir.path());
        generator.pattern = "*/[.bin".to_string();

        assert!(matches!(generator.run(), Err(ManifestError::Pattern { .. })));
        let partial = fs::read_to_string(&generator.output).unwrap();
        assert!(!partial.ends_with("</RCC>"));
    }
}

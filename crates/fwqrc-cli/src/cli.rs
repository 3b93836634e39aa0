use std::path::PathBuf;

use clap::Parser;
use fwqrc::GeneratorConfig;

/// Generate the firmware `.qrc` resource manifest.
///
/// With no arguments, scans `*/*.bin` below the current directory and
/// writes `res_fw.qrc` next to them.
#[derive(Parser, Debug)]
#[command(name = "fwqrc", version)]
pub struct Args {
    /// Directory to scan
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Glob relative to the scan directory
    #[arg(short, long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Prefix prepended to every file path in the manifest
    #[arg(short, long = "root", value_name = "PREFIX")]
    pub root_prefix: Option<String>,

    /// Value of the qresource `prefix` attribute
    #[arg(long, value_name = "PREFIX")]
    pub resource_prefix: Option<String>,

    /// Output file [default: <DIR>/res_fw.qrc]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// JSON config file; flags take precedence over its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the manifest to stdout instead of writing it
    #[arg(long, conflicts_with = "check")]
    pub stdout: bool,

    /// Exit with status 1 if the output file is missing or out of date
    #[arg(long)]
    pub check: bool,
}

impl Args {
    /// Settings given on the command line, to be layered over the config file.
    pub fn overrides(&self) -> GeneratorConfig {
        GeneratorConfig {
            dir: self.dir.clone(),
            pattern: self.pattern.clone(),
            root_prefix: self.root_prefix.clone(),
            resource_prefix: self.resource_prefix.clone(),
            output: self.output.clone(),
        }
    }
}

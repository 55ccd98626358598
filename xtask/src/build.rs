//! Runtime archive build.

use crate::cargo::CargoCommand;
use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Build result containing paths to built artifacts.
#[derive(Debug)]
pub struct BuildResult {
    /// Path to the static archive the compiler links against.
    pub archive: PathBuf,
}

/// Options forwarded to the runtime package build.
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Build in release mode.
    pub release: bool,
    /// Leave out the `main` entry glue.
    pub no_entry: bool,
    /// Import the generated routine as `__MiniJava_Main__`.
    pub firm_main: bool,
    /// Abort on stdio and allocation failures.
    pub strict: bool,
    /// Log runtime lifecycle events to stderr.
    pub trace: bool,
}

impl BuildOptions {
    /// Cargo features for the runtime package.
    fn features(&self) -> Vec<String> {
        let mut features = Vec::new();
        if !self.no_entry {
            features.push("entry".to_string());
            if self.firm_main {
                features.push("firm-main".to_string());
            }
        }
        if self.strict {
            features.push("strict".to_string());
        }
        if self.trace {
            features.push("trace".to_string());
        }
        features
    }
}

/// Build the runtime archive, returning the path to `libmjrt.a`.
pub fn build(config: &Config, options: &BuildOptions) -> Result<BuildResult> {
    let package = config.runtime_package.as_str();
    let features = options.features();

    println!("Building {package} (features: {})", features.join(", "));

    CargoCommand {
        release: options.release,
        features,
        no_default_features: true,
        ..CargoCommand::new("build").package(package)
    }
    .run(config)?;

    let archive = config.archive_path(options.release);

    if !archive.exists() {
        anyhow::bail!("Built archive not found at: {}", archive.display());
    }

    Ok(BuildResult { archive })
}

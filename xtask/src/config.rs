//! Configuration loading from workspace metadata.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// `[workspace.metadata.mjrt]` from the root Cargo.toml.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MjrtMetadata {
    /// Package that produces the runtime archive.
    runtime_package: Option<String>,
    /// Package holding the end-to-end scenarios.
    scenario_package: Option<String>,
    /// Crates whose unit tests run on the host.
    #[serde(default)]
    host_crates: Vec<String>,
}

/// Workspace configuration.
#[derive(Debug, Deserialize)]
struct WorkspaceConfig {
    workspace: WorkspaceSection,
}

#[derive(Debug, Deserialize)]
struct WorkspaceSection {
    metadata: Option<MetadataSection>,
}

#[derive(Debug, Deserialize)]
struct MetadataSection {
    mjrt: Option<MjrtMetadata>,
}

/// Build configuration for xtask commands.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace_root: PathBuf,
    /// Target directory for build artifacts.
    pub target_dir: PathBuf,
    /// Package that produces `libmjrt.a`.
    pub runtime_package: String,
    /// Package holding the end-to-end scenarios.
    pub scenario_package: String,
    /// Crates tested with `cargo test -p` on the host.
    pub host_crates: Vec<String>,
}

impl Config {
    /// Load configuration from workspace.
    pub fn load() -> Result<Self> {
        let workspace_root = find_workspace_root()?;
        let cargo_toml = workspace_root.join("Cargo.toml");
        let content = std::fs::read_to_string(&cargo_toml)
            .with_context(|| format!("Failed to read {}", cargo_toml.display()))?;
        Self::from_manifest(workspace_root, &content)
    }

    /// Build configuration from the contents of the root Cargo.toml.
    fn from_manifest(workspace_root: PathBuf, content: &str) -> Result<Self> {
        let config: WorkspaceConfig =
            toml::from_str(content).context("Failed to parse Cargo.toml")?;

        let meta = config.workspace.metadata.and_then(|m| m.mjrt);
        let (runtime_package, scenario_package, host_crates) = match meta {
            Some(m) => (m.runtime_package, m.scenario_package, m.host_crates),
            None => (None, None, Vec::new()),
        };

        let target_dir = workspace_root.join("target");

        Ok(Self {
            workspace_root,
            target_dir,
            runtime_package: runtime_package.unwrap_or_else(|| "mjrt".to_string()),
            scenario_package: scenario_package.unwrap_or_else(|| "mjrt-scenarios".to_string()),
            host_crates,
        })
    }

    /// Path of the runtime archive for the given profile.
    pub fn archive_path(&self, release: bool) -> PathBuf {
        let profile = if release { "release" } else { "debug" };
        let lib = self.runtime_package.replace('-', "_");
        self.target_dir.join(profile).join(format!("lib{lib}.a"))
    }
}

/// Find the workspace root by looking for Cargo.toml with [workspace].
fn find_workspace_root() -> Result<PathBuf> {
    let mut dir = std::env::current_dir().context("Failed to get current directory")?;

    loop {
        let cargo_toml = dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml)?;
            if content.contains("[workspace]") {
                return Ok(dir);
            }
        }

        if !dir.pop() {
            anyhow::bail!("Could not find workspace root (no Cargo.toml with [workspace] found)");
        }
    }
}

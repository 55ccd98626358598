//! Common cargo invocation for the runtime workspace.

use crate::config::Config;
use anyhow::{Context, Result};
use xshell::{Shell, cmd};

/// Arguments common to the host-toolchain cargo commands.
pub struct CargoCommand {
    /// Cargo subcommand: "build", "test", "check", "clippy", "doc".
    pub subcommand: String,
    /// Package to operate on (-p flag). If `None`, no -p is passed.
    pub package: Option<String>,
    /// Whether to pass --release.
    pub release: bool,
    /// Cargo features to enable (`--features`).
    pub features: Vec<String>,
    /// Whether to pass --no-default-features.
    pub no_default_features: bool,
    /// Extra arguments appended after `--`.
    pub extra_args: Vec<String>,
}

impl CargoCommand {
    /// A bare `cargo <subcommand>` with no package or flags.
    pub fn new(subcommand: &str) -> Self {
        Self {
            subcommand: subcommand.into(),
            package: None,
            release: false,
            features: Vec::new(),
            no_default_features: false,
            extra_args: Vec::new(),
        }
    }

    /// Restrict the command to one package.
    pub fn package(mut self, package: &str) -> Self {
        self.package = Some(package.into());
        self
    }

    /// The full argument list passed to `cargo`.
    fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![self.subcommand.clone()];

        if let Some(ref pkg) = self.package {
            args.push("-p".into());
            args.push(pkg.clone());
        }

        if self.no_default_features {
            args.push("--no-default-features".into());
        }

        if !self.features.is_empty() {
            args.push("--features".into());
            args.push(self.features.join(","));
        }

        if self.release {
            args.push("--release".into());
        }

        if !self.extra_args.is_empty() {
            args.push("--".into());
            args.extend(self.extra_args.clone());
        }

        args
    }

    /// Execute the cargo command from the workspace root.
    pub fn run(&self, config: &Config) -> Result<()> {
        let sh = Shell::new()?;
        sh.change_dir(&config.workspace_root);

        let args = self.args();
        cmd!(sh, "cargo {args...}")
            .run()
            .with_context(|| format!("cargo {} failed", self.subcommand))?;

        Ok(())
    }
}

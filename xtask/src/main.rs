//! Build automation for the MiniJava runtime.
//!
//! Usage:
//!   cargo xtask build    - Build the runtime archive (libmjrt.a)
//!   cargo xtask test     - Run all tests (host unit tests + scenarios)
//!   cargo xtask test --host-only      - Run only host-side unit tests
//!   cargo xtask test --scenarios-only - Run only end-to-end scenarios
//!   cargo xtask test --link-only      - Run only the archive link tests
//!   cargo xtask check    - Type-check runtime code
//!   cargo xtask clippy   - Run clippy lints on runtime code
//!   cargo xtask doc      - Generate documentation

mod build;
mod cargo;
mod config;
mod link;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::build::BuildOptions;
use crate::cargo::CargoCommand;
use crate::config::Config;
use crate::test::TestOptions;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the MiniJava runtime")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the runtime archive
    Build {
        /// Build in release mode
        #[arg(short, long)]
        release: bool,

        /// Leave out the `main` entry glue (library-only archive)
        #[arg(long)]
        no_entry: bool,

        /// Import the generated routine as `__MiniJava_Main__`
        #[arg(long, conflicts_with = "no_entry")]
        firm_main: bool,

        /// Abort with status 1 on stdio or allocation failures
        #[arg(long)]
        strict: bool,

        /// Log runtime lifecycle events to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Run tests (host unit tests + end-to-end scenarios + link tests)
    Test {
        /// Build in release mode
        #[arg(short, long)]
        release: bool,

        /// Runtime features to enable for the test builds (strict, trace)
        #[arg(short, long, value_delimiter = ',')]
        features: Vec<String>,

        /// Run only host-side unit tests
        #[arg(long, conflicts_with_all = ["scenarios_only", "link_only"])]
        host_only: bool,

        /// Run only end-to-end scenarios
        #[arg(long, conflicts_with_all = ["host_only", "link_only"])]
        scenarios_only: bool,

        /// Run only the archive link tests
        #[arg(long, conflicts_with_all = ["host_only", "scenarios_only"])]
        link_only: bool,

        /// Extra arguments passed after -- (forwarded to test binaries)
        #[arg(last = true)]
        extra_args: Vec<String>,
    },

    /// Type-check runtime code without full compilation
    Check {
        /// Package to check (default: the whole workspace)
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Run clippy lints on runtime code
    Clippy {
        /// Package to lint (default: the whole workspace)
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Generate documentation for runtime crates
    Doc {
        /// Open documentation in browser after building
        #[arg(long)]
        open: bool,
    },
}

/// `cargo <subcommand>` on one package, or on the workspace when unset.
fn workspace_command(subcommand: &str, package: Option<String>) -> CargoCommand {
    let command = CargoCommand::new(subcommand);
    match package {
        Some(package) => command.package(&package),
        None => command,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Build {
            release,
            no_entry,
            firm_main,
            strict,
            trace,
        } => {
            let options = BuildOptions {
                release,
                no_entry,
                firm_main,
                strict,
                trace,
            };
            let result = build::build(&config, &options)?;
            println!("Built: {}", result.archive.display());
        }

        Commands::Test {
            release,
            features,
            host_only,
            scenarios_only,
            link_only,
            extra_args,
        } => {
            let options = TestOptions {
                release,
                features,
                host_only,
                scenarios_only,
                link_only,
                extra_args,
            };
            test::run_tests(&config, &options)?;
        }

        Commands::Check { package } => {
            workspace_command("check", package).run(&config)?;
        }

        Commands::Clippy { package } => {
            workspace_command("clippy", package).run(&config)?;
        }

        Commands::Doc { open } => {
            // doc uses --workspace --exclude instead of -p, so we build args manually
            let sh = xshell::Shell::new()?;
            sh.change_dir(&config.workspace_root);

            let mut args: Vec<String> = vec![
                "doc".into(),
                "--workspace".into(),
                "--exclude".into(),
                "xtask".into(),
                "--no-deps".into(),
            ];

            if open {
                args.push("--open".into());
            }

            xshell::cmd!(sh, "cargo {args...}")
                .run()
                .map_err(|e| anyhow::anyhow!("cargo doc failed: {e}"))?;
        }
    }

    Ok(())
}

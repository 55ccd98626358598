//! Link tests: the runtime archive linked into a C program exactly the way
//! the compiler links generated code, then run as a real process.
//!
//! Each archive variant is built, linked with `program.c` through the host C
//! compiler (`$CC`, default `cc`), run with fixed stdin, and its stdout and
//! exit status compared against the expected bytes.

use crate::build::{self, BuildOptions};
use crate::config::Config;
use anyhow::{Context, Result, bail};
use std::path::Path;
use xshell::{Shell, cmd};

/// Program source, relative to the workspace root.
const PROGRAM: &str = "crates/rt/mjrt/link/program.c";

/// Host libraries a Rust staticlib depends on when linked by a C toolchain.
const NATIVE_LIBS: &[&str] = &["-lgcc_s", "-lutil", "-lrt", "-lpthread", "-lm", "-ldl", "-lc"];

const STDIN: &[u8] = b"hi";
const EXPECTED_STDOUT: &[u8] = b"A42\n1\nhi-1\nx";

/// Symbol the archive's `main` imports as the generated routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntrySymbol {
    /// `__MiniJava_Main__`, selected by the `firm-main` feature.
    Firm,
    /// `minijava_main`, the default.
    Molki,
}

impl EntrySymbol {
    // Default last, so the archive left in the target directory is the
    // default one.
    const ALL: [Self; 2] = [Self::Firm, Self::Molki];

    fn name(self) -> &'static str {
        match self {
            Self::Firm => "__MiniJava_Main__",
            Self::Molki => "minijava_main",
        }
    }

    fn build_options(self, release: bool) -> BuildOptions {
        BuildOptions {
            release,
            firm_main: self == Self::Firm,
            ..BuildOptions::default()
        }
    }
}

fn utf8(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_owned)
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))
}

/// C compiler arguments producing `exe` from the program and `archive`.
fn compile_args(source: &Path, archive: &Path, exe: &Path, entry: EntrySymbol) -> Result<Vec<String>> {
    let mut args = vec![
        format!("-DENTRY={}", entry.name()),
        utf8(source)?,
        utf8(archive)?,
        "-o".into(),
        utf8(exe)?,
    ];
    args.extend(NATIVE_LIBS.iter().map(|lib| (*lib).to_string()));
    Ok(args)
}

/// Compares one run against the expected stdout and a zero exit status.
fn check_run(entry: EntrySymbol, stdout: &[u8], status: Option<i32>) -> Result<()> {
    if status != Some(0) {
        bail!("{}: exit status {status:?}, expected 0", entry.name());
    }
    if stdout != EXPECTED_STDOUT {
        bail!(
            "{}: stdout {:?}, expected {:?}",
            entry.name(),
            String::from_utf8_lossy(stdout),
            String::from_utf8_lossy(EXPECTED_STDOUT),
        );
    }
    Ok(())
}

/// Build, link and run the program against every archive variant.
pub fn run_link_tests(config: &Config, release: bool) -> Result<()> {
    if !cfg!(target_os = "linux") {
        println!("Skipping link tests (host library list is Linux-only).");
        return Ok(());
    }

    let sh = Shell::new()?;
    sh.change_dir(&config.workspace_root);

    let out_dir = config.target_dir.join("link");
    sh.create_dir(&out_dir)?;
    let source = config.workspace_root.join(PROGRAM);
    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());

    println!("Running link tests...");

    for entry in EntrySymbol::ALL {
        println!("  Linking program with {}...", entry.name());
        let archive = build::build(config, &entry.build_options(release))?.archive;
        let exe = out_dir.join(entry.name());

        let args = compile_args(&source, &archive, &exe, entry)?;
        cmd!(sh, "{cc} {args...}")
            .run()
            .with_context(|| format!("linking {} failed", exe.display()))?;

        let output = cmd!(sh, "{exe}")
            .stdin(STDIN)
            .ignore_status()
            .output()
            .with_context(|| format!("running {} failed", exe.display()))?;
        check_run(entry, &output.stdout, output.status.code())?;
    }

    println!("All link tests passed.");
    Ok(())
}

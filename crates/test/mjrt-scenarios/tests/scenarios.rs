//! Runs the scenario binary as a real process and checks the bytes that
//! reach its standard output.

use std::collections::BTreeSet;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use serde::Deserialize;

const MANIFEST: &str = include_str!("../scenarios.toml");
const BIN: &str = env!("CARGO_BIN_EXE_mjrt-scenario");

#[derive(Debug, Deserialize)]
struct Manifest {
    scenario: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    #[serde(default)]
    stdin: Payload,
    stdout: Payload,
    #[serde(default)]
    status: i32,
}

/// Stream contents, written either as text or as raw byte values.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Default for Payload {
    fn default() -> Self {
        Self::Bytes(Vec::new())
    }
}

impl Payload {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes(b) => b,
        }
    }
}

struct Outcome {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    status: Option<i32>,
}

fn run(args: &[&str], stdin: &[u8]) -> Outcome {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn mjrt-scenario");

    let mut pipe = child.stdin.take().expect("stdin is piped");
    let input = stdin.to_vec();
    // The child may exit without reading everything; a broken pipe is fine.
    let writer = thread::spawn(move || {
        let _ = pipe.write_all(&input);
    });

    let output = child.wait_with_output().expect("failed to wait for child");
    writer.join().expect("stdin writer panicked");

    Outcome {
        stdout: output.stdout,
        stderr: output.stderr,
        status: output.status.code(),
    }
}

fn manifest() -> Manifest {
    toml::from_str(MANIFEST).expect("scenarios.toml is malformed")
}

#[test]
fn manifest_scenarios_produce_expected_output() {
    let mut failures = Vec::new();

    for scenario in manifest().scenario {
        let outcome = run(&[&scenario.name], scenario.stdin.as_bytes());
        if outcome.stdout != scenario.stdout.as_bytes() {
            failures.push(format!(
                "{}: stdout {:?}, expected {:?}",
                scenario.name,
                String::from_utf8_lossy(&outcome.stdout),
                String::from_utf8_lossy(scenario.stdout.as_bytes()),
            ));
        }
        if outcome.status != Some(scenario.status) {
            failures.push(format!(
                "{}: exit status {:?}, expected {}",
                scenario.name, outcome.status, scenario.status
            ));
        }
    }

    assert!(failures.is_empty(), "scenario failures:\n{}", failures.join("\n"));
}

#[test]
fn manifest_covers_every_scenario() {
    let listed = run(&["--list"], b"");
    assert_eq!(listed.status, Some(0));
    let known: BTreeSet<String> = String::from_utf8(listed.stdout)
        .expect("names are UTF-8")
        .lines()
        .map(str::to_owned)
        .collect();
    let covered: BTreeSet<String> = manifest().scenario.into_iter().map(|s| s.name).collect();
    assert_eq!(known, covered);
}

#[test]
fn large_input_is_echoed_in_order() {
    let input: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 256) as u8).collect();
    let outcome = run(&["echo"], &input);
    assert_eq!(outcome.status, Some(0));
    assert_eq!(outcome.stdout.len(), input.len());
    assert!(outcome.stdout == input, "echoed bytes differ from input");
}

#[test]
fn stderr_carries_only_runtime_log_lines() {
    let outcome = run(&["print-integer"], b"");
    assert_eq!(outcome.stdout, b"42\n");
    let stderr = String::from_utf8_lossy(&outcome.stderr);
    for line in stderr.lines() {
        assert!(line.starts_with("[mjrt "), "unexpected stderr line: {line:?}");
    }
}

#[test]
fn unknown_scenario_is_rejected() {
    let outcome = run(&["no-such-scenario"], b"");
    assert_eq!(outcome.status, Some(2));
    assert!(outcome.stdout.is_empty());
}

/// Stdout on `/dev/full` makes every write fail with `ENOSPC`.
#[cfg(target_os = "linux")]
#[test]
fn write_failure_follows_failure_policy() {
    let full = std::fs::File::options()
        .write(true)
        .open("/dev/full")
        .expect("failed to open /dev/full");
    let output = Command::new(BIN)
        .arg("print-integer")
        .stdin(Stdio::null())
        .stdout(full)
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run mjrt-scenario");
    let stderr = String::from_utf8_lossy(&output.stderr);

    if cfg!(feature = "strict") {
        assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
        let fatal: Vec<&str> = stderr.lines().filter(|l| l.contains("fatal")).collect();
        assert_eq!(fatal.len(), 1, "expected one diagnostic, got {fatal:?}");
        assert!(
            fatal[0].starts_with("mjrt: fatal: print-integer: "),
            "unexpected diagnostic: {:?}",
            fatal[0]
        );
    } else {
        assert_eq!(output.status.code(), Some(0), "stderr: {stderr}");
        assert!(!stderr.contains("fatal"), "unexpected stderr: {stderr}");
    }
}

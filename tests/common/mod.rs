#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use assert_cmd::Command;
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::TempDir;
use villa_booking::config::ConfigManager;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

static RESERVATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Reservation [0-9A-F]{8}").expect("valid reservation pattern"));
static ANSI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi pattern"));

/// Config manager backed by a unique directory for each test.
pub fn setup_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    /// Stdout with colors removed and reservation ids replaced.
    pub fn scrubbed(&self) -> String {
        scrub(&self.stdout)
    }

    /// Lines printed after `=== title ===`, up to the next blank line or section.
    pub fn section(&self, title: &str) -> String {
        let header = format!("=== {} ===", title);
        self.scrubbed()
            .lines()
            .skip_while(|line| *line != header)
            .skip(1)
            .take_while(|line| !line.is_empty() && !line.starts_with("==="))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn scrub(text: &str) -> String {
    let plain = ANSI.replace_all(text, "");
    RESERVATION_ID
        .replace_all(&plain, "Reservation [id]")
        .into_owned()
}

/// Runs the shell in script mode with its own home directory.
pub struct ScriptHarness {
    home: TempDir,
}

impl ScriptHarness {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("villa_booking_cli").expect("binary exists");
        cmd.env("VILLA_BOOKING_HOME", self.home())
            .env("VILLA_BOOKING_CLI_SCRIPT", "1")
            .env("VILLA_BOOKING_TODAY", PINNED_TODAY)
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_script(&self, script: &str) -> CliOutput {
        let output = self
            .command()
            .write_stdin(script.to_string())
            .output()
            .expect("run script CLI");
        if !output.status.success() {
            panic!(
                "script CLI failed: status={}\nstdout:\n{}\nstderr:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Reference date for the past-date rule in every scripted run.
pub const PINNED_TODAY: &str = "2025-05-01";

/// Commands that take the wizard from opening to the confirm step.
pub const FILL_TO_CONFIRM: &str = "\
reserve
set check_in 2025-06-01
set check_out 2025-06-06
next
guests children +
next
set name \"Ada Lovelace\"
set email ada@example.com
set phone \"+44 20 7946 0958\"
next
";

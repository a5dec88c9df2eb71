use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

mod edge_cases;
mod smoke;

/// A test context with an isolated working directory and a scrubbed
/// environment, so ambient credentials on a developer machine can never
/// leak into the binary under test.
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Run aliscan in this temp directory with no cloud credentials in the
    /// environment.
    pub fn run_aliscan(&self, args: &[&str]) -> CommandResult {
        let mut cmd = Command::cargo_bin("aliscan").expect("Failed to find aliscan binary");
        cmd.args(args);
        cmd.current_dir(self.path());
        cmd.env_remove("ALIBABA_CLOUD_ACCESS_KEY_ID");
        cmd.env_remove("ALIBABA_CLOUD_ACCESS_KEY_SECRET");
        cmd.env_remove("ALIBABA_CLOUD_REGION_ID");
        cmd.env_remove("ONLY_WITHOUT_POLICY");
        cmd.env_remove("SNAPSHOT_DEBUG");
        cmd.env_remove("LOOKBACK_HOURS");

        let output = cmd.output().expect("Failed to execute aliscan command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }

    /// Assert no file was created in the temp directory (the credential
    /// failure paths must not leave report artifacts behind).
    pub fn assert_no_artifacts(&self) {
        let entries: Vec<_> = std::fs::read_dir(self.path())
            .expect("Failed to read temp directory")
            .collect();
        assert!(
            entries.is_empty(),
            "Expected no artifacts, found: {entries:?}"
        );
    }
}

pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

pub fn assert_success(result: &CommandResult) {
    assert!(
        result.success(),
        "Expected command to succeed but it failed.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_output_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stdout.contains(pattern),
        "Expected stdout to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

pub fn assert_stderr_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stderr.contains(pattern),
        "Expected stderr to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

//! CLI test runner with fluent assertions.
//!
//! Provides infrastructure for executing the `nivasa` binary and verifying
//! output, exit codes, timing, and JSON responses in robot mode.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

/// Configuration for CLI test runs.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Environment variables to set for the command.
    pub env_vars: HashMap<String, String>,
    /// Environment variables to remove for the command.
    pub env_removed: Vec<String>,
    /// Working directory for command execution.
    pub working_dir: Option<PathBuf>,
    /// Standard input to provide to the command.
    pub stdin: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            // Logs go to stderr; keep it clean for robot-mode error JSON.
            env_vars: HashMap::from([("RUST_LOG".to_string(), "off".to_string())]),
            // Keep the developer's own settings out of test runs.
            env_removed: vec![
                "NIVASA_CONFIG".to_string(),
                "NIVASA_EXTERNAL_DIR".to_string(),
                "NIVASA_FORMAT".to_string(),
            ],
            working_dir: None,
            stdin: None,
        }
    }
}

/// Main test runner for the `nivasa` CLI binary.
///
/// # Example
///
/// ```ignore
/// let cli = CliRunner::new();
/// cli.run(&["where", "--robot"])
///    .assert_success()
///    .assert_stdout_contains("medium");
/// ```
pub struct CliRunner {
    binary_path: PathBuf,
    config: CliConfig,
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRunner {
    /// Create a new CLI runner pointing to the compiled `nivasa` binary.
    #[must_use]
    pub fn new() -> Self {
        let binary = env!("CARGO_BIN_EXE_nivasa");
        Self {
            binary_path: PathBuf::from(binary),
            config: CliConfig::default(),
        }
    }

    /// Add an environment variable for command execution.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.config.env_removed.retain(|k| k != key);
        self.config
            .env_vars
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Set the working directory for command execution.
    #[must_use]
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.config.working_dir = Some(dir);
        self
    }

    /// Set standard input for the command.
    #[must_use]
    pub fn with_stdin(mut self, stdin: &str) -> Self {
        self.config.stdin = Some(stdin.to_string());
        self
    }

    /// Execute the command with the given arguments.
    ///
    /// # Panics
    ///
    /// Panics if the command fails to execute.
    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let start = Instant::now();

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        for key in &self.config.env_removed {
            cmd.env_remove(key);
        }
        for (key, value) in &self.config.env_vars {
            cmd.env(key, value);
        }

        if let Some(ref dir) = self.config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().expect("Failed to execute command");
        {
            // Dropping stdin closes it so the child sees EOF.
            let mut stdin = child.stdin.take().expect("stdin was piped");
            if let Some(ref input) = self.config.stdin {
                stdin
                    .write_all(input.as_bytes())
                    .expect("Failed to write stdin");
            }
        }
        let output = child.wait_with_output().expect("Failed to wait for command");
        let duration = start.elapsed();

        CliResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration,
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Execute with `--robot` flag for JSON output.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full_args = vec!["--robot"];
        full_args.extend(args);
        self.run(&full_args)
    }
}

/// Captured output from CLI execution with fluent assertions.
#[derive(Debug, Clone)]
pub struct CliResult {
    /// Standard output captured from the command.
    pub stdout: String,
    /// Standard error captured from the command.
    pub stderr: String,
    /// Exit code from the command.
    pub exit_code: i32,
    /// Time taken to execute the command.
    pub duration: Duration,
    /// Arguments passed to the command.
    pub args: Vec<String>,
}

impl CliResult {
    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    // === Fluent Assertions (all return &Self for chaining) ===

    /// Assert the command succeeded.
    ///
    /// # Panics
    ///
    /// Panics if the command did not exit with code 0.
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "Command {:?} failed with exit code {}: {}",
            self.args,
            self.exit_code,
            self.stderr
        );
        self
    }

    /// Assert the command failed.
    ///
    /// # Panics
    ///
    /// Panics if the command exited with code 0.
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success(),
            "Command {:?} unexpectedly succeeded",
            self.args
        );
        self
    }

    /// Assert a specific exit code.
    ///
    /// # Panics
    ///
    /// Panics if the exit code doesn't match.
    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        assert_eq!(
            self.exit_code, expected,
            "Expected exit code {expected}, got {} for {:?}",
            self.exit_code, self.args
        );
        self
    }

    // === Stdout / Stderr Assertions ===

    /// Assert stdout contains the given text.
    ///
    /// # Panics
    ///
    /// Panics if stdout doesn't contain the text.
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "stdout does not contain \"{text}\"\nActual stdout:\n{}",
            self.stdout
        );
        self
    }

    /// Assert stdout does not contain the given text.
    ///
    /// # Panics
    ///
    /// Panics if stdout contains the text.
    pub fn assert_stdout_not_contains(&self, text: &str) -> &Self {
        assert!(
            !self.stdout.contains(text),
            "stdout unexpectedly contains \"{text}\"\nActual stdout:\n{}",
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text.
    ///
    /// # Panics
    ///
    /// Panics if stderr doesn't contain the text.
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain \"{text}\"\nActual stderr:\n{}",
            self.stderr
        );
        self
    }

    // === JSON Assertions (for robot mode) ===

    /// Parse stdout as a single JSON document.
    ///
    /// # Panics
    ///
    /// Panics if stdout is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|_| panic!("Failed to parse JSON from stdout:\n{}", self.stdout))
    }

    /// Parse stdout as a stream of JSON documents.
    ///
    /// Commands that report several events (captures, then the gallery)
    /// emit one document per event.
    ///
    /// # Panics
    ///
    /// Panics if any document fails to parse.
    #[must_use]
    pub fn json_stream(&self) -> Vec<Value> {
        serde_json::Deserializer::from_str(&self.stdout)
            .into_iter::<Value>()
            .collect::<Result<_, _>>()
            .unwrap_or_else(|e| panic!("Failed to parse JSON stream ({e}):\n{}", self.stdout))
    }

    /// Parse stderr as JSON (robot-mode errors).
    ///
    /// # Panics
    ///
    /// Panics if stderr is not valid JSON.
    #[must_use]
    pub fn stderr_json(&self) -> Value {
        serde_json::from_str(self.stderr.trim())
            .unwrap_or_else(|_| panic!("Failed to parse JSON from stderr:\n{}", self.stderr))
    }

    /// Assert a JSON field matches an expected value using JSON pointer syntax.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist or doesn't match.
    pub fn assert_json_field(&self, json_pointer: &str, expected: &Value) -> &Self {
        let json = self.json();
        let actual = json.pointer(json_pointer).unwrap_or_else(|| {
            panic!(
                "JSON path {json_pointer} not found in:\n{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            )
        });
        assert_eq!(actual, expected, "JSON field {json_pointer} mismatch");
        self
    }

    /// Assert a JSON field exists at the given pointer path.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist.
    pub fn assert_json_field_exists(&self, json_pointer: &str) -> &Self {
        let json = self.json();
        assert!(
            json.pointer(json_pointer).is_some(),
            "JSON path {json_pointer} not found"
        );
        self
    }

    // === Timing Assertions ===

    /// Assert the command completed within the given duration.
    ///
    /// # Panics
    ///
    /// Panics if the command took longer.
    pub fn assert_duration_under(&self, max: Duration) -> &Self {
        assert!(
            self.duration < max,
            "Command took {:?}, expected under {max:?}",
            self.duration
        );
        self
    }
}

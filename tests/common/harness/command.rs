//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test binaries
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `pico-export` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct PicoCommand {
    args: Vec<String>,
    envs: Vec<(String, OsString)>,
    current_dir: Option<PathBuf>,
}

impl PicoCommand {
    /// Creates a new command for the `pico-export` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    /// Sets the `--db` option to specify the content database.
    pub fn db(mut self, path: &Path) -> Self {
        self.args.push("--db".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Sets an environment variable for the child process.
    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.envs.push((key.to_string(), value.into()));
        self
    }

    /// Sets the working directory of the child process.
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("pico-export").expect("Failed to find pico-export binary");
        cmd.args(&self.args);
        cmd.env_remove("RUST_LOG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns raw stdout bytes.
    pub fn stdout_bytes(self) -> Vec<u8> {
        self.assert().success().get_output().stdout.clone()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        String::from_utf8(self.stdout_bytes()).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `export` command.
    pub fn export(self) -> Self {
        self.args(["export"])
    }

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// Adds `-o <path>` to the command.
    pub fn output(self, path: &str) -> Self {
        self.args(["-o", path])
    }

    /// Adds `--http` to the command.
    pub fn http(self) -> Self {
        self.args(["--http"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format paths` to the command.
    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

impl Default for PicoCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pico_command_new_is_empty() {
        let cmd = PicoCommand::new();
        assert!(cmd.get_args().is_empty());
    }

    #[test]
    fn pico_command_db_adds_flag() {
        let cmd = PicoCommand::new().db(Path::new("/tmp/site.db"));
        assert_eq!(cmd.get_args(), &["--db", "/tmp/site.db"]);
    }

    #[test]
    fn pico_command_chains_shortcuts() {
        let cmd = PicoCommand::new().export().output("-").format_json();
        assert_eq!(
            cmd.get_args(),
            &["export", "-o", "-", "--format", "json"]
        );
    }
}

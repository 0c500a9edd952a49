//! Common test utilities for Themesmith CLI tests.
//!
//! Provides `TestEnv`: an isolated theme directory in a tempdir plus
//! helpers to lay out component sources and run the CLI against it.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Result of running a Themesmith CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated theme directory for one test
pub struct TestEnv {
    pub theme_root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            theme_root: tempfile::tempdir().expect("create theme tempdir"),
        }
    }

    /// Path relative to the theme root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.theme_root.path().join(relative)
    }

    /// Create a component directory with the given source files
    ///
    /// `kind_dir` is `"sections"` or `"snippets"`; `files` maps an
    /// extension (`"liquid"`, `"scss"`, `"js"`) to its content.
    pub fn add_component(&self, kind_dir: &str, name: &str, files: &[(&str, &str)]) {
        let dir = self.path(kind_dir).join(name);
        fs::create_dir_all(&dir).expect("create component dir");
        for (ext, content) in files {
            fs::write(dir.join(format!("{name}.{ext}")), content).expect("write source file");
        }
    }

    /// Run the binary with raw arguments
    pub fn run(&self, args: &[&str]) -> TestResult {
        let bin = env!("CARGO_BIN_EXE_themesmith");
        let output = Command::new(bin)
            .args(args)
            .current_dir(self.theme_root.path())
            .output()
            .expect("run themesmith");

        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Run a verb against this theme root
    pub fn run_verb(&self, verb: &str, extra: &[&str]) -> TestResult {
        let root = self.theme_root.path().display().to_string();
        let mut args = vec![verb, "--root", root.as_str()];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    /// Read a generated output file to a string
    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read generated output")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - A fake `pulumi` executable that records its arguments
//! - Helpers for reading back what the fake binary saw

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables that change the proxy's behavior and must not leak in from
/// the developer's shell.
const ISOLATED_VARS: [&str; 12] = [
    "PULUMI_CMD",
    "PULUMILOCAL_STACK_NAME",
    "PULUMILOCAL_CONFIG_STRATEGY",
    "AWS_ENDPOINT_URL",
    "LOCALSTACK_HOSTNAME",
    "EDGE_PORT",
    "USE_SSL",
    "AWS_DEFAULT_REGION",
    "DRY_RUN",
    "PULUMI_NON_INTERACTIVE",
    "PULUMILOCAL_CONFIRM",
    "PULUMILOCAL_LOG_MODE",
];

/// Stand-in for the pulumi binary.
///
/// Appends one line per invocation to `$FAKE_PULUMI_LOG`, answers the
/// introspection and stack queries with canned output, reports whether a
/// `--config-file` argument existed at call time, and exits with
/// `$FAKE_PULUMI_EXIT` for deploying commands.
const FAKE_PULUMI: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$FAKE_PULUMI_LOG"

prev=""
for arg in "$@"; do
  if [ "$prev" = "--config-file" ] && [ -f "$arg" ]; then
    printf 'present %s\n' "$arg" >> "$FAKE_PULUMI_LOG"
  fi
  prev="$arg"
done

case "$1" in
  about)
    echo '{"plugins": [{"name": "aws", "version": "6.2.0"}]}'
    ;;
  package)
    echo '{"types": {"aws:config/endpoints:endpoints": {"properties": {"s3": {}, "sqs": {}, "dynamodb": {}}}}}'
    ;;
  stack)
    if [ "$2" = "--show-name" ]; then
      if [ -n "$FAKE_PULUMI_NO_STACK" ]; then
        echo "error: no stack selected" >&2
        exit 255
      fi
      echo "${FAKE_PULUMI_STACK:-dev}"
    fi
    ;;
  config)
    if [ "$2" = "get" ]; then
      exit 255
    fi
    ;;
  up|destroy|preview|cancel)
    exit "${FAKE_PULUMI_EXIT:-0}"
    ;;
esac
exit 0
"#;

/// Test environment with an isolated project directory and fake binary.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Project directory the proxy runs in
    pub project: PathBuf,
    /// Path to the fake pulumi executable
    pub fake_pulumi: PathBuf,
    /// File the fake binary records its invocations in
    pub log: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).expect("Failed to create project dir");

        let bin_dir = temp_dir.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
        let fake_pulumi = bin_dir.join("pulumi");
        fs::write(&fake_pulumi, FAKE_PULUMI).expect("Failed to write fake pulumi");
        fs::set_permissions(&fake_pulumi, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake pulumi executable");

        let log = temp_dir.path().join("pulumi.log");

        Self {
            temp_dir,
            project,
            fake_pulumi,
            log,
        }
    }

    /// Get a command builder wired to the fake binary, running in the
    /// project directory, with every proxy variable cleared.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pulumilocal").expect("Failed to find pulumilocal binary");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.project)
            .env("PULUMI_CMD", &self.fake_pulumi)
            .env("FAKE_PULUMI_LOG", &self.log);
        cmd
    }

    /// Get the project path.
    pub fn path(&self) -> &Path {
        &self.project
    }

    /// Path of a stack's configuration file in the project.
    pub fn stack_config(&self, stack: &str) -> PathBuf {
        self.project.join(format!("Pulumi.{stack}.yaml"))
    }

    /// Write a stack's configuration file.
    pub fn write_stack_config(&self, stack: &str, contents: &str) -> PathBuf {
        let path = self.stack_config(stack);
        fs::write(&path, contents).expect("Failed to write stack config");
        path
    }

    /// Every line the fake binary logged, in order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Logged invocations starting with `prefix`.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

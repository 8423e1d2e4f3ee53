#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn gowork_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gowork"))
}

pub fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

pub fn run_command(cmd: Command) -> Result<Output> {
    let mut cmd = cmd;
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

const STUB_SCRIPT: &str = r#"#!/bin/sh
{
  echo "cwd=$(pwd)"
  echo "physical=$(pwd -P)"
  echo "gopath=$GOPATH"
  echo "args=$*"
} > "$STUB_LOG"
exit "${STUB_EXIT:-0}"
"#;

/// A fake toolchain that records what it was launched with, plus the
/// project and scratch directories a test drives gowork against.
pub struct Sandbox {
    pub project: TempDir,
    pub scratch: TempDir,
    tools: TempDir,
    pub stub: PathBuf,
    pub log: PathBuf,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let project = TempDir::new().context("allocate project dir")?;
        let scratch = TempDir::new().context("allocate scratch dir")?;
        let tools = TempDir::new().context("allocate tools dir")?;
        let stub = tools.path().join("go-stub");
        fs::write(&stub, STUB_SCRIPT)?;
        make_executable(&stub)?;
        let log = tools.path().join("invocation.log");
        Ok(Self {
            project,
            scratch,
            tools,
            stub,
            log,
        })
    }

    pub fn project_root(&self) -> PathBuf {
        fs::canonicalize(self.project.path()).expect("canonical project root")
    }

    /// `gowork` preconfigured to use the stub and the scratch overlay root.
    pub fn gowork(&self, cwd: &Path) -> Command {
        let mut cmd = Command::new(gowork_binary());
        cmd.current_dir(cwd)
            .env("GOWORK_TOOLCHAIN", &self.stub)
            .env("GOWORK_TMPDIR", self.scratch.path())
            .env("STUB_LOG", &self.log)
            .env_remove("GOWORK_LOG")
            .env_remove("GOPATH");
        cmd
    }

    pub fn invocation(&self) -> Result<BTreeMap<String, String>> {
        let raw = fs::read_to_string(&self.log)
            .with_context(|| format!("stub toolchain never ran ({})", self.log.display()))?;
        Ok(raw
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }

    pub fn leftover_overlays(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.scratch.path())? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }
}

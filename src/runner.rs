//! Launching the delegated toolchain.
//!
//! The toolchain is opaque: it gets a program name, arguments, a working
//! directory and an environment, and reports back an exit status. The
//! [`CommandRunner`] trait is the seam tests use to observe invocations
//! without a real toolchain installed.

use crate::env::ComposedEnvironment;
use crate::error::WorkspaceError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// One fully planned toolchain call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    pub env: ComposedEnvironment,
}

pub trait CommandRunner {
    /// Run `invocation` to completion. A non-zero exit is an error.
    fn run(&mut self, invocation: &Invocation) -> Result<(), WorkspaceError>;
}

/// Runs the toolchain as a child process with inherited stdio.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), WorkspaceError> {
        debug!(
            program = %invocation.program.to_string_lossy(),
            args = ?invocation.args,
            cwd = %invocation.cwd.display(),
            "running toolchain"
        );
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .env_clear()
            .envs(invocation.env.iter())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = command.status().map_err(|err| WorkspaceError::Process {
            program: invocation.program.clone(),
            code: None,
            source: Some(err),
        })?;

        if status.success() {
            return Ok(());
        }
        Err(WorkspaceError::Process {
            program: invocation.program.clone(),
            code: status.code(),
            source: None,
        })
    }
}

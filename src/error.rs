//! Error taxonomy shared by every gowork operation.
//!
//! Every variant is fatal: nothing in the crate retries or recovers locally.
//! `Display` describes the failed operation only; the underlying cause is
//! exposed through `source()`, so callers print the chain (`{:#}` on an
//! `anyhow::Error`) on a single line and exit with
//! [`WorkspaceError::exit_code`].

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No ancestor of `start` carries the project marker.
    #[error(
        "not inside a gowork workspace (searched upward from {}). use `gowork init` to start one.",
        start.display()
    )]
    NotInWorkspace { start: PathBuf },

    /// The marker exists but could not be read or decoded.
    #[error("could not decode conf file {}: {reason}", path.display())]
    ConfigCorrupt { path: PathBuf, reason: String },

    #[error("{action} {}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The toolchain could not be started, exited non-zero, or was killed.
    #[error("{}", describe_process_failure(program, *code, source.as_ref()))]
    Process {
        program: OsString,
        code: Option<i32>,
        #[source]
        source: Option<io::Error>,
    },

    #[error("invalid import path {value:?}: {reason}")]
    InvalidImportPath { value: String, reason: &'static str },

    #[error("cannot compose search path")]
    InvalidSearchPath {
        #[source]
        source: std::env::JoinPathsError,
    },
}

impl WorkspaceError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WorkspaceError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Exit status the process should terminate with for this error.
    ///
    /// A toolchain that exited with its own non-zero code hands that code
    /// through unchanged; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkspaceError::Process {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_process_failure(
    program: &OsString,
    code: Option<i32>,
    source: Option<&io::Error>,
) -> String {
    let program = program.to_string_lossy();
    match (source, code) {
        (Some(_), _) => format!("run {program}: failed to start"),
        (None, Some(code)) => format!("run {program}: exited with status {code}"),
        (None, None) => format!("run {program}: terminated by signal"),
    }
}

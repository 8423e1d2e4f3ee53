//! Bootstrap script that locates (or installs) gowork and re-invokes it.

use crate::error::WorkspaceError;
use std::fs;
use std::path::{Path, PathBuf};

pub const WRAPPER_FILE: &str = "goworkw.sh";

pub const WRAPPER_SCRIPT: &str = r#"#!/bin/bash
set -e

goworkdir="$HOME/.gowork"
if [ ! -d "$goworkdir" ]; then
  mkdir -p "$goworkdir"
fi

if command -v gowork >/dev/null 2>&1; then
  exec gowork "$@"
fi

if [ ! -x "$goworkdir/bin/gowork" ]; then
  cargo install --quiet --root "$goworkdir" gowork
fi
exec "$goworkdir/bin/gowork" "$@"
"#;

/// Write [`WRAPPER_SCRIPT`] into `dir` as an executable file.
pub fn install_wrapper(dir: &Path) -> Result<PathBuf, WorkspaceError> {
    let path = dir.join(WRAPPER_FILE);
    fs::write(&path, WRAPPER_SCRIPT)
        .map_err(|err| WorkspaceError::fs("could not write wrapper", &path, err))?;
    make_executable(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), WorkspaceError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|err| WorkspaceError::fs("chmod wrapper", path, err))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), WorkspaceError> {
    Ok(())
}

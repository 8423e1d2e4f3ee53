//! Child-process environment for the delegated toolchain.
//!
//! The search-path variable is rebuilt from the overlay: the vendor tree
//! first so vendored packages win, optionally the caller's own value, and
//! the workspace tree last. Everything else is inherited untouched.

use crate::error::WorkspaceError;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Ordered `KEY=VALUE` pairs; each key appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComposedEnvironment {
    vars: Vec<(OsString, OsString)>,
}

impl ComposedEnvironment {
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut composed = Self::default();
        for (key, value) in vars {
            composed.set(key, value);
        }
        composed
    }

    /// Replace `key` in place, or append it when absent.
    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.vars.push((key, value)),
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        self.vars
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_os_str())
    }

    pub fn vars(&self) -> &[(OsString, OsString)] {
        &self.vars
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

/// Build the search-path value: vendor tree, then (unless `vendor_only`) the
/// entries of the caller's non-empty value, then the workspace tree.
pub fn compose_search_path(
    vendor_root: &Path,
    inherited: Option<&OsStr>,
    workspace_root: &Path,
    vendor_only: bool,
) -> Result<OsString, WorkspaceError> {
    let mut entries: Vec<PathBuf> = vec![vendor_root.to_path_buf()];
    if !vendor_only {
        if let Some(global) = inherited.filter(|value| !value.is_empty()) {
            entries.extend(env::split_paths(global));
        }
    }
    entries.push(workspace_root.to_path_buf());
    env::join_paths(entries).map_err(|source| WorkspaceError::InvalidSearchPath { source })
}

/// Derive the toolchain's environment from `inherited`, with `var` replaced
/// in place by the composed search path.
pub fn compose<I>(
    inherited: I,
    var: &str,
    vendor_root: &Path,
    workspace_root: &Path,
    vendor_only: bool,
) -> Result<ComposedEnvironment, WorkspaceError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut composed = ComposedEnvironment::from_vars(inherited);
    let search_path =
        compose_search_path(vendor_root, composed.get(var), workspace_root, vendor_only)?;
    composed.set(var, search_path);
    Ok(composed)
}

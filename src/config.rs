//! Runtime settings for a gowork invocation.
//!
//! Settings come from two places: the `--vendorall` flag (threaded in by the
//! caller) and a handful of environment overrides. Nothing here is global;
//! the resolved [`Settings`] value is passed down explicitly.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Toolchain program used when nothing overrides it.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// The variable the toolchain resolves import paths through.
pub const SEARCH_PATH_VAR: &str = "GOPATH";

/// Overrides the toolchain program (path or name looked up on `PATH`).
pub const TOOLCHAIN_ENV: &str = "GOWORK_TOOLCHAIN";

/// Overrides the parent directory for overlay trees.
pub const TMPDIR_ENV: &str = "GOWORK_TMPDIR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub toolchain: OsString,
    pub search_path_var: String,
    /// When true the caller's own search path is never merged in.
    pub vendor_only: bool,
    pub temp_root: Option<PathBuf>,
}

impl Settings {
    pub fn from_env(vendor_only: bool) -> Self {
        Self::from_lookup(vendor_only, |name| env::var_os(name))
    }

    /// Resolve settings through `lookup`; empty values count as unset.
    ///
    /// Values stay `OsString`s end to end, so non-UTF-8 paths survive.
    pub fn from_lookup<F>(vendor_only: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let toolchain = non_empty(TOOLCHAIN_ENV)
            .or_else(|| option_env!("GOWORK_TOOLCHAIN_HINT").map(OsString::from))
            .unwrap_or_else(|| OsString::from(DEFAULT_TOOLCHAIN));
        Self {
            toolchain,
            search_path_var: SEARCH_PATH_VAR.to_string(),
            vendor_only,
            temp_root: non_empty(TMPDIR_ENV).map(PathBuf::from),
        }
    }
}

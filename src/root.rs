//! Project root discovery and the `go.work.conf` marker.
//!
//! A project root is the nearest ancestor of the working directory that holds
//! [`MARKER_FILE`]. The marker is a small JSON record declaring the import
//! path the project should appear under inside the overlay. An empty marker
//! file is also accepted and means "overlay the project at the tree root".

use crate::error::WorkspaceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name whose presence marks a project root.
pub const MARKER_FILE: &str = "go.work.conf";

/// Project-local dependency cache, relative to the root.
pub const VENDOR_DIR: &str = "vendor";

/// Slash-separated logical package path, e.g. `user/mypkg`. May be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImportPath(String);

impl ImportPath {
    pub fn parse(value: &str) -> Result<Self, WorkspaceError> {
        let invalid = |reason| WorkspaceError::InvalidImportPath {
            value: value.to_string(),
            reason,
        };
        if value.is_empty() {
            return Ok(Self::default());
        }
        if value.starts_with('/') || value.ends_with('/') {
            return Err(invalid("must not begin or end with '/'"));
        }
        if value.contains('\\') {
            return Err(invalid("segments are separated by '/', not '\\'"));
        }
        for segment in value.split('/') {
            match segment {
                "" => return Err(invalid("contains an empty segment")),
                "." | ".." => return Err(invalid("must not contain '.' or '..' segments")),
                _ => {}
            }
        }
        Ok(Self(value.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Every segment but the last, i.e. the directories that must exist
    /// before the project symlink can be placed.
    pub fn parent_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.segments().collect();
        segments.pop();
        segments
    }

    /// The import path as a relative filesystem path (`a/b` -> `a/b`).
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl TryFrom<String> for ImportPath {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ImportPath::parse(&value)
    }
}

impl From<ImportPath> for String {
    fn from(value: ImportPath) -> Self {
        value.0
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded contents of `go.work.conf`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMarker {
    #[serde(rename = "ImportPath", alias = "Pkg", default)]
    pub import_path: ImportPath,
}

impl ProjectMarker {
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let corrupt = |reason: String| WorkspaceError::ConfigCorrupt {
            path: path.to_path_buf(),
            reason,
        };
        let raw = fs::read_to_string(path).map_err(|err| corrupt(err.to_string()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&raw).map_err(|err| corrupt(err.to_string()))
    }

    /// Write the marker into `dir`.
    ///
    /// An empty import path produces a zero-byte sentinel file; otherwise the
    /// JSON record is written with a trailing newline.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, WorkspaceError> {
        let path = dir.join(MARKER_FILE);
        let contents = if self.import_path.is_empty() {
            String::new()
        } else {
            let mut json = serde_json::to_string(self).map_err(|err| {
                WorkspaceError::ConfigCorrupt {
                    path: path.clone(),
                    reason: err.to_string(),
                }
            })?;
            json.push('\n');
            json
        };
        fs::write(&path, contents).map_err(|err| WorkspaceError::fs("create marker", &path, err))?;
        Ok(path)
    }
}

/// A discovered project: where it lives on disk and where it appears in the
/// overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRoot {
    pub path: PathBuf,
    pub import_path: ImportPath,
}

impl ProjectRoot {
    pub fn vendor_dir(&self) -> PathBuf {
        self.path.join(VENDOR_DIR)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path.join("bin")
    }

    /// Final component of the root directory, used as the binary name.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "main".to_string())
    }
}

/// Walk upward from `start` to the nearest directory holding [`MARKER_FILE`].
pub fn find_root(start: &Path) -> Result<ProjectRoot, WorkspaceError> {
    let mut dir = fs::canonicalize(start)
        .map_err(|err| WorkspaceError::fs("resolve working directory", start, err))?;
    loop {
        let candidate = dir.join(MARKER_FILE);
        match fs::metadata(&candidate) {
            Ok(_) => {
                let marker = ProjectMarker::load(&candidate)?;
                debug!(
                    root = %dir.display(),
                    import_path = %marker.import_path,
                    "found workspace root"
                );
                return Ok(ProjectRoot {
                    path: dir,
                    import_path: marker.import_path,
                });
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(WorkspaceError::fs("stat marker", candidate, err)),
        }
        if !dir.pop() {
            return Err(WorkspaceError::NotInWorkspace {
                start: start.to_path_buf(),
            });
        }
    }
}

/// Create `dir` (and parents), treating "already exists" as success.
pub fn ensure_dir(dir: &Path, action: &'static str) -> Result<(), WorkspaceError> {
    fs::create_dir_all(dir).map_err(|err| WorkspaceError::fs(action, dir, err))
}

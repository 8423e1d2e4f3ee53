//! Ephemeral GOPATH overlays.
//!
//! An [`Overlay`] is a pair of temporary trees whose `src` entries are
//! symlinks back into the real project:
//!
//! - the workspace tree places the project root at `src/<import-path>` (or at
//!   `src` itself when the import path is empty);
//! - the vendor tree points `src` at `<root>/vendor`, so vendored packages
//!   resolve as top-level import paths rather than under the project.
//!
//! Both trees are owned by `tempfile::TempDir` handles, so every exit path
//! that drops the overlay (including `?` returns halfway through
//! [`Overlay::build`]) removes them.

use crate::error::WorkspaceError;
use crate::root::{ImportPath, ProjectRoot};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};
use tracing::{debug, warn};

const WORKSPACE_PREFIX: &str = "gowork-w-";
const VENDOR_PREFIX: &str = "gowork-v-";

#[derive(Debug)]
pub struct Overlay {
    workspace: TempDir,
    vendor: TempDir,
    project_dir: PathBuf,
}

impl Overlay {
    /// Build both trees for `root`. `temp_root` overrides the system temp
    /// directory as the parent of the trees.
    pub fn build(root: &ProjectRoot, temp_root: Option<&Path>) -> Result<Self, WorkspaceError> {
        let workspace = allocate(WORKSPACE_PREFIX, temp_root)?;
        let project_dir = link_project(workspace.path(), &root.path, &root.import_path)?;

        let vendor = allocate(VENDOR_PREFIX, temp_root)?;
        let vendor_link = vendor.path().join("src");
        symlink_dir(&root.vendor_dir(), &vendor_link)
            .map_err(|err| WorkspaceError::fs("symlink vendor tree", &vendor_link, err))?;

        debug!(
            workspace = %workspace.path().display(),
            vendor = %vendor.path().display(),
            project_dir = %project_dir.display(),
            "built overlay"
        );
        Ok(Self {
            workspace,
            vendor,
            project_dir,
        })
    }

    /// Root of the workspace tree; the last search-path entry.
    pub fn workspace_root(&self) -> &Path {
        self.workspace.path()
    }

    /// Root of the vendor tree; the first search-path entry.
    pub fn vendor_root(&self) -> &Path {
        self.vendor.path()
    }

    /// Where the project appears inside the workspace tree. The toolchain is
    /// launched from here.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Remove both trees now, reporting the first removal failure.
    ///
    /// Dropping the overlay removes them too, but silently.
    pub fn close(self) -> Result<(), WorkspaceError> {
        let workspace_path = self.workspace.path().to_path_buf();
        let vendor_path = self.vendor.path().to_path_buf();
        let workspace = self
            .workspace
            .close()
            .map_err(|err| WorkspaceError::fs("remove workspace tree", workspace_path, err));
        let vendor = self
            .vendor
            .close()
            .map_err(|err| WorkspaceError::fs("remove vendor tree", vendor_path, err));
        workspace.and(vendor)
    }

    /// Like [`Overlay::close`], but only logs failures. Used when another
    /// error is already on its way out.
    pub fn close_logged(self) {
        if let Err(err) = self.close() {
            warn!("overlay cleanup failed: {:#}", anyhow::Error::from(err));
        }
    }
}

fn allocate(prefix: &str, temp_root: Option<&Path>) -> Result<TempDir, WorkspaceError> {
    let mut builder = Builder::new();
    builder.prefix(prefix);
    match temp_root {
        Some(base) => builder
            .tempdir_in(base)
            .map_err(|err| WorkspaceError::fs("allocate temp dir in", base, err)),
        None => builder
            .tempdir()
            .map_err(|err| WorkspaceError::fs("allocate temp dir in", std::env::temp_dir(), err)),
    }
}

/// Place the project symlink inside `workspace` and return the path the
/// toolchain should run from.
fn link_project(
    workspace: &Path,
    root: &Path,
    import_path: &ImportPath,
) -> Result<PathBuf, WorkspaceError> {
    let src = workspace.join("src");
    if import_path.is_empty() {
        symlink_dir(root, &src).map_err(|err| WorkspaceError::fs("symlink work", &src, err))?;
        return Ok(src);
    }

    let parent: PathBuf = import_path.parent_segments().into_iter().collect();
    let parent = src.join(parent);
    std::fs::create_dir_all(&parent)
        .map_err(|err| WorkspaceError::fs("create workspace src", &parent, err))?;

    let link = src.join(import_path.to_relative_path());
    symlink_dir(root, &link).map_err(|err| WorkspaceError::fs("symlink work", &link, err))?;
    Ok(link)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

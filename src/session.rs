//! One delegated toolchain call: overlay, environment, run, cleanup.

use crate::config::Settings;
use crate::env::{ComposedEnvironment, compose};
use crate::error::WorkspaceError;
use crate::overlay::Overlay;
use crate::root::ProjectRoot;
use crate::runner::{CommandRunner, Invocation};
use std::ffi::OsString;
use tracing::debug;

/// Run `args` through the toolchain with `root` overlaid at its import path.
///
/// The overlay is removed before this returns, whether the toolchain
/// succeeded or not. When both the toolchain and the cleanup fail, the
/// toolchain's error wins and the cleanup failure is only logged.
pub fn run_in_overlay<I, R>(
    root: &ProjectRoot,
    args: Vec<OsString>,
    settings: &Settings,
    inherited: I,
    runner: &mut R,
) -> Result<(), WorkspaceError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
    R: CommandRunner + ?Sized,
{
    let overlay = Overlay::build(root, settings.temp_root.as_deref())?;

    let invocation = match plan(&overlay, args, settings, inherited) {
        Ok(invocation) => invocation,
        Err(err) => {
            overlay.close_logged();
            return Err(err);
        }
    };

    match runner.run(&invocation) {
        Ok(()) => overlay.close(),
        Err(err) => {
            overlay.close_logged();
            Err(err)
        }
    }
}

fn plan<I>(
    overlay: &Overlay,
    args: Vec<OsString>,
    settings: &Settings,
    inherited: I,
) -> Result<Invocation, WorkspaceError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env: ComposedEnvironment = compose(
        inherited,
        &settings.search_path_var,
        overlay.vendor_root(),
        overlay.workspace_root(),
        settings.vendor_only,
    )?;
    // The toolchain trusts $PWD when it names the same directory as the
    // real cwd; point it at the overlay location, not the physical root.
    env.set("PWD", overlay.project_dir());
    debug!(
        search_path = ?env.get(&settings.search_path_var),
        "composed toolchain environment"
    );

    Ok(Invocation {
        program: settings.toolchain.clone(),
        args,
        cwd: overlay.project_dir().to_path_buf(),
        env,
    })
}

//! `gowork` entry point: parse the command line, dispatch, and turn the
//! outcome into an exit status.
//!
//! Errors are reported as a single `gowork: ...` line. Overlay trees are owned
//! by the library call and are already gone by the time `main` decides the
//! exit code, so `std::process::exit` never skips a cleanup.

use anyhow::{Context as _, Result};
use clap::Parser;
use gowork::cli::{Cli, Command};
use gowork::{Context, Settings, SystemRunner, WorkspaceError, commands, logging};
use std::env;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("gowork: {err:#}");
        let code = err
            .downcast_ref::<WorkspaceError>()
            .map(WorkspaceError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        cwd: env::current_dir().context("getwd")?,
        settings: Settings::from_env(cli.vendorall),
        inherited_env: env::vars_os().collect(),
    };
    let mut runner = SystemRunner;

    match cli.command {
        Command::InstallWrapper => {
            let path = commands::install_wrapper(&ctx)?;
            eprintln!("wrote {}", path.display());
        }
        Command::Init { import_path } => {
            commands::init(&ctx, import_path.as_deref())?;
        }
        Command::Get { args } => commands::get(&ctx, args, &mut runner)?,
        Command::Build { args } => commands::build(&ctx, args, &mut runner)?,
        Command::Run { args } => commands::run(&ctx, args, &mut runner)?,
    }
    Ok(())
}

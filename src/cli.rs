//! Command-line surface for the `gowork` binary.

use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(name = "gowork", version)]
#[command(about = "Run the Go toolchain inside an ephemeral GOPATH overlay of the current project")]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    /// Work entirely in the gowork workspace; pass --vendorall=false to also
    /// search the caller's GOPATH (between vendor/ and the project).
    #[arg(
        long,
        global = true,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub vendorall: bool,

    /// Increase log verbosity (-v debug, -vv trace). GOWORK_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Write the gowork bootstrap script (goworkw.sh) into the current directory.
    InstallWrapper,
    /// Mark the current directory as a workspace root, e.g. `gowork init user/mypkg`.
    Init {
        /// Import path the project appears under; omit to overlay at the GOPATH root.
        import_path: Option<String>,
    },
    /// Fetch dependencies into vendor/ (`go get -v -d`).
    Get {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
    /// Build the project into bin/<root-dirname>.
    Build {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
    /// Pass the remaining arguments straight to the toolchain.
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<OsString>,
    },
}

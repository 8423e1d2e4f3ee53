//! gowork: run the Go toolchain as if the current project lived under its
//! import path inside GOPATH.
//!
//! Each delegated command:
//!
//! 1. finds the project root by walking up to the nearest `go.work.conf`
//!    ([`root`]);
//! 2. builds a throwaway workspace tree and vendor tree of symlinks
//!    ([`overlay`]);
//! 3. rebuilds `GOPATH` from those trees ([`env`]);
//! 4. runs the toolchain from the project's position in the overlay
//!    ([`runner`], [`session`]).
//!
//! The overlay never outlives the command.

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod root;
pub mod runner;
pub mod session;
pub mod wrapper;

pub use commands::Context;
pub use config::Settings;
pub use env::{ComposedEnvironment, compose, compose_search_path};
pub use error::WorkspaceError;
pub use overlay::Overlay;
pub use root::{ImportPath, MARKER_FILE, ProjectMarker, ProjectRoot, find_root};
pub use runner::{CommandRunner, Invocation, SystemRunner};
pub use session::run_in_overlay;

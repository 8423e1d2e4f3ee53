//! Subcommand implementations.
//!
//! Each operation takes an explicit [`Context`] instead of reading the
//! process cwd or environment, so the binary and the tests drive exactly the
//! same code.

use crate::config::Settings;
use crate::error::WorkspaceError;
use crate::root::{ImportPath, ProjectMarker, ProjectRoot, ensure_dir, find_root};
use crate::runner::CommandRunner;
use crate::session::run_in_overlay;
use crate::wrapper;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where a command was invoked from and what it inherited.
#[derive(Clone, Debug)]
pub struct Context {
    pub cwd: PathBuf,
    pub settings: Settings,
    pub inherited_env: Vec<(OsString, OsString)>,
}

impl Context {
    fn find_root(&self) -> Result<ProjectRoot, WorkspaceError> {
        find_root(&self.cwd)
    }

    fn delegate(
        &self,
        root: &ProjectRoot,
        args: Vec<OsString>,
        runner: &mut dyn CommandRunner,
    ) -> Result<(), WorkspaceError> {
        run_in_overlay(
            root,
            args,
            &self.settings,
            self.inherited_env.iter().cloned(),
            runner,
        )
    }
}

/// Mark `ctx.cwd` as a project root and make sure `vendor/` exists.
pub fn init(ctx: &Context, import_path: Option<&str>) -> Result<PathBuf, WorkspaceError> {
    let import_path = ImportPath::parse(import_path.unwrap_or_default())?;
    let marker = ProjectMarker { import_path };
    let path = marker.write(&ctx.cwd)?;
    ensure_dir(&ctx.cwd.join(crate::root::VENDOR_DIR), "create vendor")?;
    info!(marker = %path.display(), import_path = %marker.import_path, "initialized workspace");
    Ok(path)
}

/// Fetch dependencies into the project's `vendor/` via `<toolchain> get -v -d`.
pub fn get(
    ctx: &Context,
    extra: Vec<OsString>,
    runner: &mut dyn CommandRunner,
) -> Result<(), WorkspaceError> {
    let root = ctx.find_root()?;
    ensure_dir(&root.vendor_dir(), "create vendor")?;
    let mut args = vec![
        OsString::from("get"),
        OsString::from("-v"),
        OsString::from("-d"),
    ];
    args.extend(extra);
    ctx.delegate(&root, args, runner)
}

/// Build the project into `<root>/bin/<root-dirname>`.
pub fn build(
    ctx: &Context,
    extra: Vec<OsString>,
    runner: &mut dyn CommandRunner,
) -> Result<(), WorkspaceError> {
    let root = ctx.find_root()?;
    ensure_dir(&root.bin_dir(), "create workdir/bin")?;
    let mut args = vec![OsString::from("build")];
    args.extend(extra);
    args.push(OsString::from("-o"));
    args.push(build_output(&root).into_os_string());
    ctx.delegate(&root, args, runner)
}

/// Pass `args` to the toolchain verbatim, e.g. `gowork run test ./...`.
pub fn run(
    ctx: &Context,
    args: Vec<OsString>,
    runner: &mut dyn CommandRunner,
) -> Result<(), WorkspaceError> {
    let root = ctx.find_root()?;
    ctx.delegate(&root, args, runner)
}

pub fn install_wrapper(ctx: &Context) -> Result<PathBuf, WorkspaceError> {
    wrapper::install_wrapper(&ctx.cwd)
}

/// Output path handed to `-o`, relative to the project dir in the overlay.
fn build_output(root: &ProjectRoot) -> PathBuf {
    Path::new("bin").join(root.dir_name())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::root::MARKER_FILE;
    use crate::runner::Invocation;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        seen: Vec<Invocation>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, invocation: &Invocation) -> Result<(), WorkspaceError> {
            assert!(invocation.cwd.is_dir(), "overlay must be live during the run");
            self.seen.push(invocation.clone());
            Ok(())
        }
    }

    struct Fixture {
        project: TempDir,
        scratch: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                project: TempDir::new().unwrap(),
                scratch: TempDir::new().unwrap(),
            }
        }

        fn ctx_at(&self, cwd: &Path) -> Context {
            Context {
                cwd: cwd.to_path_buf(),
                settings: Settings {
                    toolchain: OsString::from("go"),
                    search_path_var: "GOPATH".to_string(),
                    vendor_only: true,
                    temp_root: Some(self.scratch.path().to_path_buf()),
                },
                inherited_env: Vec::new(),
            }
        }

        fn ctx(&self) -> Context {
            self.ctx_at(self.project.path())
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn init_writes_marker_and_vendor() {
        let fixture = Fixture::new();
        let marker = init(&fixture.ctx(), Some("me/app")).unwrap();
        assert_eq!(marker, fixture.project.path().join(MARKER_FILE));
        assert!(fixture.project.path().join("vendor").is_dir());

        let root = find_root(fixture.project.path()).unwrap();
        assert_eq!(root.import_path.as_str(), "me/app");
    }

    #[test]
    fn init_without_import_path_writes_sentinel() {
        let fixture = Fixture::new();
        let marker = init(&fixture.ctx(), None).unwrap();
        assert_eq!(fs::metadata(&marker).unwrap().len(), 0);
    }

    #[test]
    fn init_rejects_bad_import_path_without_writing() {
        let fixture = Fixture::new();
        let err = init(&fixture.ctx(), Some("../up")).unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidImportPath { .. }), "{err}");
        assert!(!fixture.project.path().join(MARKER_FILE).exists());
    }

    #[test]
    fn build_injects_output_path_and_creates_bin() {
        let fixture = Fixture::new();
        init(&fixture.ctx(), Some("me/app")).unwrap();
        let nested = fixture.project.path().join("cmd/tool");
        fs::create_dir_all(&nested).unwrap();

        let mut runner = RecordingRunner::default();
        build(
            &fixture.ctx_at(&nested),
            vec![OsString::from("-race")],
            &mut runner,
        )
        .unwrap();

        let root = find_root(fixture.project.path()).unwrap();
        let expected_output = format!("bin/{}", root.dir_name());
        assert_eq!(
            strings(&runner.seen[0].args),
            vec!["build", "-race", "-o", expected_output.as_str()]
        );
        assert!(runner.seen[0].cwd.ends_with("src/me/app"));
        assert!(root.bin_dir().is_dir());
    }

    #[test]
    fn build_tolerates_existing_bin_dir() {
        let fixture = Fixture::new();
        init(&fixture.ctx(), None).unwrap();
        fs::create_dir_all(fixture.project.path().join("bin")).unwrap();
        let mut runner = RecordingRunner::default();
        build(&fixture.ctx(), Vec::new(), &mut runner).unwrap();
        assert_eq!(runner.seen.len(), 1);
    }

    #[test]
    fn get_uses_download_only_flags_and_ensures_vendor() {
        let fixture = Fixture::new();
        fs::write(fixture.project.path().join(MARKER_FILE), "").unwrap();
        let mut runner = RecordingRunner::default();
        get(
            &fixture.ctx(),
            vec![OsString::from("example.com/dep")],
            &mut runner,
        )
        .unwrap();

        assert_eq!(
            strings(&runner.seen[0].args),
            vec!["get", "-v", "-d", "example.com/dep"]
        );
        assert!(fixture.project.path().join("vendor").is_dir());
    }

    #[test]
    fn run_passes_arguments_verbatim() {
        let fixture = Fixture::new();
        init(&fixture.ctx(), Some("me/app")).unwrap();
        let mut runner = RecordingRunner::default();
        let args = vec![OsString::from("test"), OsString::from("./...")];
        run(&fixture.ctx(), args.clone(), &mut runner).unwrap();
        assert_eq!(runner.seen[0].args, args);
    }

    #[test]
    fn delegating_commands_require_a_workspace() {
        let fixture = Fixture::new();
        let mut runner = RecordingRunner::default();
        let ctx = fixture.ctx();
        for result in [
            get(&ctx, Vec::new(), &mut runner),
            build(&ctx, Vec::new(), &mut runner),
            run(&ctx, Vec::new(), &mut runner),
        ] {
            let err = result.unwrap_err();
            assert!(matches!(err, WorkspaceError::NotInWorkspace { .. }), "{err}");
        }
        assert!(runner.seen.is_empty());
        assert!(!fixture.project.path().join("vendor").exists());
        assert!(!fixture.project.path().join("bin").exists());
    }
}

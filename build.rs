use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=GOWORK_TOOLCHAIN_HINT");

    let hint = env::var("GOWORK_TOOLCHAIN_HINT").ok().filter(|value| !value.is_empty());

    if let Some(raw_hint) = hint {
        // Bare names like "go1.21" do not canonicalize and stay as-is for a
        // PATH lookup at runtime.
        let candidate = PathBuf::from(raw_hint);
        let resolved = candidate.canonicalize().unwrap_or(candidate);

        println!("cargo:rustc-env=GOWORK_TOOLCHAIN_HINT={}", resolved.display());
    }
}

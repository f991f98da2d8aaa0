use std::env;
use std::process::Command;

fn main() {
    // Captured so the run record can report which toolchain produced the
    // binary doing the measuring. Best effort; the field is nullable.
    if let Some(version) = rustc_release() {
        println!("cargo:rustc-env=CARBONRUN_RUSTC_VERSION={version}");
    }
    println!("cargo:rerun-if-changed=build.rs");
}

fn rustc_release() -> Option<String> {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let output = Command::new(rustc).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    // "rustc 1.80.1 (3f5fd8dd4 2024-08-06)" -> "1.80.1"
    String::from_utf8(output.stdout)
        .ok()?
        .split_whitespace()
        .nth(1)
        .map(str::to_owned)
}

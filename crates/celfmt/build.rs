use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Some(version) = output(&rustc, &["--version"]) {
        println!("cargo:rustc-env=CELFMT_RUSTC_VERSION={}", version);
    }

    if let Some(commit) = output("git", &["rev-parse", "HEAD"]) {
        println!("cargo:rustc-env=CELFMT_GIT_COMMIT={}", commit);
    }
    if let Some(time) = output("git", &["log", "-1", "--format=%cI"]) {
        println!("cargo:rustc-env=CELFMT_GIT_COMMIT_TIME={}", time);
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CELFMT_LOG");
}

/// Trimmed stdout of a command that succeeded with non-empty output.
fn output(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// Stages the demo page from `static/` into `dist/` after the wasm-pack build.
use std::process::Command;
use std::{env, fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    // Only run the heavy wasm-pack build when targeting wasm32.
    let target = env::var("TARGET").unwrap_or_default();
    if target == "wasm32-unknown-unknown" {
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "dist/pkg"])
            .status();

        match status {
            Ok(st) if !st.success() => println!("cargo:warning=wasm-pack build failed"),
            Ok(_) => {}
            Err(_) => println!("cargo:warning=wasm-pack not installed – skipping"),
        }
    }

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    let out_dir = Path::new("dist");
    fs::create_dir_all(out_dir).ok();

    let options = CopyOptions {
        overwrite: true,
        content_only: true,
        ..CopyOptions::new()
    };
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=failed to stage static/ into dist/: {err}");
    }
}

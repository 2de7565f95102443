//! Host-side helper: `cargo run` builds the wasm bundle into `static/pkg`
//! and serves the demo page in `static/` for a local preview.

use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

const PORT: &str = "8000";

fn build_bundle() -> Result<(), String> {
    println!("Building WASM pkg …");
    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
        .map_err(|_| {
            "wasm-pack not found in PATH. Install it from https://rustwasm.github.io/wasm-pack/"
                .to_string()
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("wasm-pack exited with {status}"))
    }
}

fn main() -> ExitCode {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return ExitCode::SUCCESS;
    }

    if let Err(err) = build_bundle() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    println!("Serving preview at http://127.0.0.1:{PORT} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            return ExitCode::FAILURE;
        }
    };

    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                eprintln!("http server exited with {status}");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                eprintln!("lost track of http server: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}

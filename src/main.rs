//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` so both samples can be opened in a browser.

use std::io;
use std::process::{Command, ExitCode};

const PORT: &str = "8000";

fn wasm_pack() -> io::Result<bool> {
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()?;
    Ok(status.success())
}

fn serve() -> io::Result<bool> {
    let status = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .status()?;
    Ok(status.success())
}

fn main() -> ExitCode {
    println!("Building WASM pkg …");
    match wasm_pack() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("wasm-pack finished with errors.");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/); serving existing artifacts.");
        }
    }

    println!("WebGL sample:    http://127.0.0.1:{PORT}/index.html");
    println!("Canvas2D sample: http://127.0.0.1:{PORT}/canvas2d.html");
    match serve() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            ExitCode::FAILURE
        }
    }
}

// Copies the static demo pages to `dist/`; wasm-pack output lands in
// `static/pkg` and is carried along when present.
use std::path::Path;

use fs_extra::dir::{copy, create_all, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");
    println!("cargo:rerun-if-changed=shaders");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    // Recreated empty so stale pages do not linger.
    let out_dir = Path::new("dist");
    if let Err(err) = create_all(out_dir, true) {
        println!("cargo:warning=could not prepare dist/: {err}");
        return;
    }

    let options = CopyOptions::new().content_only(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ to dist/ failed: {err}");
    }
}

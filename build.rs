//! Build script to generate the level manifest for WASM builds
//!
//! Scans levels/ and writes levels/manifest.txt with one level file per
//! line, since WASM can't enumerate directories at runtime.

use std::fs;
use std::path::Path;

const MANIFEST: &str = "manifest.txt";

fn main() {
    println!("cargo:rerun-if-changed=levels");

    let levels_dir = Path::new("levels");
    let Ok(entries) = fs::read_dir(levels_dir) else {
        return;
    };

    let mut levels: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".txt") && name != MANIFEST)
        .collect();
    levels.sort();

    let mut manifest = String::new();
    for name in levels {
        manifest.push_str(&name);
        manifest.push('\n');
    }

    let manifest_path = levels_dir.join(MANIFEST);
    // Leave the file alone when nothing changed so it doesn't retrigger the build.
    if fs::read_to_string(&manifest_path).ok().as_deref() == Some(manifest.as_str()) {
        return;
    }
    if let Err(e) = fs::write(&manifest_path, manifest) {
        println!("cargo:warning=could not write {}: {}", manifest_path.display(), e);
    }
}

//! Build script for storefront crate.
//!
//! Fingerprints `static/css/main.css` so templates can append a cache-busting
//! query string (`main.css?v=<hash>`).

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let fingerprint = fs::read(&css_path).map_or_else(
        |e| {
            println!("cargo:warning=Could not read main.css: {e}");
            String::new()
        },
        |content| {
            let digest = format!("{:x}", Sha256::digest(&content));
            digest.chars().take(8).collect()
        },
    );

    println!("cargo:rustc-env=CSS_HASH={fingerprint}");
}

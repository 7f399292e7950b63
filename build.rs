use std::env;
use std::fs;
use std::path::Path;

const VERSION_ENV: &str = "MAKEIP_VERSION";
const VERSION_FILE: &str = "VERSION";

fn main() {
    // MAKEIP_VERSION, then a VERSION file next to Cargo.toml, then the package version
    let version = env::var(VERSION_ENV)
        .ok()
        .or_else(|| {
            Path::new(VERSION_FILE)
                .exists()
                .then(|| fs::read_to_string(VERSION_FILE).ok())
                .flatten()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env={VERSION_ENV}={version}");
    println!("cargo:rerun-if-changed={VERSION_FILE}");
    println!("cargo:rerun-if-env-changed={VERSION_ENV}");
}

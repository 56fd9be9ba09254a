//! Build script for the STM32F411 firmware.
//!
//! Host builds (`cargo test`) need nothing from here. Thumb builds get
//! `memory.x` on the linker search path plus the cortex-m-rt and defmt
//! link scripts.

use std::env;
use std::fs;
use std::path::PathBuf;

const LINK_ARGS: &[&str] = &["--nmagic", "-Tlink.x", "-Tdefmt.x"];

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    let target = env::var("TARGET").unwrap_or_default();
    if !target.starts_with("thumb") {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::copy("memory.x", out_dir.join("memory.x")).expect("memory.x next to Cargo.toml");
    println!("cargo:rustc-link-search={}", out_dir.display());

    for arg in LINK_ARGS {
        println!("cargo:rustc-link-arg-bins={arg}");
    }
}

//! Build script for miotensor
//!
//! Emits link directives for libMIOpen and the HIP runtime when the `miopen`
//! feature is enabled.
//!
//! # Environment Variables
//!
//! - `ROCM_PATH`: Custom ROCm installation path (optional, defaults to `/opt/rocm`)

fn main() {
    // Only link the ROCm libraries when the miopen feature is enabled
    #[cfg(feature = "miopen")]
    link_rocm();
}

#[cfg(feature = "miopen")]
fn link_rocm() {
    use std::env;
    use std::path::PathBuf;

    println!("cargo:rerun-if-env-changed=ROCM_PATH");

    let rocm = env::var("ROCM_PATH").unwrap_or_else(|_| "/opt/rocm".to_string());
    let lib_dir = PathBuf::from(&rocm).join("lib");

    if !lib_dir.exists() {
        println!(
            "cargo:warning=ROCm library directory {} not found; set ROCM_PATH",
            lib_dir.display()
        );
    }

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=dylib=MIOpen");
    println!("cargo:rustc-link-lib=dylib=amdhip64");
}

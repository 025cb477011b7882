//! Build script for proto compilation.
//!
//! The provider protocol types are generated into `OUT_DIR` at build time
//! and included from `src/generated.rs`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_prost_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["proto/provider.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/provider.proto");

    Ok(())
}

use std::env;
use std::fs;
use std::path::Path;

/// Copies the workspace `config.toml` next to the built binary
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let (Ok(out_dir), Ok(profile)) = (env::var("OUT_DIR"), env::var("PROFILE")) else {
        return;
    };

    // OUT_DIR is target/<profile>/build/<crate>-<hash>/out
    let out_path = Path::new(&out_dir);
    let Some(target_dir) = out_path.ancestors().find(|p| p.ends_with(&profile)) else {
        println!("cargo:warning=Could not find target profile directory, config.toml not copied");
        return;
    };

    let Some(workspace_root) = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
    else {
        return;
    };

    let source_config = workspace_root.join("config.toml");
    let dest_config = target_dir.join("config.toml");

    if source_config.exists() {
        match fs::copy(&source_config, &dest_config) {
            Ok(_) => println!("cargo:warning=Copied config.toml to {:?}", dest_config),
            Err(e) => println!("cargo:warning=Failed to copy config.toml: {}", e),
        }
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, using embedded default",
            source_config
        );
    }
}

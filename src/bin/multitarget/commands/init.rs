//! `multitarget init` command

use anyhow::{bail, Context, Result};

use crate::cli::InitArgs;
use multitarget::core::manifest::{generate_default_manifest, MANIFEST_NAME};

pub fn execute(args: InitArgs) -> Result<()> {
    let dir = &args.path;
    let manifest_path = dir.join(MANIFEST_NAME);

    if manifest_path.exists() {
        bail!("{} already exists", manifest_path.display());
    }

    let name = match args.name {
        Some(name) => name,
        None => dir
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", dir.display()))?
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .context("could not derive a project name, pass --name")?,
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    std::fs::write(&manifest_path, generate_default_manifest(&name))
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    for source_set in ["commonMain", "commonTest"] {
        let kotlin = dir.join("src").join(source_set).join("kotlin");
        std::fs::create_dir_all(&kotlin)
            .with_context(|| format!("failed to create directory: {}", kotlin.display()))?;
    }

    eprintln!("     Created project `{}`", name);
    Ok(())
}

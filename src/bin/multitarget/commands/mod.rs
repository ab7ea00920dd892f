//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::OutputFormat;
use multitarget::ops::{load_project, LoadedProject};
use multitarget::util::diagnostic::suggestions;
use multitarget::GlobalContext;

pub mod completions;
pub mod init;
pub mod presets;
pub mod publications;
pub mod source_sets;
pub mod targets;
pub mod tasks;

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub manifest_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub color: bool,
}

/// Locate the manifest, load configuration and evaluate the project.
pub fn load(global: &GlobalOpts) -> Result<LoadedProject> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_color(global.color);

    let manifest_path = match &global.manifest_path {
        Some(path) => path.clone(),
        None => ctx.find_manifest().ok_or_else(|| {
            anyhow::anyhow!(
                "could not find Multitarget.toml in {} or any parent directory\n{}",
                ctx.cwd().display(),
                suggestions::NO_MANIFEST
            )
        })?,
    };

    let root = manifest_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ctx.cwd().to_path_buf());
    let config = ctx.load_config(&root);

    load_project(&manifest_path, config)
        .with_context(|| format!("failed to load {}", manifest_path.display()))
}

/// Print `value` as JSON or through `text`.
pub fn print<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}

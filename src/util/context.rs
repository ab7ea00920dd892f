//! Global context for Multitarget operations.
//!
//! Provides centralized access to the working directory, output settings
//! and configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::find_manifest;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file, if a home directory is known
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different global config file, or none.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Multitarget.toml in the working directory or a parent.
    pub fn find_manifest(&self) -> Option<PathBuf> {
        find_manifest(&self.cwd)
    }

    /// Merged global and project configuration for a project rooted at
    /// `project_root`.
    pub fn load_config(&self, project_root: &Path) -> Config {
        load_config(
            self.global_config.as_deref(),
            &project_config_path(project_root),
        )
    }
}

//! `multitarget targets` command

use anyhow::Result;

use super::{load, print, GlobalOpts};
use crate::cli::TargetsArgs;
use multitarget::ops::report;
use multitarget::ModelError;

pub fn execute(args: TargetsArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    let mut reports = report::targets(&loaded.project);

    if let Some(name) = &args.target {
        reports.retain(|t| &t.name == name);
        if reports.is_empty() {
            return Err(ModelError::UnknownTarget(name.clone()).into());
        }
    }

    print(global.format, reports.as_slice(), report::format_targets)
}

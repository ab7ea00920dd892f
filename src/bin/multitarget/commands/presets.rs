//! `multitarget presets` command

use anyhow::Result;

use super::{load, print, GlobalOpts};
use multitarget::ops::report;

pub fn execute(global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    let reports = report::presets(loaded.multiplatform.presets());

    print(global.format, reports.as_slice(), report::format_presets)
}

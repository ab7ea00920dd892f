//! `multitarget source-sets` command

use anyhow::Result;

use super::{load, print, GlobalOpts};
use multitarget::ops::report;

pub fn execute(global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    let reports = report::source_sets(&loaded.project)?;

    print(global.format, reports.as_slice(), report::format_source_sets)
}

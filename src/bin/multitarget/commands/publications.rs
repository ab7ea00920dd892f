//! `multitarget publications` command

use anyhow::Result;

use super::{load, print, GlobalOpts};
use multitarget::ops::report;

pub fn execute(global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    let reports = report::publications(&loaded.project);

    if reports.is_empty() {
        tracing::warn!("No publications: apply the `maven-publish` plugin to publish targets");
    }

    print(global.format, reports.as_slice(), report::format_publications)
}

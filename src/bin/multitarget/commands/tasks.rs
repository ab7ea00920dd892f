//! `multitarget tasks` command

use anyhow::Result;

use super::{load, print, GlobalOpts};
use crate::cli::TasksArgs;
use multitarget::core::TaskDecision;
use multitarget::ops::report;

pub fn execute(args: TasksArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    let mut reports = report::tasks(&loaded.project)?;

    if args.skipped {
        reports.retain(|t| matches!(t.decision, TaskDecision::Skip(_)));
    }

    print(global.format, reports.as_slice(), report::format_tasks)
}

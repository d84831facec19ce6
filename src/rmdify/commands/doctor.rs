use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore + ?Sized>(store: &mut S) -> Result<CmdResult> {
    let report = store.doctor()?;
    let mut result = CmdResult::default();

    if report.is_clean() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found:"));
        if report.dropped_missing > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} id(s) listed in the index with no stored document.",
                report.dropped_missing
            )));
        }
        if report.reindexed_orphans > 0 {
            result.add_message(CmdMessage::success(format!(
                "  - Re-indexed {} stored document(s) missing from the index.",
                report.reindexed_orphans
            )));
        }
        if report.dropped_dangling_stars > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} star(s) pointing at unknown documents.",
                report.dropped_dangling_stars
            )));
        }
        if report.corrupt_records > 0 {
            result.add_message(CmdMessage::warning(format!(
                "  - {} stored document(s) could not be read and were left untouched.",
                report.corrupt_records
            )));
        }
    }

    result.doctor_report = Some(report);
    Ok(result)
}

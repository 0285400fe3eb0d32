//! Audit CLI command

use crate::audit::AuditLogger;
use crate::config::CheckbookPaths;
use crate::error::CheckbookResult;

/// Handle `checkbook audit`, printing the most recent entries oldest first
pub fn handle_audit_command(paths: &CheckbookPaths, count: usize) -> CheckbookResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(count)?;

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}

//! `audit` command handler

use std::io::Write;

use crate::audit::AuditLogger;
use crate::error::FinanceResult;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(
    logger: &AuditLogger,
    limit: usize,
    out: &mut impl Write,
) -> FinanceResult<()> {
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        writeln!(out, "Audit log is empty.")?;
        return Ok(());
    }

    writeln!(
        out,
        "Showing {} most recent audit entries ({}):",
        entries.len(),
        logger.path().display()
    )?;
    for entry in &entries {
        writeln!(out, "{}", entry.format_human_readable())?;
    }
    Ok(())
}

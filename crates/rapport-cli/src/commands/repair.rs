//! Repair command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::Service;

/// Execute the repair command.
pub fn execute_repair(service: &Service, formatter: &Formatter) -> Result<String> {
    let report = service.repair_symmetry()?;
    formatter.format_repair(&report)
}

//! Platforms command handler.

use anyhow::Result;

use crate::presentation::format_platforms;

/// Execute the platforms command.
pub fn execute() -> Result<()> {
    print!("{}", format_platforms());
    Ok(())
}

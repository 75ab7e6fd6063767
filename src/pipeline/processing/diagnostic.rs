use crate::error::Result;
use crate::pipeline::storage::read_snapshot;
use crate::types::EnrichedRow;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Landing-pad coverage of a snapshot.
///
/// `rows` is the figure the old report printed: it counted every entry of the
/// column, not the empty ones. `missing` is the actual null count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LandingPadReport {
    pub rows: usize,
    pub populated: usize,
    pub missing: usize,
}

impl fmt::Display for LandingPadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LandingPad entries (legacy row count): {}", self.rows)?;
        writeln!(f, "LandingPad populated: {}", self.populated)?;
        write!(f, "LandingPad missing: {}", self.missing)
    }
}

pub fn landing_pad_report(raw_path: &Path) -> Result<LandingPadReport> {
    let rows = read_snapshot(raw_path)?;
    Ok(summarize_landing_pads(&rows))
}

pub fn summarize_landing_pads(rows: &[EnrichedRow]) -> LandingPadReport {
    let populated = rows.iter().filter(|r| r.landing_pad.is_some()).count();
    LandingPadReport {
        rows: rows.len(),
        populated,
        missing: rows.len() - populated,
    }
}

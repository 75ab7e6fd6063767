use crate::error::Result;
use crate::pipeline::storage::{read_snapshot, write_snapshot};
use crate::types::EnrichedRow;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// What the finalizer changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizeSummary {
    pub rows_in: usize,
    pub rows_dropped: usize,
    pub rows_out: usize,
    pub payload_mass_imputed: usize,
    pub payload_mass_mean: Option<f64>,
}

/// Load the raw snapshot, clean it, and write the processed snapshot
#[instrument]
pub fn finalize(raw_path: &Path, processed_path: &Path, legacy_booster: &str) -> Result<FinalizeSummary> {
    let rows = read_snapshot(raw_path)?;
    let (rows, summary) = finalize_rows(rows, legacy_booster);
    write_snapshot(processed_path, &rows)?;

    info!(
        "✅ Finalized {} rows ({} {} rows dropped, {} payload masses imputed) into {}",
        summary.rows_out,
        summary.rows_dropped,
        legacy_booster,
        summary.payload_mass_imputed,
        processed_path.display()
    );
    Ok(summary)
}

/// Drop `legacy_booster` rows, renumber `FlightNumber` 1..N in row order and
/// fill missing payload masses with the mean of the present ones.
pub fn finalize_rows(rows: Vec<EnrichedRow>, legacy_booster: &str) -> (Vec<EnrichedRow>, FinalizeSummary) {
    let rows_in = rows.len();
    let mut kept: Vec<EnrichedRow> = rows
        .into_iter()
        .filter(|row| row.booster_version.as_deref() != Some(legacy_booster))
        .collect();

    for (i, row) in kept.iter_mut().enumerate() {
        row.flight_number = (i + 1) as u32;
    }

    let mean = payload_mass_mean(&kept);
    let mut imputed = 0;
    match mean {
        Some(mean) => {
            for row in kept.iter_mut().filter(|r| r.payload_mass.is_none()) {
                row.payload_mass = Some(mean);
                imputed += 1;
            }
        }
        None if !kept.is_empty() => {
            warn!("No payload masses present; PayloadMass left empty");
        }
        None => {}
    }

    let summary = FinalizeSummary {
        rows_in,
        rows_dropped: rows_in - kept.len(),
        rows_out: kept.len(),
        payload_mass_imputed: imputed,
        payload_mass_mean: mean,
    };
    (kept, summary)
}

fn payload_mass_mean(rows: &[EnrichedRow]) -> Option<f64> {
    let masses: Vec<f64> = rows.iter().filter_map(|r| r.payload_mass).collect();
    if masses.is_empty() {
        None
    } else {
        Some(masses.iter().sum::<f64>() / masses.len() as f64)
    }
}

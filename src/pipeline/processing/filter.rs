use super::flatten::FlatTable;
use crate::error::{EtlError, Result};
use crate::types::{CoreUsage, LaunchRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, info};

/// Listing columns the rest of the pipeline reads
pub const LAUNCH_COLUMNS: [&str; 6] = [
    "rocket",
    "payloads",
    "launchpad",
    "cores",
    "flight_number",
    "date_utc",
];

/// Keep single-core, single-payload launches dated on or before `cutoff`.
///
/// The singleton lists are unwrapped and the UTC calendar date is derived
/// from `date_utc`. An empty table yields no launches.
pub fn filter_launches(table: &FlatTable, cutoff: NaiveDate) -> Result<Vec<LaunchRecord>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    for column in LAUNCH_COLUMNS {
        if !table.has_column(column) {
            return Err(EtlError::MissingColumn(column.to_string()));
        }
    }

    let mut launches = Vec::new();
    let (mut multi_core, mut multi_payload, mut late) = (0usize, 0usize, 0usize);

    for row in 0..table.len() {
        let cores = list_cell(table, row, "cores")?;
        if cores.len() != 1 {
            multi_core += 1;
            continue;
        }
        let payloads = list_cell(table, row, "payloads")?;
        if payloads.len() != 1 {
            multi_payload += 1;
            continue;
        }

        let date = parse_date_utc(table.cell(row, "date_utc"))?.date_naive();
        if date > cutoff {
            late += 1;
            continue;
        }
        let core: CoreUsage = serde_json::from_value(cores[0].clone())?;

        let flight_number = table
            .cell(row, "flight_number")
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| EtlError::MissingField(format!("flight_number in row {}", row)))?;

        launches.push(LaunchRecord {
            rocket: id_string(table.cell(row, "rocket")),
            payload: id_string(&payloads[0]),
            launchpad: id_string(table.cell(row, "launchpad")),
            core,
            flight_number,
            date,
        });
    }

    debug!(
        "Dropped {} multi-core, {} multi-payload and {} post-cutoff launches",
        multi_core, multi_payload, late
    );
    info!(
        "✅ Kept {} of {} launches on or before {}",
        launches.len(),
        table.len(),
        cutoff
    );
    Ok(launches)
}

fn list_cell<'a>(table: &'a FlatTable, row: usize, column: &str) -> Result<&'a Vec<Value>> {
    table.cell(row, column).as_array().ok_or_else(|| {
        EtlError::UnexpectedShape(format!("{} in row {} is not a list", column, row))
    })
}

fn parse_date_utc(value: &Value) -> Result<DateTime<Utc>> {
    let raw = value
        .as_str()
        .ok_or_else(|| EtlError::MissingField("date_utc".into()))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EtlError::Date {
            value: raw.to_string(),
            message: e.to_string(),
        })
}

/// Resource ids are strings; `null` reads as empty
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

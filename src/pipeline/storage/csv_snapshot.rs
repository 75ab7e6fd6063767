use crate::constants::SNAPSHOT_COLUMNS;
use crate::error::{EtlError, Result};
use crate::types::EnrichedRow;
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Write rows as a snapshot: a header whose first field is blank, then a
/// 0-based row index ahead of the `SNAPSHOT_COLUMNS` fields. Missing values
/// are empty fields and booleans are spelled `True`/`False`.
pub fn write_snapshot(path: &Path, rows: &[EnrichedRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| EtlError::io(parent, e))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec![""];
    header.extend(SNAPSHOT_COLUMNS);
    writer.write_record(&header)?;

    for (index, row) in rows.iter().enumerate() {
        let mut record = vec![index.to_string()];
        record.extend(to_fields(row));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| EtlError::io(path, e))?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Read a snapshot back. Columns are matched by name, so extra columns
/// (including the index) are ignored.
///
/// Text cells come back verbatim and only an empty one reads as missing.
/// Numeric, boolean and date cells are trimmed, and `nan` is missing there.
pub fn read_snapshot(path: &Path) -> Result<Vec<EnrichedRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::new(&headers)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(columns.parse_row(&record, line)?);
    }
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Header names of a snapshot file, index column included
pub fn read_snapshot_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

fn to_fields(row: &EnrichedRow) -> Vec<String> {
    vec![
        row.flight_number.to_string(),
        row.date.format("%Y-%m-%d").to_string(),
        opt(&row.booster_version),
        opt(&row.payload_mass),
        opt(&row.orbit),
        opt(&row.launch_site),
        row.outcome.clone(),
        opt(&row.flights),
        opt_bool(row.grid_fins),
        opt_bool(row.reused),
        opt_bool(row.legs),
        opt(&row.landing_pad),
        opt(&row.block),
        opt(&row.reused_count),
        opt(&row.serial),
        opt(&row.longitude),
        opt(&row.latitude),
    ]
}

fn opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn opt_bool(value: Option<bool>) -> String {
    match value {
        Some(true) => "True".to_string(),
        Some(false) => "False".to_string(),
        None => String::new(),
    }
}

struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self> {
        let mut positions = HashMap::new();
        for column in SNAPSHOT_COLUMNS {
            let position = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| EtlError::MissingColumn(column.to_string()))?;
            positions.insert(column, position);
        }
        Ok(Self { positions })
    }

    fn field<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }

    fn parse_row(&self, record: &StringRecord, line: usize) -> Result<EnrichedRow> {
        let cell = |column: &'static str| Cell {
            column,
            line,
            value: self.field(record, column),
        };

        Ok(EnrichedRow {
            flight_number: cell("FlightNumber")
                .u32()?
                .ok_or_else(|| EtlError::MissingField(format!("FlightNumber on row {}", line)))?,
            date: cell("Date").date()?,
            booster_version: cell("BoosterVersion").string(),
            payload_mass: cell("PayloadMass").f64()?,
            orbit: cell("Orbit").string(),
            launch_site: cell("LaunchSite").string(),
            outcome: cell("Outcome").value.to_string(),
            flights: cell("Flights").u32()?,
            grid_fins: cell("GridFins").bool()?,
            reused: cell("Reused").bool()?,
            legs: cell("Legs").bool()?,
            landing_pad: cell("LandingPad").string(),
            block: cell("Block").u32()?,
            reused_count: cell("ReusedCount").u32()?,
            serial: cell("Serial").string(),
            longitude: cell("Longitude").f64()?,
            latitude: cell("Latitude").f64()?,
        })
    }
}

/// One field of one record, with enough context for an error message
struct Cell<'r> {
    column: &'static str,
    line: usize,
    value: &'r str,
}

impl<'r> Cell<'r> {
    fn trimmed(&self) -> &'r str {
        self.value.trim()
    }

    fn is_missing(&self) -> bool {
        let value = self.trimmed();
        value.is_empty() || value.eq_ignore_ascii_case("nan")
    }

    fn invalid(&self, expected: &str) -> EtlError {
        EtlError::UnexpectedShape(format!(
            "{} on row {}: '{}' is not {}",
            self.column, self.line, self.value, expected
        ))
    }

    fn string(&self) -> Option<String> {
        (!self.value.is_empty()).then(|| self.value.to_string())
    }

    fn f64(&self) -> Result<Option<f64>> {
        if self.is_missing() {
            return Ok(None);
        }
        self.trimmed()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| self.invalid("a number"))
    }

    /// Accepts `5` and float spellings such as `5.0`
    fn u32(&self) -> Result<Option<u32>> {
        match self.f64()? {
            None => Ok(None),
            Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => {
                Ok(Some(v as u32))
            }
            Some(_) => Err(self.invalid("a whole number")),
        }
    }

    fn bool(&self) -> Result<Option<bool>> {
        if self.is_missing() {
            return Ok(None);
        }
        match self.trimmed().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(self.invalid("a boolean")),
        }
    }

    fn date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.trimmed(), "%Y-%m-%d").map_err(|e| EtlError::Date {
            value: self.value.to_string(),
            message: e.to_string(),
        })
    }
}

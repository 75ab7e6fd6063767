use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One launch after filtering: exactly one payload and one core-usage entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    /// Empty when the listing carried no rocket id
    pub rocket: String,
    pub payload: String,
    pub launchpad: String,
    pub core: CoreUsage,
    pub flight_number: u32,
    /// UTC calendar date of `date_utc`
    pub date: NaiveDate,
}

/// A single booster core's role in one launch, as embedded in the listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreUsage {
    pub core: Option<String>,
    pub flight: Option<u32>,
    pub gridfins: Option<bool>,
    pub reused: Option<bool>,
    pub legs: Option<bool>,
    pub landpad: Option<String>,
    pub landing_success: Option<bool>,
    pub landing_type: Option<String>,
}

impl CoreUsage {
    pub fn outcome(&self) -> LandingOutcome {
        LandingOutcome {
            success: self.landing_success,
            kind: self.landing_type.clone(),
        }
    }
}

/// Landing result of a core.
///
/// Renders as `"<success> <type>"` with `True`/`False`/`None` spellings, which
/// is the format the `Outcome` column has always used (`"True ASDS"`,
/// `"None None"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandingOutcome {
    pub success: Option<bool>,
    pub kind: Option<String>,
}

impl fmt::Display for LandingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let success = match self.success {
            Some(true) => "True",
            Some(false) => "False",
            None => "None",
        };
        write!(f, "{} {}", success, self.kind.as_deref().unwrap_or("None"))
    }
}

/// `GET /rockets/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RocketDoc {
    pub name: String,
}

/// `GET /launchpads/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchpadDoc {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// `GET /payloads/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadDoc {
    pub mass_kg: Option<f64>,
    pub orbit: Option<String>,
}

/// `GET /cores/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct CoreDoc {
    pub block: Option<u32>,
    pub reuse_count: Option<u32>,
    pub serial: Option<String>,
}

/// One row of the raw and processed snapshots.
///
/// Lookup-derived fields are optional so a skipped lookup leaves a gap in its
/// own row rather than in a neighbour's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub flight_number: u32,
    pub date: NaiveDate,
    pub booster_version: Option<String>,
    pub payload_mass: Option<f64>,
    pub orbit: Option<String>,
    pub launch_site: Option<String>,
    pub outcome: String,
    pub flights: Option<u32>,
    pub grid_fins: Option<bool>,
    pub reused: Option<bool>,
    pub legs: Option<bool>,
    pub landing_pad: Option<String>,
    pub block: Option<u32>,
    pub reused_count: Option<u32>,
    pub serial: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl EnrichedRow {
    /// Row seeded from the listing alone; lookups fill in the rest.
    pub fn from_launch(launch: &LaunchRecord) -> Self {
        let core = &launch.core;
        Self {
            flight_number: launch.flight_number,
            date: launch.date,
            booster_version: None,
            payload_mass: None,
            orbit: None,
            launch_site: None,
            outcome: core.outcome().to_string(),
            flights: core.flight,
            grid_fins: core.gridfins,
            reused: core.reused,
            legs: core.legs,
            landing_pad: core.landpad.clone(),
            block: None,
            reused_count: None,
            serial: None,
            longitude: None,
            latitude: None,
        }
    }
}

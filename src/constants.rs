/// Default locations and values used when no config file overrides them

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

// Interchange files
pub const DEFAULT_URLS_PATH: &str = "data/external/urls.txt";
pub const DEFAULT_RAW_CSV_PATH: &str = "data/raw/Falcon_1-9.csv";
pub const DEFAULT_PROCESSED_CSV_PATH: &str = "data/processed/Falcon_9.csv";

// Remote API
pub const DEFAULT_API_BASE: &str = "https://api.spacexdata.com/v4";
pub const API_BASE_ENV: &str = "FALCON_ETL_API_BASE";

/// Launches dated after this day are dropped by the filter
pub const DEFAULT_CUTOFF_DATE: &str = "2020-11-13";

/// Booster generation removed from the processed snapshot
pub const LEGACY_BOOSTER: &str = "Falcon 1";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

// Auxiliary resources, as path segments under the API base
pub const ROCKETS_RESOURCE: &str = "rockets";
pub const LAUNCHPADS_RESOURCE: &str = "launchpads";
pub const PAYLOADS_RESOURCE: &str = "payloads";
pub const CORES_RESOURCE: &str = "cores";

/// Column order of the enriched snapshots
pub const SNAPSHOT_COLUMNS: [&str; 17] = [
    "FlightNumber",
    "Date",
    "BoosterVersion",
    "PayloadMass",
    "Orbit",
    "LaunchSite",
    "Outcome",
    "Flights",
    "GridFins",
    "Reused",
    "Legs",
    "LandingPad",
    "Block",
    "ReusedCount",
    "Serial",
    "Longitude",
    "Latitude",
];

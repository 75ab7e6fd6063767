use crate::app::ports::HttpClientPort;
use crate::config::ApiConfig;
use crate::constants::{CORES_RESOURCE, LAUNCHPADS_RESOURCE, PAYLOADS_RESOURCE, ROCKETS_RESOURCE};
use crate::error::Result;
use crate::pipeline::storage::write_snapshot;
use crate::types::{CoreDoc, EnrichedRow, LaunchpadDoc, LaunchRecord, PayloadDoc, RocketDoc};
use metrics::{counter, histogram};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Joins filtered launches against the rocket, launchpad, payload and core
/// endpoints.
///
/// Lookups run one category at a time, one request per launch, and every
/// result is written into the row it was fetched for. A launch with an empty
/// id simply keeps that category's fields empty.
pub struct Enricher<'a> {
    http: &'a dyn HttpClientPort,
    api: &'a ApiConfig,
}

impl<'a> Enricher<'a> {
    pub fn new(http: &'a dyn HttpClientPort, api: &'a ApiConfig) -> Self {
        Self { http, api }
    }

    /// Enrich `launches` and write the result as the raw snapshot
    #[instrument(skip(self, launches), fields(launches = launches.len()))]
    pub async fn run(&self, launches: &[LaunchRecord], raw_path: &Path) -> Result<Vec<EnrichedRow>> {
        let rows = self.enrich(launches).await?;
        write_snapshot(raw_path, &rows)?;
        info!("💾 Saved {} enriched rows to {}", rows.len(), raw_path.display());
        Ok(rows)
    }

    pub async fn enrich(&self, launches: &[LaunchRecord]) -> Result<Vec<EnrichedRow>> {
        let started = Instant::now();
        let mut rows: Vec<EnrichedRow> = launches.iter().map(EnrichedRow::from_launch).collect();

        progress("Beginning Rocket Data Treatment...");
        for (row, launch) in rows.iter_mut().zip(launches) {
            if launch.rocket.is_empty() {
                continue;
            }
            let rocket: RocketDoc = self.lookup(ROCKETS_RESOURCE, &launch.rocket).await?;
            row.booster_version = Some(rocket.name);
        }

        progress("Beginning Launchpad Data Treatment...");
        for (row, launch) in rows.iter_mut().zip(launches) {
            if launch.launchpad.is_empty() {
                continue;
            }
            let pad: LaunchpadDoc = self.lookup(LAUNCHPADS_RESOURCE, &launch.launchpad).await?;
            row.longitude = Some(pad.longitude);
            row.latitude = Some(pad.latitude);
            row.launch_site = Some(pad.name);
        }

        progress("Beginning Payload Data Treatment...");
        for (row, launch) in rows.iter_mut().zip(launches) {
            if launch.payload.is_empty() {
                continue;
            }
            let payload: PayloadDoc = self.lookup(PAYLOADS_RESOURCE, &launch.payload).await?;
            row.payload_mass = payload.mass_kg;
            row.orbit = payload.orbit;
        }

        progress("Beginning Core Data Treatment...");
        for (row, launch) in rows.iter_mut().zip(launches) {
            // Outcome, flights, flags and landing pad were taken from the
            // listing when the row was seeded
            let Some(core_id) = launch.core.core.as_deref() else {
                continue;
            };
            let core: CoreDoc = self.lookup(CORES_RESOURCE, core_id).await?;
            row.block = core.block;
            row.reused_count = core.reuse_count;
            row.serial = core.serial;
        }

        progress("Building Dataframe...");
        counter!("falcon_rows_enriched_total").increment(rows.len() as u64);
        histogram!("falcon_enrich_duration_seconds").record(started.elapsed().as_secs_f64());
        Ok(rows)
    }

    async fn lookup<T: DeserializeOwned>(&self, resource: &'static str, id: &str) -> Result<T> {
        let url = self.api.resource_url(resource, id);
        debug!("Looking up {} {}", resource, id);
        counter!("falcon_lookups_total", "resource" => resource).increment(1);
        let response = self.http.get(&url).await?.error_for_status()?;
        response.json()
    }
}

/// Stage banners go to the console through the tracing layer
fn progress(message: &str) {
    info!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpGetResult;
    use crate::error::EtlError;
    use crate::types::CoreUsage;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    const BASE: &str = "http://api.test/v4";

    /// Serves canned JSON by URL and remembers what was asked for
    struct MockApi {
        documents: HashMap<String, Value>,
        requested: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn new() -> Self {
            let mut documents = HashMap::new();
            let mut add = |path: &str, doc: Value| {
                documents.insert(format!("{}/{}", BASE, path), doc);
            };
            add("rockets/falcon1", json!({ "name": "Falcon 1", "height": { "meters": 22.25 } }));
            add("rockets/falcon9", json!({ "name": "Falcon 9" }));
            add(
                "launchpads/kwaj",
                json!({ "name": "Kwajalein Atoll", "longitude": 167.7431292, "latitude": 9.0477206 }),
            );
            add(
                "launchpads/slc40",
                json!({ "name": "CCSFS SLC 40", "longitude": -80.577366, "latitude": 28.5618571 }),
            );
            add("payloads/demosat", json!({ "mass_kg": 20, "orbit": "LEO" }));
            add("payloads/dragon", json!({ "mass_kg": null, "orbit": "LEO" }));
            add("payloads/ses8", json!({ "mass_kg": 3170, "orbit": "GTO" }));
            add("cores/b1003", json!({ "block": 1, "reuse_count": 0, "serial": "B1003" }));
            add("cores/b1049", json!({ "block": 5, "reuse_count": 3, "serial": "B1049" }));
            Self {
                documents,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClientPort for MockApi {
        async fn get(&self, url: &str) -> Result<HttpGetResult> {
            self.requested.lock().unwrap().push(url.to_string());
            let (status, body) = match self.documents.get(url) {
                Some(doc) => (200, doc.to_string()),
                None => (404, r#"{"error":"Not Found"}"#.to_string()),
            };
            Ok(HttpGetResult {
                url: url.to_string(),
                status,
                bytes: body.into_bytes(),
            })
        }
    }

    fn api_config() -> ApiConfig {
        ApiConfig {
            base_url: BASE.to_string(),
            ..ApiConfig::default()
        }
    }

    fn launch(flight: u32, rocket: &str, payload: &str, pad: &str, core: CoreUsage) -> LaunchRecord {
        LaunchRecord {
            rocket: rocket.to_string(),
            payload: payload.to_string(),
            launchpad: pad.to_string(),
            core,
            flight_number: flight,
            date: NaiveDate::from_ymd_opt(2010 + flight as i32 % 10, 6, 4).unwrap(),
        }
    }

    fn landed_core(id: &str) -> CoreUsage {
        CoreUsage {
            core: Some(id.to_string()),
            flight: Some(4),
            gridfins: Some(true),
            reused: Some(true),
            legs: Some(true),
            landpad: Some("5e9e3032383ecb6bb234e7ca".into()),
            landing_success: Some(true),
            landing_type: Some("ASDS".into()),
        }
    }

    fn anonymous_core() -> CoreUsage {
        CoreUsage {
            core: None,
            flight: Some(1),
            gridfins: Some(false),
            reused: Some(false),
            legs: Some(false),
            landpad: Some("pad-without-core".into()),
            landing_success: None,
            landing_type: None,
        }
    }

    #[tokio::test]
    async fn test_enrich_joins_all_four_resources() {
        let http = MockApi::new();
        let api = api_config();
        let launches = vec![launch(70, "falcon9", "ses8", "slc40", landed_core("b1049"))];

        let rows = Enricher::new(&http, &api).enrich(&launches).await.unwrap();
        let row = &rows[0];
        assert_eq!(row.flight_number, 70);
        assert_eq!(row.booster_version.as_deref(), Some("Falcon 9"));
        assert_eq!(row.payload_mass, Some(3170.0));
        assert_eq!(row.orbit.as_deref(), Some("GTO"));
        assert_eq!(row.launch_site.as_deref(), Some("CCSFS SLC 40"));
        assert_eq!(row.longitude, Some(-80.577366));
        assert_eq!(row.latitude, Some(28.5618571));
        assert_eq!(row.outcome, "True ASDS");
        assert_eq!(row.flights, Some(4));
        assert_eq!(row.block, Some(5));
        assert_eq!(row.reused_count, Some(3));
        assert_eq!(row.serial.as_deref(), Some("B1049"));
    }

    #[tokio::test]
    async fn test_absent_core_id_skips_core_lookup_only() {
        let http = MockApi::new();
        let api = api_config();
        let launches = vec![launch(1, "falcon1", "demosat", "kwaj", anonymous_core())];

        let rows = Enricher::new(&http, &api).enrich(&launches).await.unwrap();
        let row = &rows[0];
        assert_eq!(row.block, None);
        assert_eq!(row.reused_count, None);
        assert_eq!(row.serial, None);
        assert_eq!(row.outcome, "None None");
        assert_eq!(row.flights, Some(1));
        assert_eq!(row.grid_fins, Some(false));
        assert_eq!(row.reused, Some(false));
        assert_eq!(row.legs, Some(false));
        assert_eq!(row.landing_pad.as_deref(), Some("pad-without-core"));
        assert!(!http.requested().iter().any(|u| u.contains("/cores/")));
    }

    #[tokio::test]
    async fn test_empty_rocket_id_does_not_shift_other_rows() {
        let http = MockApi::new();
        let api = api_config();
        let launches = vec![
            launch(1, "falcon1", "demosat", "kwaj", anonymous_core()),
            launch(2, "", "demosat", "kwaj", anonymous_core()),
            launch(3, "falcon9", "dragon", "slc40", landed_core("b1003")),
        ];

        let rows = Enricher::new(&http, &api).enrich(&launches).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].booster_version.as_deref(), Some("Falcon 1"));
        assert_eq!(rows[1].booster_version, None);
        assert_eq!(rows[2].booster_version.as_deref(), Some("Falcon 9"));
        assert_eq!(rows[1].launch_site.as_deref(), Some("Kwajalein Atoll"));
        assert_eq!(rows[2].payload_mass, None);
        assert_eq!(rows[2].orbit.as_deref(), Some("LEO"));
        assert_eq!(
            http.requested()
                .iter()
                .filter(|u| u.contains("/rockets/"))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_lookups_run_one_category_at_a_time() {
        let http = MockApi::new();
        let api = api_config();
        let launches = vec![
            launch(1, "falcon1", "demosat", "kwaj", landed_core("b1003")),
            launch(2, "falcon9", "ses8", "slc40", landed_core("b1049")),
        ];

        Enricher::new(&http, &api).enrich(&launches).await.unwrap();
        let order: Vec<String> = http
            .requested()
            .iter()
            .map(|u| u.trim_start_matches(BASE).to_string())
            .collect();
        assert_eq!(
            order,
            vec![
                "/rockets/falcon1",
                "/rockets/falcon9",
                "/launchpads/kwaj",
                "/launchpads/slc40",
                "/payloads/demosat",
                "/payloads/ses8",
                "/cores/b1003",
                "/cores/b1049",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_id_fails_the_run() {
        let http = MockApi::new();
        let api = api_config();
        let launches = vec![launch(1, "starship", "demosat", "kwaj", anonymous_core())];

        match Enricher::new(&http, &api).enrich(&launches).await {
            Err(EtlError::Status { status, url }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/rockets/starship"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    /// Log sink for the fmt subscriber
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_progress_banners_are_logged_once_each() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let http = MockApi::new();
        let api = api_config();
        let launches = vec![launch(1, "falcon1", "demosat", "kwaj", anonymous_core())];
        Enricher::new(&http, &api).enrich(&launches).await.unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        for banner in [
            "Beginning Rocket Data Treatment...",
            "Beginning Launchpad Data Treatment...",
            "Beginning Payload Data Treatment...",
            "Beginning Core Data Treatment...",
            "Building Dataframe...",
        ] {
            assert_eq!(output.matches(banner).count(), 1, "{}", banner);
        }
    }

    #[tokio::test]
    async fn test_run_writes_raw_snapshot() {
        let http = MockApi::new();
        let api = api_config();
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("data/raw/Falcon_1-9.csv");
        let launches = vec![launch(1, "falcon1", "demosat", "kwaj", anonymous_core())];

        let rows = Enricher::new(&http, &api).run(&launches, &raw).await.unwrap();
        let back = crate::pipeline::storage::read_snapshot(&raw).unwrap();
        assert_eq!(back, rows);
        assert_eq!(back[0].date, NaiveDate::from_ymd_opt(2011, 6, 4).unwrap());
    }
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use falcon_etl::config::Config;
use falcon_etl::infra::ReqwestHttp;
use falcon_etl::logging;
use falcon_etl::pipeline::{finalize, landing_pad_report, Pipeline};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "falcon_etl")]
#[command(about = "Launch data extractor and cleaner for the SpaceX v4 API")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, enrich and finalize: raw and processed snapshots
    Run,
    /// Fetch and enrich only, writing the raw snapshot
    Etl,
    /// Turn an existing raw snapshot into the processed snapshot
    Finalize,
    /// Report landing-pad coverage of the raw snapshot (default)
    Diagnose,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command.unwrap_or(Commands::Diagnose) {
        Commands::Run => {
            println!("🚀 Running full pipeline...");
            let http = ReqwestHttp::new(&config.api)?;
            match Pipeline::new(&config, &http).run().await {
                Ok(result) => {
                    println!("\n📊 Pipeline Results (run {}):", result.run_id);
                    println!("   Launches fetched: {}", result.fetched);
                    println!("   After filtering: {}", result.filtered);
                    println!("   Enriched: {}", result.enriched);
                    println!(
                        "   Processed: {} ({} dropped, {} payload masses imputed)",
                        result.finalize.rows_out,
                        result.finalize.rows_dropped,
                        result.finalize.payload_mass_imputed
                    );
                    println!("   Raw snapshot: {}", result.raw_csv.display());
                    println!("   Processed snapshot: {}", result.processed_csv.display());
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Etl => {
            println!("📥 Running extraction and enrichment...");
            let http = ReqwestHttp::new(&config.api)?;
            let (extraction, rows) = Pipeline::new(&config, &http).run_etl().await?;
            info!(
                "ETL done: {} fetched, {} kept, {} enriched",
                extraction.fetched,
                extraction.launches.len(),
                rows.len()
            );
        }
        Commands::Finalize => {
            println!("🔨 Finalizing raw snapshot...");
            let summary = finalize(
                &config.paths.raw_csv,
                &config.paths.processed_csv,
                &config.finalize.legacy_booster,
            )?;
            println!(
                "✅ {} rows written to {} ({} dropped)",
                summary.rows_out,
                config.paths.processed_csv.display(),
                summary.rows_dropped
            );
        }
        Commands::Diagnose => {
            let report = landing_pad_report(&config.paths.raw_csv)
                .with_context(|| format!("reading {}", config.paths.raw_csv.display()))?;
            println!("{}", report);
        }
    }
    Ok(())
}

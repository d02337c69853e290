//! PARLAY — combo (accumulator) generator
//!
//! Entry point. Loads configuration, initialises structured logging,
//! collects legs from the configured sources, prints and exports the
//! ranked combos, then optionally serves the dashboard API.
//!
//! Usage: `parlay [config.toml]`

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use parlay::config::AppConfig;
use parlay::dashboard::{self, routes::DashboardState};
use parlay::data;
use parlay::export;
use parlay::strategy::{self, ComboReport};

const BANNER: &str = r#"
 ____   _    ____  _        _ __   __
|  _ \ / \  |  _ \| |      / \\ \ / /
| |_) / _ \ | |_) | |     / _ \\ V /
|  __/ ___ \|  _ <| |___ / ___ \| |
|_| /_/   \_\_| \_\_____/_/   \_\_|

  Combo generator — 3 and 4 leg accumulators
  v0.1.0
"#;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = AppConfig::load_or_default(&config_path)?;

    println!("{BANNER}");
    info!(
        config = %config_path,
        sizes = ?cfg.combos.sizes,
        stake = cfg.combos.stake,
        top_n = cfg.combos.top_n,
        odds_api = cfg.odds_api.enabled,
        "PARLAY starting up"
    );

    // -- Legs -------------------------------------------------------------

    let legs = data::collect_legs(&cfg).await;
    if legs.is_empty() {
        warn!("No legs retrieved. Check the API key and source settings.");
    }

    // -- Generate ---------------------------------------------------------

    let request = cfg.combo_request();
    let snapshot = legs.clone();
    let report = tokio::task::spawn_blocking(move || strategy::plan(&snapshot, &request)).await?;

    print_report(&report);

    if let Some(path) = &cfg.export.csv_path {
        export::write_csv(path, &report.combos)?;
    }

    // -- Dashboard --------------------------------------------------------

    if cfg.dashboard.enabled {
        let port = cfg.dashboard.port;
        let state = Arc::new(DashboardState::new(cfg, legs));

        tokio::select! {
            result = dashboard::serve(state, port) => result?,
            _ = tokio::signal::ctrl_c() => info!("Shutdown signal received."),
        }
    }

    info!("PARLAY finished.");
    Ok(())
}

/// Print the ranked combos as a plain table.
fn print_report(report: &ComboReport) {
    println!(
        "{} legs considered, {} combos generated, showing {}\n",
        report.legs_considered,
        report.total_combos,
        report.combos.len()
    );
    println!(
        "{:>4}  {:>2}  {:>9}  {:>9}  {:>9}  {:>9}  legs",
        "#", "n", "prob %", "odds", "payout", "exp. ret"
    );
    for (rank, combo) in report.combos.iter().enumerate() {
        println!(
            "{:>4}  {:>2}  {:>9.3}  {:>9.3}  {:>9.2}  {:>9.2}  {}",
            rank + 1,
            combo.size,
            combo.probability_pct,
            combo.combined_odds,
            combo.potential_payout,
            combo.expected_return(),
            combo.legs,
        );
    }
    println!();
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parlay=info"));

    let json_logging = std::env::var("PARLAY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

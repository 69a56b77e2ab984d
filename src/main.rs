//! Triage queue server binary.
//!
//! Resolves all configuration from the environment once at startup, wires the
//! HTTP scoring-oracle client into the scheduler, and serves the REST API.
//!
//! # Environment Variables
//! - `TRIAGE_REST_ADDR`: server address (default: "0.0.0.0:3000")
//! - `TRIAGE_CAPACITY`: patients admitted per run (default: 170)
//! - `TRIAGE_SLOT_MINUTES`: appointment length (default: 30)
//! - `TRIAGE_DAY_START`: first slot time-of-day, HH:MM (default: 08:00)
//! - `CLINIC_WEEKDAY`: clinic day for the run (default: thu)
//! - `SCORER_URL`: base URL of the scoring oracle (required)
//! - `SCORER_API_KEY`: bearer key for the oracle (optional)
//! - `SCORER_TIMEOUT_SECS`: oracle request timeout (default: 90)

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::dates::clinic_weekday_from_env_value;
use api_rest::AppState;
use triage_core::config::{
    capacity_from_env_value, day_start_from_env_value, slot_duration_from_env_value,
};
use triage_core::{ScheduleConfig, TriageService};
use triage_scorer::{
    scorer_url_from_env_value, timeout_from_env_value, HttpScoreOracle, ScorerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_core=info".parse()?)
                .add_directive("triage_scorer=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = ScheduleConfig::new(
        capacity_from_env_value(std::env::var("TRIAGE_CAPACITY").ok())?,
        slot_duration_from_env_value(std::env::var("TRIAGE_SLOT_MINUTES").ok())?,
        day_start_from_env_value(std::env::var("TRIAGE_DAY_START").ok())?,
    )?;
    let clinic_day = clinic_weekday_from_env_value(std::env::var("CLINIC_WEEKDAY").ok())?;

    let scorer_config = ScorerConfig::new(
        scorer_url_from_env_value(std::env::var("SCORER_URL").ok())?,
        std::env::var("SCORER_API_KEY").ok(),
        timeout_from_env_value(std::env::var("SCORER_TIMEOUT_SECS").ok())?,
    )?;
    let oracle = Arc::new(HttpScoreOracle::new(scorer_config)?);

    tracing::info!("++ Starting triage REST on {}", addr);
    tracing::info!(
        capacity = config.capacity(),
        %clinic_day,
        "schedule parameters loaded"
    );

    let state = AppState {
        service: Arc::new(TriageService::new(config, oracle)),
        clinic_day,
    };
    let app = api_rest::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! # Triage Scorer
//!
//! HTTP client for the external scoring oracle.
//!
//! Responsibilities:
//! - Post a patient batch to the oracle's `/sort` endpoint as JSON
//! - Decode and strictly validate the returned score mapping
//! - Classify failures as transport (unreachable, non-2xx) or format
//!   (undecodable, out-of-range values)
//!
//! The client performs no retries and no caching; retry policy, if any,
//! belongs to whoever calls the scheduler.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use triage_core::{Patient, ScoreOracle, ScoreResult, ScorerError, TriageError, TriageResult};

/// Default oracle request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Connection settings for the scoring oracle, resolved at startup.
#[derive(Clone, Debug)]
pub struct ScorerConfig {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ScorerConfig {
    /// Create a new `ScorerConfig`.
    ///
    /// # Errors
    /// Returns `TriageError::InvalidConfig` if `base_url` is empty.
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> TriageResult<Self> {
        if base_url.trim().is_empty() {
            return Err(TriageError::InvalidConfig(
                "scorer base URL cannot be empty".into(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parse the oracle base URL taken from the environment. Required.
pub fn scorer_url_from_env_value(value: Option<String>) -> TriageResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| TriageError::InvalidConfig("SCORER_URL must be set".into()))
}

/// Parse the oracle request timeout in seconds taken from the environment.
///
/// `None` yields [`DEFAULT_TIMEOUT_SECS`].
pub fn timeout_from_env_value(value: Option<String>) -> TriageResult<Duration> {
    let secs: u64 = match value {
        None => DEFAULT_TIMEOUT_SECS,
        Some(raw) => raw.trim().parse().map_err(|_| {
            TriageError::InvalidConfig(format!("invalid scorer timeout seconds: {raw:?}"))
        })?,
    };
    Ok(Duration::from_secs(secs))
}

// Wire models for the oracle contract. The response carries extra fields
// (request ids, notes) which are ignored here; only rank and severity matter
// to the scheduler.

#[derive(Serialize)]
struct ScoreReq<'a> {
    patients: Vec<WirePatient<'a>>,
    schedule_date: NaiveDate,
}

#[derive(Serialize)]
struct WirePatient<'a> {
    patient_id: &'a str,
    age: u32,
    gender: &'a str,
    visiting_status: &'a str,
    medical_condition: &'a str,
}

impl<'a> From<&'a Patient> for WirePatient<'a> {
    fn from(p: &'a Patient) -> Self {
        Self {
            patient_id: &p.id,
            age: p.age,
            gender: &p.gender,
            visiting_status: &p.visiting_status,
            medical_condition: &p.medical_condition,
        }
    }
}

#[derive(Deserialize)]
struct ScoreRes {
    results: HashMap<String, WireScore>,
}

#[derive(Deserialize)]
struct WireScore {
    priority_rank: u8,
    severity_score: u8,
}

/// `ScoreOracle` implementation backed by the triage scoring HTTP API.
pub struct HttpScoreOracle {
    client: reqwest::Client,
    config: ScorerConfig,
}

impl HttpScoreOracle {
    /// Build the client with the configured request timeout.
    ///
    /// # Errors
    /// Returns `TriageError::InvalidConfig` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ScorerConfig) -> TriageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TriageError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ScoreOracle for HttpScoreOracle {
    async fn score(
        &self,
        batch: &[Patient],
        schedule_date: NaiveDate,
    ) -> Result<HashMap<String, ScoreResult>, ScorerError> {
        let url = format!("{}/sort", self.config.base_url());
        let body = ScoreReq {
            patients: batch.iter().map(WirePatient::from).collect(),
            schedule_date,
        };

        tracing::info!(batch = batch.len(), %url, "sending batch to scoring oracle");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScorerError::Unreachable(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "scoring oracle rejected the batch");
            return Err(ScorerError::Status {
                status: status.as_u16(),
            });
        }

        let decoded: ScoreRes = response
            .json()
            .await
            .map_err(|e| ScorerError::Decode(Box::new(e)))?;

        let scores = validate_results(decoded)?;
        tracing::debug!(scored = scores.len(), "scoring oracle responded");
        Ok(scores)
    }
}

/// Convert the wire mapping into domain scores, enforcing the documented
/// ranges (rank 1..=5, severity 1..=10).
fn validate_results(decoded: ScoreRes) -> Result<HashMap<String, ScoreResult>, ScorerError> {
    let mut scores = HashMap::with_capacity(decoded.results.len());

    for (patient_id, wire) in decoded.results {
        if !(1..=5).contains(&wire.priority_rank) {
            return Err(ScorerError::InvalidPayload(format!(
                "priority_rank {} out of range for patient {}",
                wire.priority_rank, patient_id
            )));
        }
        if !(1..=10).contains(&wire.severity_score) {
            return Err(ScorerError::InvalidPayload(format!(
                "severity_score {} out of range for patient {}",
                wire.severity_score, patient_id
            )));
        }
        scores.insert(
            patient_id,
            ScoreResult {
                priority_rank: wire.priority_rank,
                severity_score: wire.severity_score,
            },
        );
    }

    Ok(scores)
}

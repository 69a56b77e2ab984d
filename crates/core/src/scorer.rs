//! The scoring-oracle seam.
//!
//! The external scoring service is the only non-deterministic, failure-prone
//! dependency of the scheduler, so it is expressed as a trait rather than a
//! concrete network client. The production implementation lives in
//! `triage-scorer`; tests inject deterministic stubs.

use crate::patient::{Patient, ScoreResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Failures the scoring oracle can surface.
///
/// Transport and format failures are kept distinct: a transport failure is a
/// network condition the caller may retry, a format failure means the oracle
/// violated its response contract.
#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("scoring service unreachable: {0}")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("scoring service returned status {status}")]
    Status { status: u16 },
    #[error("failed to decode scoring response: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("scoring response malformed: {0}")]
    InvalidPayload(String),
}

impl ScorerError {
    /// True for network-condition failures, false for contract violations.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScorerError::Unreachable(_) | ScorerError::Status { .. }
        )
    }
}

/// One-shot scoring of a patient batch.
///
/// Invoked once per scheduling run. The returned mapping is keyed by patient
/// id; completeness against the batch is checked by the scheduler, not here.
/// Implementations must not retry or cache.
#[async_trait]
pub trait ScoreOracle: Send + Sync {
    async fn score(
        &self,
        batch: &[Patient],
        schedule_date: NaiveDate,
    ) -> Result<HashMap<String, ScoreResult>, ScorerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_format_failures_are_distinct() {
        let unreachable = ScorerError::Unreachable("connection refused".into());
        let status = ScorerError::Status { status: 503 };
        let decode = ScorerError::Decode("expected value at line 1".into());
        let payload = ScorerError::InvalidPayload("missing results".into());

        assert!(unreachable.is_transport());
        assert!(status.is_transport());
        assert!(!decode.is_transport());
        assert!(!payload.is_transport());
    }
}

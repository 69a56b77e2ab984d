//! Batch scheduling facade.
//!
//! Composes the two halves of the pipeline: one call to the scoring oracle,
//! then the pure queue construction. All-or-nothing per batch; an oracle or
//! integrity failure surfaces as an error and no queue is produced.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::ScheduleConfig;
use crate::error::TriageResult;
use crate::patient::{Patient, QueueEntry};
use crate::queue::build_queue;
use crate::scorer::ScoreOracle;

/// Schedules one patient batch at a time against an injected oracle.
///
/// Holds no mutable state; concurrent batches are independent and each
/// invocation owns its own buffers.
#[derive(Clone)]
pub struct TriageService {
    config: ScheduleConfig,
    oracle: Arc<dyn ScoreOracle>,
}

impl TriageService {
    pub fn new(config: ScheduleConfig, oracle: Arc<dyn ScoreOracle>) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Score the batch and lay out the queue for `schedule_date`.
    ///
    /// An empty batch is valid and short-circuits without consulting the
    /// oracle.
    ///
    /// # Errors
    /// Propagates oracle failures (`TriageError::Scorer`) and the integrity
    /// errors of [`build_queue`]. The oracle is never retried here.
    pub async fn schedule_batch(
        &self,
        patients: &[Patient],
        schedule_date: NaiveDate,
    ) -> TriageResult<Vec<QueueEntry>> {
        if patients.is_empty() {
            tracing::debug!("empty batch, nothing to schedule");
            return Ok(Vec::new());
        }

        tracing::info!(
            batch = patients.len(),
            %schedule_date,
            "requesting scores for triage batch"
        );
        let scores = self.oracle.score(patients, schedule_date).await?;
        tracing::debug!(scored = scores.len(), "received score mapping");

        build_queue(patients, &scores, &self.config, schedule_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{QueueStatus, ScoreResult};
    use crate::scorer::ScorerError;
    use crate::TriageError;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveTime};
    use std::collections::HashMap;

    struct FixedOracle(HashMap<String, ScoreResult>);

    #[async_trait]
    impl ScoreOracle for FixedOracle {
        async fn score(
            &self,
            _batch: &[Patient],
            _schedule_date: NaiveDate,
        ) -> Result<HashMap<String, ScoreResult>, ScorerError> {
            Ok(self.0.clone())
        }
    }

    struct DownOracle;

    #[async_trait]
    impl ScoreOracle for DownOracle {
        async fn score(
            &self,
            _batch: &[Patient],
            _schedule_date: NaiveDate,
        ) -> Result<HashMap<String, ScoreResult>, ScorerError> {
            Err(ScorerError::Unreachable("connection refused".into()))
        }
    }

    fn config() -> ScheduleConfig {
        ScheduleConfig::new(
            170,
            Duration::minutes(30),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn patient(id: &str) -> Patient {
        Patient {
            id: id.into(),
            age: 61,
            gender: "Male".into(),
            visiting_status: "internal_referral".into(),
            medical_condition: "lumbar disc herniation".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 2).unwrap()
    }

    #[tokio::test]
    async fn schedules_scored_batch() {
        let scores = HashMap::from([
            (
                "a".to_string(),
                ScoreResult {
                    priority_rank: 1,
                    severity_score: 9,
                },
            ),
            (
                "b".to_string(),
                ScoreResult {
                    priority_rank: 3,
                    severity_score: 4,
                },
            ),
        ]);
        let service = TriageService::new(config(), Arc::new(FixedOracle(scores)));

        let queue = service
            .schedule_batch(&[patient("a"), patient("b")], date())
            .await
            .unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].patient_id, "a");
        assert!(queue.iter().all(|e| e.status == QueueStatus::Approved));
    }

    #[tokio::test]
    async fn empty_batch_skips_the_oracle() {
        // DownOracle would fail if consulted.
        let service = TriageService::new(config(), Arc::new(DownOracle));
        let queue = service.schedule_batch(&[], date()).await.unwrap();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn oracle_failure_aborts_with_no_partial_queue() {
        let service = TriageService::new(config(), Arc::new(DownOracle));
        let err = service
            .schedule_batch(&[patient("a")], date())
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Scorer(ref e) if e.is_transport()));
    }

    #[tokio::test]
    async fn incomplete_score_mapping_aborts() {
        let service = TriageService::new(config(), Arc::new(FixedOracle(HashMap::new())));
        let err = service
            .schedule_batch(&[patient("a")], date())
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::MissingScore { .. }));
    }
}

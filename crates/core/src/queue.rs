//! Triage queue construction.
//!
//! This is the heart of the system: given a patient batch, its score mapping
//! and the schedule parameters, produce the ordered, capacity-gated queue
//! with contiguous appointment slots.
//!
//! Guarantees:
//! - Total ordering by ascending priority rank, then descending severity
//!   score; full ties keep the input batch order (stable sort)
//! - Exactly `min(capacity, batch size)` entries are approved
//! - Approved slots are back-to-back from `schedule_date + day_start`, each
//!   exactly one slot duration; pending entries never consume slot time
//! - Every input patient appears exactly once in the output
//! - Byte-for-byte deterministic for identical inputs

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::config::ScheduleConfig;
use crate::error::{TriageError, TriageResult};
use crate::patient::{Patient, QueueEntry, QueueStatus, ScoreResult, Slot};

/// Build the scheduled queue for one batch.
///
/// The output sequence is in priority order (insertion order is the
/// admission order), not re-sorted back to input order. Admission is
/// rank-based, not arrival-based: a patient beyond position `capacity` in
/// the ordering stays pending however urgent their arrival time was.
///
/// # Errors
/// - `DuplicatePatient` if the batch repeats an id
/// - `MissingScore` if a patient has no score entry
/// - `UnknownScore` if a score entry matches no patient
/// - `SlotOverflow` if slot arithmetic leaves the representable range
///
/// Any error aborts the whole batch; no partial queue is returned.
pub fn build_queue(
    patients: &[Patient],
    scores: &HashMap<String, ScoreResult>,
    config: &ScheduleConfig,
    schedule_date: NaiveDate,
) -> TriageResult<Vec<QueueEntry>> {
    // Join patients with their scores, refusing to fabricate or drop any.
    let mut seen: HashSet<&str> = HashSet::with_capacity(patients.len());
    let mut joined: Vec<(&Patient, ScoreResult)> = Vec::with_capacity(patients.len());

    for patient in patients {
        if !seen.insert(patient.id.as_str()) {
            return Err(TriageError::DuplicatePatient {
                patient_id: patient.id.clone(),
            });
        }
        let score = scores
            .get(&patient.id)
            .copied()
            .ok_or_else(|| TriageError::MissingScore {
                patient_id: patient.id.clone(),
            })?;
        joined.push((patient, score));
    }

    for patient_id in scores.keys() {
        if !seen.contains(patient_id.as_str()) {
            return Err(TriageError::UnknownScore {
                patient_id: patient_id.clone(),
            });
        }
    }

    // Stable sort: ties on both keys keep input order, which fixes the
    // admission tie-break to batch order rather than sort happenstance.
    joined.sort_by(|a, b| {
        a.1.priority_rank
            .cmp(&b.1.priority_rank)
            .then(b.1.severity_score.cmp(&a.1.severity_score))
    });

    let mut entries = Vec::with_capacity(joined.len());
    let mut clock = schedule_date.and_time(config.day_start());

    for (position, (patient, score)) in joined.into_iter().enumerate() {
        let (status, slot) = if position < config.capacity() {
            let start = clock;
            let end = start
                .checked_add_signed(config.slot_duration())
                .ok_or(TriageError::SlotOverflow)?;
            clock = end;
            (QueueStatus::Approved, Some(Slot { start, end }))
        } else {
            (QueueStatus::Pending, None)
        };

        entries.push(QueueEntry {
            patient_id: patient.id.clone(),
            priority_rank: score.priority_rank,
            severity_score: score.severity_score,
            status,
            slot,
        });
    }

    Ok(entries)
}

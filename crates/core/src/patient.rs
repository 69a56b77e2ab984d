//! Domain types for the triage queue.
//!
//! A `Patient` is the caller-supplied input record. A `ScoreResult` is what
//! the scoring oracle says about one patient. A `QueueEntry` is the scheduled
//! output record, one per patient regardless of admission status.

use chrono::NaiveDateTime;

/// A patient awaiting triage, as submitted by the caller.
///
/// `id` must be unique within a batch. `gender`, `visiting_status` and
/// `medical_condition` are opaque to the scheduler; they exist for the
/// scoring oracle and are passed through uninterpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    pub id: String,
    pub age: u32,
    pub gender: String,
    pub visiting_status: String,
    pub medical_condition: String,
}

/// Severity and priority assigned to one patient by the scoring oracle.
///
/// `priority_rank` runs 1 (most urgent) to 5 (least urgent);
/// `severity_score` runs 1 to 10. Range enforcement happens at the adapter
/// boundary; the scheduler orders by the raw integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreResult {
    pub priority_rank: u8,
    pub severity_score: u8,
}

/// Admission decision for a queue entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueStatus {
    /// Admitted within capacity; holds a concrete appointment slot.
    Approved,
    /// Beyond capacity; carries no slot and waits for the next run.
    Pending,
}

/// A fixed-duration appointment interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One scheduled output record.
///
/// `patient_id` is a lookup key into the input batch, not ownership of the
/// patient record. `slot` is `Some` exactly when `status` is `Approved`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueEntry {
    pub patient_id: String,
    pub priority_rank: u8,
    pub severity_score: u8,
    pub status: QueueStatus,
    pub slot: Option<Slot>,
}

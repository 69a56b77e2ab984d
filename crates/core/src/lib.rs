//! # Triage Core
//!
//! Core business logic for the OPD triage queue scheduler.
//!
//! This crate contains the pure, deterministic scheduling pipeline:
//! - Joining a patient batch with its severity/priority scores
//! - Ordering, capacity-bounded admission and appointment slot layout
//! - The `ScoreOracle` seam for the external scoring service
//!
//! **No API concerns**: HTTP servers, routing and wire formats belong in
//! `api-rest`; the concrete oracle client lives in `triage-scorer`.

pub mod config;
pub mod error;
pub mod patient;
pub mod queue;
pub mod scorer;
pub mod service;

pub use config::ScheduleConfig;
pub use error::{TriageError, TriageResult};
pub use patient::{Patient, QueueEntry, QueueStatus, ScoreResult, Slot};
pub use queue::build_queue;
pub use scorer::{ScoreOracle, ScorerError};
pub use service::TriageService;

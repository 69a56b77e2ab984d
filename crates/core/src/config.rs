//! Schedule configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into the scheduler. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::{TriageError, TriageResult};
use chrono::{Duration, NaiveTime};

/// Default number of patients admitted per scheduling run.
pub const DEFAULT_CAPACITY: usize = 170;

/// Default appointment length in minutes.
pub const DEFAULT_SLOT_MINUTES: i64 = 30;

/// Default start-of-day for the first slot, as "HH:MM".
pub const DEFAULT_DAY_START: &str = "08:00";

/// Schedule parameters resolved at startup.
///
/// `capacity` of zero is valid and leaves every entry pending. The slot
/// duration must be strictly positive.
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    capacity: usize,
    slot_duration: Duration,
    day_start: NaiveTime,
}

impl ScheduleConfig {
    /// Create a new `ScheduleConfig`.
    ///
    /// # Errors
    /// Returns `TriageError::InvalidConfig` if `slot_duration` is zero or
    /// negative.
    pub fn new(
        capacity: usize,
        slot_duration: Duration,
        day_start: NaiveTime,
    ) -> TriageResult<Self> {
        if slot_duration <= Duration::zero() {
            return Err(TriageError::InvalidConfig(
                "slot duration must be positive".into(),
            ));
        }

        Ok(Self {
            capacity,
            slot_duration,
            day_start,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    pub fn day_start(&self) -> NaiveTime {
        self.day_start
    }
}

/// Parse a capacity value taken from the environment.
///
/// `None` yields [`DEFAULT_CAPACITY`].
pub fn capacity_from_env_value(value: Option<String>) -> TriageResult<usize> {
    match value {
        None => Ok(DEFAULT_CAPACITY),
        Some(raw) => raw.trim().parse().map_err(|_| {
            TriageError::InvalidConfig(format!("invalid capacity: {raw:?}"))
        }),
    }
}

/// Parse a slot duration in whole minutes taken from the environment.
///
/// `None` yields [`DEFAULT_SLOT_MINUTES`]. Zero and negative values are
/// rejected here rather than deferred to `ScheduleConfig::new`, so startup
/// errors point at the offending variable.
pub fn slot_duration_from_env_value(value: Option<String>) -> TriageResult<Duration> {
    let minutes: i64 = match value {
        None => DEFAULT_SLOT_MINUTES,
        Some(raw) => raw.trim().parse().map_err(|_| {
            TriageError::InvalidConfig(format!("invalid slot minutes: {raw:?}"))
        })?,
    };

    if minutes <= 0 {
        return Err(TriageError::InvalidConfig(format!(
            "slot minutes must be positive, got {minutes}"
        )));
    }

    Ok(Duration::minutes(minutes))
}

/// Parse a start-of-day time ("HH:MM") taken from the environment.
///
/// `None` yields [`DEFAULT_DAY_START`].
pub fn day_start_from_env_value(value: Option<String>) -> TriageResult<NaiveTime> {
    let raw = value.unwrap_or_else(|| DEFAULT_DAY_START.to_string());
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
        TriageError::InvalidConfig(format!("invalid day start (expected HH:MM): {raw:?}"))
    })
}

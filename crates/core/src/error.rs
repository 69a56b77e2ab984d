use crate::scorer::ScorerError;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("duplicate patient id in batch: {patient_id}")]
    DuplicatePatient { patient_id: String },
    #[error("no score returned for patient {patient_id}")]
    MissingScore { patient_id: String },
    #[error("score returned for unknown patient {patient_id}")]
    UnknownScore { patient_id: String },
    #[error("slot arithmetic left the representable time range")]
    SlotOverflow,
    #[error(transparent)]
    Scorer(#[from] ScorerError),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;

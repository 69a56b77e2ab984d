//! # API REST
//!
//! REST surface for the triage queue scheduler.
//!
//! Handles:
//! - Batch submission and input validation of raw patient fields
//! - Clinic-date selection for the run
//! - Mapping the error taxonomy onto HTTP statuses with machine-readable
//!   kinds, so callers can tell an unreachable oracle from a misbehaving one
//! - OpenAPI/Swagger documentation
//!
//! Scheduling semantics live in `triage-core`; this crate only translates
//! between the wire and the domain.

#![warn(rust_2018_idioms)]

pub mod dates;

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use triage_core::{Patient, QueueEntry, QueueStatus, TriageError, TriageService};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TriageService>,
    pub clinic_day: Weekday,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, create_queue),
    components(schemas(
        HealthRes,
        PatientReq,
        CreateQueueReq,
        QueueEntryRes,
        CreateQueueRes,
        ErrorRes
    ))
)]
struct ApiDoc;

/// Build the REST router with all routes, documentation and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/queue", post(create_queue))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Wire models
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One patient record as submitted by the caller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatientReq {
    pub id: String,
    pub age: u32,
    pub gender: String,
    pub visiting_status: String,
    pub medical_condition: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQueueReq {
    pub patients: Vec<PatientReq>,
}

/// One scheduled entry. `scheduled_start`/`scheduled_end` are present only
/// for `APPROVED` entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueueEntryRes {
    pub patient_id: String,
    pub priority_rank: u8,
    pub severity_score: u8,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateQueueRes {
    pub schedule_date: NaiveDate,
    pub results: Vec<QueueEntryRes>,
}

/// Uniform error body with a machine-readable kind.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub kind: &'static str,
    pub message: String,
}

impl From<QueueEntry> for QueueEntryRes {
    fn from(entry: QueueEntry) -> Self {
        let status = match entry.status {
            QueueStatus::Approved => "APPROVED",
            QueueStatus::Pending => "PENDING",
        };
        Self {
            patient_id: entry.patient_id,
            priority_rank: entry.priority_rank,
            severity_score: entry.severity_score,
            status,
            scheduled_start: entry.slot.map(|s| s.start),
            scheduled_end: entry.slot.map(|s| s.end),
        }
    }
}

impl From<PatientReq> for Patient {
    fn from(req: PatientReq) -> Self {
        Self {
            id: req.id,
            age: req.age,
            gender: req.gender,
            visiting_status: req.visiting_status,
            medical_condition: req.medical_condition,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness probe for monitoring and load balancers.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "triage scheduler is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/queue",
    request_body = CreateQueueReq,
    responses(
        (status = 200, description = "Ordered triage queue for the batch", body = CreateQueueRes),
        (status = 400, description = "Invalid patient batch", body = ErrorRes),
        (status = 502, description = "Scoring oracle failed", body = ErrorRes)
    )
)]
/// Submit a patient batch for scoring and scheduling.
///
/// The batch is scored by the external oracle, ordered by priority and
/// severity, admitted up to the configured capacity, and laid out in
/// contiguous slots on the next clinic day. The run is all-or-nothing: any
/// upstream failure returns an error and no queue.
async fn create_queue(
    State(state): State<AppState>,
    Json(req): Json<CreateQueueReq>,
) -> Result<Json<CreateQueueRes>, (StatusCode, Json<ErrorRes>)> {
    validate_batch(&req.patients)?;

    let patients: Vec<Patient> = req.patients.into_iter().map(Patient::from).collect();
    let schedule_date = dates::next_clinic_date(Local::now().date_naive(), state.clinic_day);

    match state.service.schedule_batch(&patients, schedule_date).await {
        Ok(queue) => Ok(Json(CreateQueueRes {
            schedule_date,
            results: queue.into_iter().map(QueueEntryRes::from).collect(),
        })),
        Err(e) => {
            tracing::error!("batch scheduling failed: {e}");
            Err(error_response(e))
        }
    }
}

/// Reject batches the scheduler should never see: blank or repeated ids.
fn validate_batch(patients: &[PatientReq]) -> Result<(), (StatusCode, Json<ErrorRes>)> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(patients.len());

    for patient in patients {
        if patient.id.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorRes {
                    kind: "invalid_patient",
                    message: "patient id cannot be empty".into(),
                }),
            ));
        }
        if !seen.insert(patient.id.as_str()) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorRes {
                    kind: "duplicate_patient",
                    message: format!("duplicate patient id in batch: {}", patient.id),
                }),
            ));
        }
    }

    Ok(())
}

/// Map the error taxonomy onto HTTP. The three upstream kinds stay distinct
/// so callers can tell a network condition from a contract violation.
fn error_response(err: TriageError) -> (StatusCode, Json<ErrorRes>) {
    let (status, kind) = match &err {
        TriageError::Scorer(e) if e.is_transport() => {
            (StatusCode::BAD_GATEWAY, "scorer_unreachable")
        }
        TriageError::Scorer(_) => (StatusCode::BAD_GATEWAY, "scorer_invalid_response"),
        TriageError::MissingScore { .. } | TriageError::UnknownScore { .. } => {
            (StatusCode::BAD_GATEWAY, "scorer_incomplete")
        }
        TriageError::DuplicatePatient { .. } => (StatusCode::BAD_REQUEST, "duplicate_patient"),
        TriageError::InvalidConfig(_) | TriageError::SlotOverflow => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    };

    (
        status,
        Json(ErrorRes {
            kind,
            message: err.to_string(),
        }),
    )
}

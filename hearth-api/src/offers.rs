use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use hearth_core::checklist::ChecklistManager;
use hearth_core::inspection::InspectionStateMachine;
use hearth_core::repository::Versioned;
use hearth_core::{id, ChecklistItem, Fee, OfferRecord, OfferStatus, WorkflowError};

// How many times intake retries a colliding offer id before giving up
const MAX_ID_ATTEMPTS: usize = 5;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    pub address: String,
    pub zip_code: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub estimated_value: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub offer_id: String,
    pub status: OfferStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListOffersQuery {
    pub email: Option<String>,
    pub status: Option<OfferStatus>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub to: OfferStatus,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleInspectionRequest {
    pub date: NaiveDate,
    pub time_slot: String,
}

#[derive(Debug, Deserialize)]
pub struct SetAmountRequest {
    pub offer_amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetFeesRequest {
    pub fees: Vec<Fee>,
}

#[derive(Debug, Deserialize)]
pub struct InstallChecklistRequest {
    pub items: Vec<ChecklistItem>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/offers
/// Intake: create a new offer record in `submitted` state
pub async fn create_offer(
    State(state): State<AppState>,
    Json(req): Json<IntakeRequest>,
) -> Result<(StatusCode, Json<IntakeResponse>), AppError> {
    validate_intake(&req)?;

    // Uniqueness lives in the store; on a collision generate a fresh id
    for _ in 0..MAX_ID_ATTEMPTS {
        let mut record = OfferRecord::new(
            id::generate_offer_id(),
            req.address.clone(),
            req.zip_code.clone(),
            req.contact_name.clone(),
            req.contact_email.clone(),
            req.contact_phone.clone(),
            req.estimated_value,
        );
        record.notes = req.notes.clone();
        state.fee_engine.apply_default_fees(&mut record);
        state.fee_engine.recompute_net_proceeds(&mut record);

        match state.repo.create(&record).await {
            Ok(()) => {
                return Ok((
                    StatusCode::CREATED,
                    Json(IntakeResponse {
                        offer_id: record.offer_id,
                        status: record.status,
                    }),
                ));
            }
            Err(WorkflowError::Conflict(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Err(WorkflowError::Conflict("offer id generation exhausted retries".to_string()).into())
}

/// GET /v1/offers/{id}
pub async fn get_offer(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
) -> Result<Json<OfferRecord>, AppError> {
    let stored = load(&state, &offer_id).await?;
    Ok(Json(stored.record))
}

/// GET /v1/offers?email=&status=
pub async fn list_offers(
    State(state): State<AppState>,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<Vec<OfferRecord>>, AppError> {
    let mut records = match (&query.email, query.status) {
        (Some(email), _) => state.repo.find_by_email(email).await?,
        (None, Some(status)) => state.repo.find_by_status(status).await?,
        (None, None) => state.repo.list().await?,
    };
    if let Some(status) = query.status {
        records.retain(|r| r.status == status);
    }
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(Json(records))
}

/// POST /v1/offers/{id}/transition
/// Request a lifecycle transition; emits a transition event on success
pub async fn transition_offer(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    let event = state.controller.transition(&mut record, req.to)?;
    state.repo.update(&record, version).await?;

    // Publish only after the record committed
    state.events.publish(event);
    Ok(Json(record))
}

/// POST /v1/offers/{id}/inspection/schedule
pub async fn schedule_inspection(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
    Json(req): Json<ScheduleInspectionRequest>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    InspectionStateMachine::schedule(&mut record, req.date, req.time_slot)?;
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// POST /v1/offers/{id}/inspection/complete
pub async fn complete_inspection(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    InspectionStateMachine::complete(&mut record)?;
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// POST /v1/offers/{id}/inspection/cancel
pub async fn cancel_inspection(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    InspectionStateMachine::cancel(&mut record)?;
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// PUT /v1/offers/{id}/amount
/// The valuation collaborator supplies the number; net proceeds are
/// recomputed before commit
pub async fn set_offer_amount(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
    Json(req): Json<SetAmountRequest>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    record.ensure_mutable()?;
    record.offer_amount = Some(req.offer_amount);
    state.fee_engine.recompute_net_proceeds(&mut record);
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// PUT /v1/offers/{id}/fees
pub async fn set_fees(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
    Json(req): Json<SetFeesRequest>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    record.ensure_mutable()?;
    record.fees = req.fees;
    state.fee_engine.recompute_net_proceeds(&mut record);
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// PUT /v1/offers/{id}/checklist
/// Install items from an external closing-process template
pub async fn install_checklist(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
    Json(req): Json<InstallChecklistRequest>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    ChecklistManager::install_items(&mut record, req.items)?;
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// POST /v1/offers/{id}/checklist/{item_id}/complete
pub async fn complete_checklist_item(
    State(state): State<AppState>,
    Path((offer_id, item_id)): Path<(String, String)>,
) -> Result<Json<OfferRecord>, AppError> {
    let Versioned {
        mut record,
        version,
    } = load(&state, &offer_id).await?;

    ChecklistManager::complete_item(&mut record, &item_id)?;
    state.repo.update(&record, version).await?;
    Ok(Json(record))
}

/// DELETE /v1/offers/{id}
/// Soft delete; the record is retained for audit
pub async fn delete_offer(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.soft_delete(&offer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load(state: &AppState, offer_id: &str) -> Result<Versioned, AppError> {
    if !id::is_valid_offer_id(offer_id) {
        return Err(WorkflowError::Validation(format!("malformed offer id {}", offer_id)).into());
    }
    state
        .repo
        .get(offer_id)
        .await?
        .ok_or_else(|| WorkflowError::NotFound(format!("offer {}", offer_id)).into())
}

fn validate_intake(req: &IntakeRequest) -> Result<(), AppError> {
    let mut missing = Vec::new();
    if req.address.trim().is_empty() {
        missing.push("address");
    }
    if req.zip_code.trim().is_empty() {
        missing.push("zip_code");
    }
    if req.contact_name.trim().is_empty() {
        missing.push("contact_name");
    }
    if req.contact_email.trim().is_empty() {
        missing.push("contact_email");
    }
    if req.contact_phone.trim().is_empty() {
        missing.push("contact_phone");
    }
    if !missing.is_empty() {
        return Err(
            WorkflowError::Validation(format!("missing required fields: {}", missing.join(", ")))
                .into(),
        );
    }
    if !req.contact_email.contains('@') {
        return Err(WorkflowError::Validation(format!(
            "malformed contact email: {}",
            req.contact_email
        ))
        .into());
    }
    Ok(())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/offers", post(create_offer).get(list_offers))
        .route("/v1/offers/{id}", get(get_offer).delete(delete_offer))
        .route("/v1/offers/{id}/transition", post(transition_offer))
        .route(
            "/v1/offers/{id}/inspection/schedule",
            post(schedule_inspection),
        )
        .route(
            "/v1/offers/{id}/inspection/complete",
            post(complete_inspection),
        )
        .route("/v1/offers/{id}/inspection/cancel", post(cancel_inspection))
        .route("/v1/offers/{id}/amount", put(set_offer_amount))
        .route("/v1/offers/{id}/fees", put(set_fees))
        .route("/v1/offers/{id}/checklist", put(install_checklist))
        .route(
            "/v1/offers/{id}/checklist/{item_id}/complete",
            post(complete_checklist_item),
        )
}

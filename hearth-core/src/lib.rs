pub mod models;
pub mod id;
pub mod fees;
pub mod inspection;
pub mod checklist;
pub mod controller;
pub mod events;
pub mod repository;

pub use models::{ChecklistItem, Fee, InspectionStatus, OfferRecord, OfferStatus};
pub use controller::OfferController;
pub use events::TransitionEvent;
pub use fees::{FeeEngine, FeeSchedule};

#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkflowError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict on {0}: concurrent modification, reload and retry")]
    Conflict(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::OfferStatus;

/// Emitted on every successful lifecycle transition. Dispatch of emails and
/// alerts belongs to the notification collaborator, not this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub offer_id: String,
    pub from_state: OfferStatus,
    pub to_state: OfferStatus,
    pub timestamp: DateTime<Utc>,
}

impl TransitionEvent {
    pub fn new(offer_id: String, from_state: OfferStatus, to_state: OfferStatus) -> Self {
        Self {
            offer_id,
            from_state,
            to_state,
            timestamp: Utc::now(),
        }
    }
}

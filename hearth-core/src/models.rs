use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Offer lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Submitted,
    InspectionScheduled,
    OfferMade,
    Accepted,
    Closed,
    Cancelled,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Submitted => "submitted",
            OfferStatus::InspectionScheduled => "inspection_scheduled",
            OfferStatus::OfferMade => "offer_made",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Closed => "closed",
            OfferStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Closed | OfferStatus::Cancelled)
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OfferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(OfferStatus::Submitted),
            "inspection_scheduled" => Ok(OfferStatus::InspectionScheduled),
            "offer_made" => Ok(OfferStatus::OfferMade),
            "accepted" => Ok(OfferStatus::Accepted),
            "closed" => Ok(OfferStatus::Closed),
            "cancelled" => Ok(OfferStatus::Cancelled),
            other => Err(format!("unknown offer status: {}", other)),
        }
    }
}

/// Inspection scheduling sub-state, independent of the offer lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "pending",
            InspectionStatus::Scheduled => "scheduled",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line item deducted from the offer amount at closing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fee {
    pub name: String,
    pub amount: i64,
    pub description: Option<String>,
}

impl Fee {
    pub fn new(name: impl Into<String>, amount: i64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            description: Some(description.into()),
        }
    }
}

/// A closing task supplied by an external closing-process template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub item_id: String,
    pub text: String,
    pub description: Option<String>,
    pub required: bool,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    pub fn new(item_id: impl Into<String>, text: impl Into<String>, required: bool) -> Self {
        Self {
            item_id: item_id.into(),
            text: text.into(),
            description: None,
            required,
            completed: false,
            completed_at: None,
        }
    }
}

/// The aggregate for one seller's cash-offer transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRecord {
    pub offer_id: String,
    pub address: String,
    pub zip_code: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub estimated_value: Option<i64>,
    pub offer_amount: Option<i64>,
    pub property_type: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_footage: i32,
    pub status: OfferStatus,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time_slot: Option<String>,
    pub inspection_status: InspectionStatus,
    pub fees: Vec<Fee>,
    pub net_proceeds: Option<i64>,
    pub closing_checklist: Vec<ChecklistItem>,
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl OfferRecord {
    /// Create a new record in the initial `submitted` state.
    /// Fees and net proceeds are filled in by the fee engine before first commit.
    pub fn new(
        offer_id: String,
        address: String,
        zip_code: String,
        contact_name: String,
        contact_email: String,
        contact_phone: String,
        estimated_value: Option<i64>,
    ) -> Self {
        Self {
            offer_id,
            address,
            zip_code,
            contact_name,
            contact_email,
            contact_phone,
            estimated_value,
            offer_amount: None,
            property_type: "single_family".to_string(),
            bedrooms: 3,
            bathrooms: 2.0,
            square_footage: 1500,
            status: OfferStatus::Submitted,
            inspection_date: None,
            inspection_time_slot: None,
            inspection_status: InspectionStatus::Pending,
            fees: Vec::new(),
            net_proceeds: None,
            closing_checklist: Vec::new(),
            notes: None,
            submitted_at: Utc::now(),
            accepted_at: None,
            closed_at: None,
            is_deleted: false,
        }
    }

    /// Sum of all fee line items
    pub fn total_fees(&self) -> i64 {
        self.fees.iter().map(|f| f.amount).sum()
    }

    /// Terminal records are read-only except for the soft-delete flag
    pub fn ensure_mutable(&self) -> crate::WorkflowResult<()> {
        if self.status.is_terminal() {
            return Err(crate::WorkflowError::InvalidTransition {
                from: self.status.to_string(),
                to: self.status.to_string(),
                reason: "record is in a terminal state and read-only".to_string(),
            });
        }
        Ok(())
    }
}

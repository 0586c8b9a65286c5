use serde::{Deserialize, Serialize};

use crate::models::{Fee, OfferRecord};

/// An ordered fee schedule. A configuration value, substitutable per
/// deployment (jurisdiction or tenant), never a hidden static.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeSchedule {
    pub fees: Vec<Fee>,
}

impl Default for FeeSchedule {
    /// The canonical four-item schedule applied when a record is created
    /// with no fees of its own.
    fn default() -> Self {
        Self {
            fees: vec![
                Fee::new(
                    "Property Inspection",
                    500,
                    "Professional home inspection service",
                ),
                Fee::new(
                    "Title Search & Insurance",
                    1200,
                    "Title verification and insurance coverage",
                ),
                Fee::new("Closing Costs", 2500, "Standard closing and escrow costs"),
                Fee::new("Processing Fee", 800, "Transaction processing and handling"),
            ],
        }
    }
}

impl FeeSchedule {
    pub fn total(&self) -> i64 {
        self.fees.iter().map(|f| f.amount).sum()
    }
}

/// Recomputes derived fee fields on an offer record
pub struct FeeEngine {
    schedule: FeeSchedule,
}

impl FeeEngine {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    /// The deployment's default fee schedule
    pub fn default_fees(&self) -> Vec<Fee> {
        self.schedule.fees.clone()
    }

    /// Populate an empty fee list with the default schedule. Records that
    /// already carry fees are left alone.
    pub fn apply_default_fees(&self, record: &mut OfferRecord) {
        if record.fees.is_empty() {
            record.fees = self.default_fees();
        }
    }

    /// Set `net_proceeds = offer_amount - total fees`. A no-op on the field
    /// while `offer_amount` is unset. Idempotent: unchanged inputs yield
    /// the same output. Invoked by the mutation layer immediately before
    /// commit, on creation and on every fees/offer-amount change.
    pub fn recompute_net_proceeds(&self, record: &mut OfferRecord) {
        let Some(offer_amount) = record.offer_amount else {
            return;
        };
        let net = offer_amount - record.total_fees();
        if net < 0 {
            tracing::warn!(
                offer_id = %record.offer_id,
                net_proceeds = net,
                "fees exceed offer amount, negative net proceeds"
            );
        }
        record.net_proceeds = Some(net);
    }
}

impl Default for FeeEngine {
    fn default() -> Self {
        Self::new(FeeSchedule::default())
    }
}

use chrono::Utc;

use crate::checklist::ChecklistManager;
use crate::events::TransitionEvent;
use crate::fees::FeeEngine;
use crate::models::{InspectionStatus, OfferRecord, OfferStatus};
use crate::{WorkflowError, WorkflowResult};

/// Owns the primary offer lifecycle.
///
/// Consults the inspection sub-state and the closing checklist as read-only
/// guards; on a guard failure the record is left completely unchanged. A
/// successful transition commits the status, any write-once timestamps, a
/// derived-field recompute, and yields a transition event for the
/// notification collaborator.
pub struct OfferController {
    fee_engine: FeeEngine,
}

impl OfferController {
    pub fn new(fee_engine: FeeEngine) -> Self {
        Self { fee_engine }
    }

    /// Request a transition to `to`. Edges outside the allowed set, or with
    /// an unmet guard, fail with InvalidTransition.
    pub fn transition(
        &self,
        record: &mut OfferRecord,
        to: OfferStatus,
    ) -> WorkflowResult<TransitionEvent> {
        let from = record.status;

        // Guards are evaluated before any mutation
        self.check_guard(record, from, to)?;

        record.status = to;
        match to {
            OfferStatus::Accepted => {
                // Write-once: an idempotent retry must not move the timestamp
                if record.accepted_at.is_none() {
                    record.accepted_at = Some(Utc::now());
                }
            }
            OfferStatus::Closed => {
                if record.closed_at.is_none() {
                    record.closed_at = Some(Utc::now());
                }
            }
            _ => {}
        }
        self.fee_engine.recompute_net_proceeds(record);

        let event = TransitionEvent::new(record.offer_id.clone(), from, to);
        tracing::info!(
            offer_id = %event.offer_id,
            from = %event.from_state,
            to = %event.to_state,
            "offer transition"
        );
        Ok(event)
    }

    fn check_guard(
        &self,
        record: &OfferRecord,
        from: OfferStatus,
        to: OfferStatus,
    ) -> WorkflowResult<()> {
        let invalid = |reason: &str| {
            Err(WorkflowError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
                reason: reason.to_string(),
            })
        };

        match (from, to) {
            (OfferStatus::Submitted, OfferStatus::InspectionScheduled) => {
                if record.inspection_status != InspectionStatus::Scheduled {
                    return invalid("inspection must be scheduled with a date and time slot");
                }
                Ok(())
            }
            (OfferStatus::InspectionScheduled, OfferStatus::OfferMade) => {
                if record.inspection_status != InspectionStatus::Completed {
                    return invalid("inspection must be completed");
                }
                if record.offer_amount.is_none() {
                    return invalid("offer amount must be set");
                }
                Ok(())
            }
            (OfferStatus::OfferMade, OfferStatus::Accepted) => {
                if record.offer_amount.is_none() {
                    return invalid("offer amount must be set");
                }
                Ok(())
            }
            (OfferStatus::Accepted, OfferStatus::Closed) => {
                if !ChecklistManager::all_required_complete(record) {
                    return invalid("required closing checklist items are incomplete");
                }
                Ok(())
            }
            // Cancellation needs no guard from any non-terminal state
            (
                OfferStatus::Submitted
                | OfferStatus::InspectionScheduled
                | OfferStatus::OfferMade
                | OfferStatus::Accepted,
                OfferStatus::Cancelled,
            ) => Ok(()),
            (OfferStatus::Closed | OfferStatus::Cancelled, _) => {
                invalid("no transitions out of a terminal state")
            }
            _ => invalid("transition is not in the allowed edge set"),
        }
    }
}

impl Default for OfferController {
    fn default() -> Self {
        Self::new(FeeEngine::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::InspectionStateMachine;
    use crate::models::ChecklistItem;
    use chrono::Duration;

    fn record() -> OfferRecord {
        let mut record = OfferRecord::new(
            "OFF-1700000000000-CTRLTEST1".to_string(),
            "100 Main St".to_string(),
            "12345".to_string(),
            "Alice Seller".to_string(),
            "a@b.com".to_string(),
            "555-0100".to_string(),
            Some(310_000),
        );
        let engine = FeeEngine::default();
        engine.apply_default_fees(&mut record);
        record
    }

    fn schedule_and_complete_inspection(record: &mut OfferRecord) {
        let date = Utc::now().date_naive() + Duration::days(2);
        InspectionStateMachine::schedule(record, date, "09:00-12:00".to_string()).unwrap();
    }

    #[test]
    fn test_full_lifecycle_to_closed() {
        let controller = OfferController::default();
        let mut record = record();

        schedule_and_complete_inspection(&mut record);
        controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .unwrap();

        InspectionStateMachine::complete(&mut record).unwrap();
        record.offer_amount = Some(300_000);
        controller
            .transition(&mut record, OfferStatus::OfferMade)
            .unwrap();

        controller
            .transition(&mut record, OfferStatus::Accepted)
            .unwrap();
        assert!(record.accepted_at.is_some());

        // No required checklist items: accepted -> closed immediately
        let event = controller
            .transition(&mut record, OfferStatus::Closed)
            .unwrap();
        assert_eq!(record.status, OfferStatus::Closed);
        assert!(record.closed_at.is_some());
        assert_eq!(event.from_state, OfferStatus::Accepted);
        assert_eq!(event.to_state, OfferStatus::Closed);
        // Recompute ran as part of the commit
        assert_eq!(record.net_proceeds, Some(295_000));
    }

    #[test]
    fn test_submitted_to_accepted_is_invalid() {
        let controller = OfferController::default();
        let mut record = record();
        let err = controller
            .transition(&mut record, OfferStatus::Accepted)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        assert_eq!(record.status, OfferStatus::Submitted);
        assert!(record.accepted_at.is_none());
    }

    #[test]
    fn test_inspection_guard_blocks_scheduling_transition() {
        let controller = OfferController::default();
        let mut record = record();
        // Sub-state still pending
        assert!(controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .is_err());
        assert_eq!(record.status, OfferStatus::Submitted);
    }

    #[test]
    fn test_offer_made_requires_completed_inspection_and_amount() {
        let controller = OfferController::default();
        let mut record = record();
        schedule_and_complete_inspection(&mut record);
        controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .unwrap();

        // Inspection scheduled but not completed
        record.offer_amount = Some(300_000);
        assert!(controller
            .transition(&mut record, OfferStatus::OfferMade)
            .is_err());

        InspectionStateMachine::complete(&mut record).unwrap();
        record.offer_amount = None;
        assert!(controller
            .transition(&mut record, OfferStatus::OfferMade)
            .is_err());

        record.offer_amount = Some(300_000);
        controller
            .transition(&mut record, OfferStatus::OfferMade)
            .unwrap();
    }

    #[test]
    fn test_required_checklist_blocks_closing() {
        let controller = OfferController::default();
        let mut record = record();
        schedule_and_complete_inspection(&mut record);
        controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .unwrap();
        InspectionStateMachine::complete(&mut record).unwrap();
        record.offer_amount = Some(300_000);
        controller
            .transition(&mut record, OfferStatus::OfferMade)
            .unwrap();
        controller
            .transition(&mut record, OfferStatus::Accepted)
            .unwrap();

        record.closing_checklist = vec![ChecklistItem::new("title-clear", "Clear title", true)];
        assert!(controller
            .transition(&mut record, OfferStatus::Closed)
            .is_err());
        assert_eq!(record.status, OfferStatus::Accepted);
        assert!(record.closed_at.is_none());

        ChecklistManager::complete_item(&mut record, "title-clear").unwrap();
        controller
            .transition(&mut record, OfferStatus::Closed)
            .unwrap();
    }

    #[test]
    fn test_cancellation_ignores_checklist_and_fees() {
        let controller = OfferController::default();
        let mut record = record();
        schedule_and_complete_inspection(&mut record);
        controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .unwrap();
        InspectionStateMachine::complete(&mut record).unwrap();
        record.offer_amount = Some(300_000);
        controller
            .transition(&mut record, OfferStatus::OfferMade)
            .unwrap();

        record.closing_checklist = vec![ChecklistItem::new("title-clear", "Clear title", true)];
        controller
            .transition(&mut record, OfferStatus::Cancelled)
            .unwrap();
        assert_eq!(record.status, OfferStatus::Cancelled);

        // Terminal: nothing further
        let err = controller
            .transition(&mut record, OfferStatus::Submitted)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[test]
    fn test_closed_is_terminal() {
        let controller = OfferController::default();
        let mut record = record();
        schedule_and_complete_inspection(&mut record);
        controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .unwrap();
        InspectionStateMachine::complete(&mut record).unwrap();
        record.offer_amount = Some(300_000);
        controller
            .transition(&mut record, OfferStatus::OfferMade)
            .unwrap();
        controller
            .transition(&mut record, OfferStatus::Accepted)
            .unwrap();
        controller
            .transition(&mut record, OfferStatus::Closed)
            .unwrap();

        // closed -> closed is not an edge
        assert!(controller
            .transition(&mut record, OfferStatus::Closed)
            .is_err());
    }

    #[test]
    fn test_timestamps_are_write_once() {
        let controller = OfferController::default();
        let mut record = record();
        schedule_and_complete_inspection(&mut record);
        controller
            .transition(&mut record, OfferStatus::InspectionScheduled)
            .unwrap();
        InspectionStateMachine::complete(&mut record).unwrap();
        record.offer_amount = Some(300_000);
        controller
            .transition(&mut record, OfferStatus::OfferMade)
            .unwrap();
        controller
            .transition(&mut record, OfferStatus::Accepted)
            .unwrap();

        let accepted_at = record.accepted_at;
        // Failed attempts must not disturb the timestamp
        let _ = controller.transition(&mut record, OfferStatus::Submitted);
        assert_eq!(record.accepted_at, accepted_at);
    }
}

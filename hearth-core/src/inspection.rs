use chrono::{NaiveDate, Utc};

use crate::models::{InspectionStatus, OfferRecord};
use crate::{WorkflowError, WorkflowResult};

/// Inspection scheduling sub-state machine.
///
/// pending -> scheduled -> completed | cancelled, with cancel also allowed
/// from pending and reschedule allowed while scheduled. The offer controller
/// reads this sub-state as a guard but never writes it; all mutation goes
/// through these operations.
pub struct InspectionStateMachine;

impl InspectionStateMachine {
    /// Schedule (or reschedule) the inspection. Allowed from `pending` or
    /// `cancelled`; while already `scheduled` the date and slot are
    /// overwritten without a state change.
    pub fn schedule(
        record: &mut OfferRecord,
        date: NaiveDate,
        time_slot: String,
    ) -> WorkflowResult<()> {
        record.ensure_mutable()?;

        if date < Utc::now().date_naive() {
            return Err(WorkflowError::Validation(format!(
                "inspection date {} is in the past",
                date
            )));
        }

        match record.inspection_status {
            InspectionStatus::Pending | InspectionStatus::Cancelled => {
                record.inspection_status = InspectionStatus::Scheduled;
            }
            InspectionStatus::Scheduled => {
                // Reschedule: overwrite date/slot, state unchanged
            }
            InspectionStatus::Completed => {
                return Err(WorkflowError::InvalidTransition {
                    from: record.inspection_status.to_string(),
                    to: InspectionStatus::Scheduled.to_string(),
                    reason: "inspection already completed".to_string(),
                });
            }
        }

        record.inspection_date = Some(date);
        record.inspection_time_slot = Some(time_slot);
        Ok(())
    }

    /// Mark the inspection completed. Allowed only from `scheduled`.
    pub fn complete(record: &mut OfferRecord) -> WorkflowResult<()> {
        record.ensure_mutable()?;

        if record.inspection_status != InspectionStatus::Scheduled {
            return Err(WorkflowError::InvalidTransition {
                from: record.inspection_status.to_string(),
                to: InspectionStatus::Completed.to_string(),
                reason: "inspection must be scheduled before completion".to_string(),
            });
        }
        record.inspection_status = InspectionStatus::Completed;
        Ok(())
    }

    /// Cancel the inspection. Allowed from `pending` or `scheduled`.
    pub fn cancel(record: &mut OfferRecord) -> WorkflowResult<()> {
        record.ensure_mutable()?;

        match record.inspection_status {
            InspectionStatus::Pending | InspectionStatus::Scheduled => {
                record.inspection_status = InspectionStatus::Cancelled;
                Ok(())
            }
            _ => Err(WorkflowError::InvalidTransition {
                from: record.inspection_status.to_string(),
                to: InspectionStatus::Cancelled.to_string(),
                reason: "inspection can only be cancelled from pending or scheduled".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record() -> OfferRecord {
        OfferRecord::new(
            "OFF-1700000000000-INSPTEST1".to_string(),
            "100 Main St".to_string(),
            "12345".to_string(),
            "Alice Seller".to_string(),
            "a@b.com".to_string(),
            "555-0100".to_string(),
            None,
        )
    }

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Duration::days(1)
    }

    #[test]
    fn test_schedule_from_pending() {
        let mut record = record();
        InspectionStateMachine::schedule(&mut record, tomorrow(), "09:00-12:00".to_string())
            .unwrap();
        assert_eq!(record.inspection_status, InspectionStatus::Scheduled);
        assert_eq!(record.inspection_date, Some(tomorrow()));
        assert_eq!(record.inspection_time_slot.as_deref(), Some("09:00-12:00"));
    }

    #[test]
    fn test_schedule_rejects_past_date() {
        let mut record = record();
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let err = InspectionStateMachine::schedule(&mut record, yesterday, "09:00".to_string())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(record.inspection_status, InspectionStatus::Pending);
        assert!(record.inspection_date.is_none());
    }

    #[test]
    fn test_reschedule_overwrites_without_state_change() {
        let mut record = record();
        InspectionStateMachine::schedule(&mut record, tomorrow(), "09:00-12:00".to_string())
            .unwrap();
        let later = tomorrow() + Duration::days(3);
        InspectionStateMachine::schedule(&mut record, later, "13:00-16:00".to_string()).unwrap();
        assert_eq!(record.inspection_status, InspectionStatus::Scheduled);
        assert_eq!(record.inspection_date, Some(later));
        assert_eq!(record.inspection_time_slot.as_deref(), Some("13:00-16:00"));
    }

    #[test]
    fn test_complete_requires_scheduled() {
        let mut record = record();
        assert!(InspectionStateMachine::complete(&mut record).is_err());

        InspectionStateMachine::schedule(&mut record, tomorrow(), "09:00".to_string()).unwrap();
        InspectionStateMachine::complete(&mut record).unwrap();
        assert_eq!(record.inspection_status, InspectionStatus::Completed);
    }

    #[test]
    fn test_cancel_then_reschedule() {
        let mut record = record();
        InspectionStateMachine::schedule(&mut record, tomorrow(), "09:00".to_string()).unwrap();
        InspectionStateMachine::cancel(&mut record).unwrap();
        assert_eq!(record.inspection_status, InspectionStatus::Cancelled);

        // Cancelled inspections may be scheduled again
        InspectionStateMachine::schedule(&mut record, tomorrow(), "10:00".to_string()).unwrap();
        assert_eq!(record.inspection_status, InspectionStatus::Scheduled);
    }

    #[test]
    fn test_cancel_completed_fails() {
        let mut record = record();
        InspectionStateMachine::schedule(&mut record, tomorrow(), "09:00".to_string()).unwrap();
        InspectionStateMachine::complete(&mut record).unwrap();
        assert!(InspectionStateMachine::cancel(&mut record).is_err());
    }
}

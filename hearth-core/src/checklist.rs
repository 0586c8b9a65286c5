use chrono::Utc;

use crate::models::{ChecklistItem, OfferRecord};
use crate::{WorkflowError, WorkflowResult};

/// Tracks completion of closing tasks. Item lists originate from an external
/// closing-process template; this manager never invents items.
pub struct ChecklistManager;

impl ChecklistManager {
    /// Replace the checklist with externally supplied items. Completion state
    /// of the incoming items is preserved as given.
    pub fn install_items(record: &mut OfferRecord, items: Vec<ChecklistItem>) -> WorkflowResult<()> {
        record.ensure_mutable()?;
        record.closing_checklist = items;
        Ok(())
    }

    /// Mark an item completed with a timestamp. Unknown ids fail with
    /// NotFound; completing an already-completed item is a no-op.
    pub fn complete_item(record: &mut OfferRecord, item_id: &str) -> WorkflowResult<()> {
        record.ensure_mutable()?;

        let item = record
            .closing_checklist
            .iter_mut()
            .find(|i| i.item_id == item_id)
            .ok_or_else(|| WorkflowError::NotFound(format!("checklist item {}", item_id)))?;

        if item.completed {
            return Ok(());
        }
        item.completed = true;
        item.completed_at = Some(Utc::now());
        Ok(())
    }

    /// True iff every required item is completed. Vacuously true when there
    /// are no required items. Used as the accepted -> closed guard.
    pub fn all_required_complete(record: &OfferRecord) -> bool {
        record
            .closing_checklist
            .iter()
            .filter(|i| i.required)
            .all(|i| i.completed)
    }
}

use std::sync::Arc;

use hearth_core::repository::OfferRepository;
use hearth_core::{FeeEngine, FeeSchedule, OfferController};
use hearth_store::{InMemoryOfferRepository, TransitionBroadcaster};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn OfferRepository>,
    pub controller: Arc<OfferController>,
    pub fee_engine: Arc<FeeEngine>,
    pub events: TransitionBroadcaster,
}

impl AppState {
    /// Wire up the workflow around one fee schedule. The schedule comes from
    /// deployment configuration; the engine and controller share it.
    pub fn new(schedule: FeeSchedule, event_capacity: usize) -> Self {
        Self {
            repo: Arc::new(InMemoryOfferRepository::new()),
            controller: Arc::new(OfferController::new(FeeEngine::new(schedule.clone()))),
            fee_engine: Arc::new(FeeEngine::new(schedule)),
            events: TransitionBroadcaster::new(event_capacity),
        }
    }
}

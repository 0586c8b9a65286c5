pub mod app_config;
pub mod events;
pub mod memory_repo;

pub use events::TransitionBroadcaster;
pub use memory_repo::InMemoryOfferRepository;

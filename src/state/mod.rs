pub mod events;

use std::sync::Arc;

use crate::{config::AppConfig, dao::store::Store, state::events::EventHub};

pub use self::events::DomainEvent;

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the store, and the event hub.
pub struct AppState {
    config: AppConfig,
    store: Store,
    events: EventHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            store: Store::new(),
            events: EventHub::new(64),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The in-memory store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Broadcast hub carrying domain events to the SSE stream and the
    /// integration consumer.
    pub fn events(&self) -> &EventHub {
        &self.events
    }
}

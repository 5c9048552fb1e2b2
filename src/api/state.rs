//! Application state for the settlement API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::store::SettlementStore;

/// Shared application state.
///
/// Holds the store every operation reads and writes through, and the loaded
/// engine configuration.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SettlementStore>,
    config: Arc<EngineConfig>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: Arc<dyn SettlementStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Returns the store.
    pub fn store(&self) -> &dyn SettlementStore {
        self.store.as_ref()
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_the_store() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), EngineConfig::default());
        let _cloned = state.clone();
        assert_eq!(Arc::strong_count(&store), 3);
    }
}

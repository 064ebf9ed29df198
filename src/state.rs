//! Shared application state for all routes. The store is injected, never global.

use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new<S: Store + 'static>(store: S) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}

// Application state module
// Shared by every connection: configuration plus the dish store

use super::types::Config;
use crate::store::DishStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: DishStore,
}

impl AppState {
    pub const fn new(config: Config, store: DishStore) -> Self {
        Self { config, store }
    }
}

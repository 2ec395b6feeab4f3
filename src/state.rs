use crate::engine::lifecycle::LifecycleEngine;
use crate::identity::TokenDirectory;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub engine: LifecycleEngine,
    pub identity: TokenDirectory,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(engine: LifecycleEngine) -> Self {
        Self {
            engine,
            identity: TokenDirectory::new(),
            metrics: Metrics::new(),
        }
    }
}

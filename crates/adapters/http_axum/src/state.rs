//! Shared application state for axum handlers.

use std::sync::Arc;

use homechart_app::access::AccessService;
use homechart_app::ports::{ReadingRepository, SessionStore};
use homechart_app::services::chart_service::ChartService;

/// Application state shared across all axum handlers.
///
/// Generic over the reading repository and session store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R, S> {
    /// Chart resampling and reading ingestion.
    pub chart_service: Arc<ChartService<R>>,
    /// Resolves callers to homes.
    pub access_service: Arc<AccessService<S>>,
}

impl<R, S> Clone for AppState<R, S> {
    fn clone(&self) -> Self {
        Self {
            chart_service: Arc::clone(&self.chart_service),
            access_service: Arc::clone(&self.access_service),
        }
    }
}

impl<R, S> AppState<R, S>
where
    R: ReadingRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(chart_service: ChartService<R>, access_service: AccessService<S>) -> Self {
        Self {
            chart_service: Arc::new(chart_service),
            access_service: Arc::new(access_service),
        }
    }
}

//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod sensors;

use axum::Router;
use axum::routing::{get, post};

use homechart_app::ports::{ReadingRepository, SessionStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, S>() -> Router<AppState<R, S>>
where
    R: ReadingRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    Router::new()
        .route("/sensors/{sensor}/chart", get(sensors::chart::<R, S>))
        .route("/sensors/{sensor}/readings", post(sensors::record::<R, S>))
}

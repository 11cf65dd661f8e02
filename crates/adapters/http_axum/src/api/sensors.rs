//! JSON REST handlers for sensor charts and reading ingestion.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Duration;
use serde::Deserialize;

use homechart_app::ports::{ReadingRepository, SessionStore};
use homechart_app::services::chart_service::{ChartRequest, ChartSeries};
use homechart_domain::error::ValidationError;
use homechart_domain::id::SensorName;
use homechart_domain::reading::Reading;
use homechart_domain::time::{Timestamp, now, parse_rfc3339};

use crate::context::Caller;
use crate::error::ApiError;
use crate::state::AppState;

/// Default number of bins when `bins` is omitted.
pub const DEFAULT_BINS: i64 = 200;

/// Default time range: last 24 hours.
const DEFAULT_HOURS: i64 = 24;

/// Query parameters for the chart endpoint.
///
/// Every field is taken as a raw string so malformed values surface as
/// validation errors in the JSON envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Start of time range (RFC 3339). Defaults to 24 hours ago.
    pub from: Option<String>,
    /// End of time range (RFC 3339). Defaults to now.
    pub to: Option<String>,
    /// Number of bins. Defaults to [`DEFAULT_BINS`].
    pub bins: Option<String>,
    /// Home to read, honoured for trusted callers only.
    #[serde(rename = "homeId")]
    pub home_id: Option<String>,
}

/// Query parameters shared by endpoints that only need the home.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(rename = "homeId")]
    pub home_id: Option<String>,
}

/// Request body for recording a reading.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReadingRequest {
    /// Time of the sample (RFC 3339). Defaults to now.
    pub recorded_at: Option<String>,
    pub value: f64,
}

/// Possible responses from the chart endpoint.
pub enum ChartResponse {
    /// 200 OK with a JSON object keyed by millisecond timestamps.
    Ok(Json<ChartSeries>),
}

impl IntoResponse for ChartResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the record endpoint.
pub enum RecordResponse {
    Created(Json<Reading>),
}

impl IntoResponse for RecordResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

fn parse_bins(value: Option<&str>) -> Result<i64, ValidationError> {
    value.map_or(Ok(DEFAULT_BINS), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| ValidationError::MalformedBinCount(raw.to_owned()))
    })
}

/// Unwrap a JSON body, turning axum's rejection into a validation error so
/// it is rendered in the error envelope.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ValidationError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))
}

fn parse_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Timestamp, Timestamp), ValidationError> {
    let current = now();
    let from = from
        .map(parse_rfc3339)
        .transpose()?
        .unwrap_or_else(|| current - Duration::hours(DEFAULT_HOURS));
    let to = to.map(parse_rfc3339).transpose()?.unwrap_or(current);
    Ok((from, to))
}

/// `GET /api/sensors/:sensor/chart?from=&to=&bins=&homeId=`
pub async fn chart<R, S>(
    State(state): State<AppState<R, S>>,
    caller: Caller,
    Path(sensor): Path<String>,
    Query(params): Query<ChartQuery>,
) -> Result<ChartResponse, ApiError>
where
    R: ReadingRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let sensor = SensorName::new(sensor)?;
    let bins = parse_bins(params.bins.as_deref())?;
    let (from, to) = parse_range(params.from.as_deref(), params.to.as_deref())?;

    let ctx = caller.into_context(params.home_id);
    let home_id = state.access_service.resolve_home(&ctx).await?;

    let series = state
        .chart_service
        .resampled_series(home_id, &sensor, ChartRequest { from, to, bins })
        .await?;

    Ok(ChartResponse::Ok(Json(series)))
}

/// `POST /api/sensors/:sensor/readings?homeId=`
pub async fn record<R, S>(
    State(state): State<AppState<R, S>>,
    caller: Caller,
    Path(sensor): Path<String>,
    Query(params): Query<HomeQuery>,
    body: Result<Json<RecordReadingRequest>, JsonRejection>,
) -> Result<RecordResponse, ApiError>
where
    R: ReadingRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let req = parse_body(body)?;
    let recorded_at = req
        .recorded_at
        .as_deref()
        .map(parse_rfc3339)
        .transpose()?
        .unwrap_or_else(now);

    let ctx = caller.into_context(params.home_id);
    let home_id = state.access_service.resolve_home(&ctx).await?;

    let reading = Reading::builder()
        .home_id(home_id)
        .sensor(sensor)
        .recorded_at(recorded_at)
        .value(req.value)
        .build()?;
    let reading = state.chart_service.record_reading(reading).await?;

    tracing::debug!(%home_id, sensor = %reading.sensor, "recorded reading");
    Ok(RecordResponse::Created(Json(reading)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_bins_when_absent() {
        assert_eq!(parse_bins(None), Ok(DEFAULT_BINS));
    }

    #[test]
    fn should_parse_negative_bins_for_later_validation() {
        assert_eq!(parse_bins(Some("-2")), Ok(-2));
    }

    #[test]
    fn should_reject_non_integer_bins() {
        assert_eq!(
            parse_bins(Some("many")),
            Err(ValidationError::MalformedBinCount("many".to_string()))
        );
    }

    #[test]
    fn should_default_range_to_last_day() {
        let (from, to) = parse_range(None, None).unwrap();
        assert_eq!(to - from, Duration::hours(DEFAULT_HOURS));
    }

    #[test]
    fn should_parse_explicit_range() {
        let (from, to) =
            parse_range(Some("2024-01-01T00:00:00Z"), Some("2024-01-02T00:00:00Z")).unwrap();
        assert_eq!(from.timestamp(), 1_704_067_200);
        assert_eq!(to.timestamp(), 1_704_153_600);
    }

    #[test]
    fn should_reject_malformed_range() {
        assert!(matches!(
            parse_range(Some("last tuesday"), None),
            Err(ValidationError::InvalidTimestamp(_))
        ));
    }
}

// HTTP request handlers
use crate::domain::aggregate::{PlotPoint, View};
use crate::domain::chart::ChartSeries;
use crate::domain::reading::{Sample, SensorKind};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ViewQuery {
    pub view: Option<String>,
}

#[derive(Serialize)]
struct ReadingDto {
    timestamp: String,
    value: f64,
}

impl From<Sample> for ReadingDto {
    fn from(sample: Sample) -> Self {
        Self {
            timestamp: sample.timestamp.to_rfc3339(),
            value: sample.value,
        }
    }
}

#[derive(Serialize)]
struct PlotPointDto {
    label: String,
    value: f64,
}

impl From<PlotPoint> for PlotPointDto {
    fn from(point: PlotPoint) -> Self {
        Self {
            label: point.label,
            value: point.value,
        }
    }
}

#[derive(Serialize)]
struct ChartSeriesDto {
    id: String,
    title: String,
    unit: String,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    y_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y_max: Option<f64>,
    ok: bool,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl From<ChartSeries> for ChartSeriesDto {
    fn from(series: ChartSeries) -> Self {
        let (labels, values) = series
            .points
            .into_iter()
            .map(|p| (p.label, p.value))
            .unzip();
        Self {
            id: series.id,
            title: series.title,
            unit: series.unit,
            color: series.color,
            y_min: series.y_min,
            y_max: series.y_max,
            ok: series.ok,
            labels,
            values,
        }
    }
}

#[derive(Serialize)]
struct DashboardDto {
    view: &'static str,
    sensors: Vec<ChartSeriesDto>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn parse_sensor(segment: &str) -> Result<SensorKind, Response> {
    SensorKind::from_path(segment).ok_or_else(|| {
        error_response(
            StatusCode::NOT_FOUND,
            format!("unknown sensor '{}'", segment),
        )
    })
}

fn parse_view(query: &ViewQuery) -> Result<View, Response> {
    match &query.view {
        None => Ok(View::Week),
        Some(raw) => View::from_query(raw).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid view '{}', expected 'day' or 'week'", raw),
            )
        }),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Most recent raw readings for one sensor, newest first
pub async fn get_recent(
    Path(sensor): Path<String>,
    Query(query): Query<LimitQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let kind = match parse_sensor(&sensor) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    match state.chart_service.recent(kind, query.limit).await {
        Ok(samples) => {
            let readings: Vec<ReadingDto> = samples.into_iter().map(ReadingDto::from).collect();
            Json(readings).into_response()
        }
        Err(e) => {
            tracing::error!("Error fetching {} data: {:#}", kind.id(), e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch {} data", kind.id()),
            )
        }
    }
}

/// Aggregated chart series for one sensor
pub async fn get_chart(
    Path(sensor): Path<String>,
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let kind = match parse_sensor(&sensor) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let view = match parse_view(&query) {
        Ok(view) => view,
        Err(response) => return response,
    };

    match state.chart_service.chart(kind, view).await {
        Ok(series) => Json(ChartSeriesDto::from(series)).into_response(),
        Err(e) => {
            tracing::error!("Error building {} chart: {:#}", kind.id(), e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch {} data", kind.id()),
            )
        }
    }
}

/// All three sensors' chart series; a failed sensor comes back
/// degraded instead of failing the response
pub async fn get_dashboard(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let view = match parse_view(&query) {
        Ok(view) => view,
        Err(response) => return response,
    };

    let dashboard = state.chart_service.dashboard(view).await;
    let dto = DashboardDto {
        view: match view {
            View::Day => "day",
            View::Week => "week",
        },
        sensors: dashboard
            .sensors
            .into_iter()
            .map(ChartSeriesDto::from)
            .collect(),
    };
    Json(dto).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::ChartService;
    use crate::application::reading_repository::ReadingRepository;
    use crate::domain::reading::RawReading;
    use crate::infrastructure::config::{DisplaySettings, SensorConfig, SensorsConfig};
    use async_trait::async_trait;
    use axum::body::to_bytes;

    struct FailingRepository;

    #[async_trait]
    impl ReadingRepository for FailingRepository {
        async fn recent_readings(
            &self,
            _measurement: &str,
            _field: &str,
            _limit: usize,
        ) -> anyhow::Result<Vec<RawReading>> {
            anyhow::bail!("store unreachable")
        }
    }

    fn test_config() -> SensorsConfig {
        let sensor = |id: &str| SensorConfig {
            id: id.to_string(),
            title: id.to_string(),
            unit: "%".to_string(),
            color: "#00ffff".to_string(),
            y_min: None,
            y_max: None,
            measurement: None,
            field: None,
            limit: 24,
        };
        SensorsConfig {
            display: DisplaySettings {
                utc_offset_minutes: 0,
                samples_per_day: 24,
            },
            sensors: vec![sensor("temperature"), sensor("humidity"), sensor("moisture")],
        }
    }

    fn failing_state() -> Arc<AppState> {
        Arc::new(AppState {
            chart_service: ChartService::new(Arc::new(FailingRepository), test_config()),
        })
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_unknown_sensor_maps_to_404() {
        let response = parse_sensor("ph").unwrap_err();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_view_maps_to_400() {
        let query = ViewQuery {
            view: Some("month".to_string()),
        };
        let response = parse_view(&query).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_view_defaults_to_week() {
        let query = ViewQuery { view: None };
        assert_eq!(parse_view(&query).unwrap(), View::Week);
    }

    #[tokio::test]
    async fn test_recent_fetch_failure_is_500_with_json_error() {
        let response = get_recent(
            Path("temperature".to_string()),
            Query(LimitQuery { limit: None }),
            State(failing_state()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("\"error\""));
    }

    #[tokio::test]
    async fn test_chart_fetch_failure_is_500() {
        let response = get_chart(
            Path("moisture".to_string()),
            Query(ViewQuery {
                view: Some("day".to_string()),
            }),
            State(failing_state()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_dashboard_stays_200_when_all_sensors_fail() {
        let response = get_dashboard(
            Query(ViewQuery { view: None }),
            State(failing_state()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"ok\":false"));
    }
}

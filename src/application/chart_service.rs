// Chart service - Use case for raw readings and aggregated chart series
use crate::application::reading_repository::ReadingRepository;
use crate::domain::aggregate::{aggregate, View};
use crate::domain::chart::{ChartSeries, Dashboard};
use crate::domain::reading::{parse_readings, Sample, SensorKind};
use crate::infrastructure::config::{SensorConfig, SensorsConfig};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn ReadingRepository>,
    sensors: SensorsConfig,
}

impl ChartService {
    pub fn new(repository: Arc<dyn ReadingRepository>, sensors: SensorsConfig) -> Self {
        Self {
            repository,
            sensors,
        }
    }

    fn config_for(&self, kind: SensorKind) -> anyhow::Result<&SensorConfig> {
        self.sensors
            .sensor(kind)
            .with_context(|| format!("sensor '{}' is not configured", kind.id()))
    }

    async fn fetch_samples(&self, kind: SensorKind, limit: usize) -> anyhow::Result<Vec<Sample>> {
        let cfg = self.config_for(kind)?;
        let measurement = cfg.measurement.as_deref().unwrap_or(kind.measurement());
        let field = cfg.field.as_deref().unwrap_or(kind.field());

        let raw = self
            .repository
            .recent_readings(measurement, field, limit)
            .await
            .with_context(|| format!("failed to fetch {} readings", kind.id()))?;

        // A malformed row rejects the whole batch rather than being
        // skipped, so a gap on the dashboard always means missing data.
        let samples = parse_readings(&raw)
            .with_context(|| format!("malformed {} reading from store", kind.id()))?;

        Ok(samples)
    }

    /// Most recent validated readings, newest first, for the raw
    /// per-sensor endpoints.
    pub async fn recent(
        &self,
        kind: SensorKind,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<Sample>> {
        let limit = limit.unwrap_or(self.config_for(kind)?.limit);
        self.fetch_samples(kind, limit).await
    }

    /// One sensor's aggregated series plus its chart metadata.
    pub async fn chart(&self, kind: SensorKind, view: View) -> anyhow::Result<ChartSeries> {
        let cfg = self.config_for(kind)?;
        let limit = match view {
            View::Day => cfg.limit,
            // Enough history to cover seven calendar days at the
            // configured cadence; the aggregator trims any excess.
            View::Week => self.sensors.display.samples_per_day * 7,
        };

        let samples = self.fetch_samples(kind, limit).await?;
        let points = aggregate(&samples, view, self.sensors.offset());

        Ok(ChartSeries {
            id: cfg.id.clone(),
            title: cfg.title.clone(),
            unit: cfg.unit.clone(),
            color: cfg.color.clone(),
            y_min: cfg.y_min,
            y_max: cfg.y_max,
            ok: true,
            points,
        })
    }

    /// All three sensors for one dashboard render. Fetches run
    /// concurrently and a failed sensor degrades to an empty series
    /// instead of failing the whole response.
    pub async fn dashboard(&self, view: View) -> Dashboard {
        let (temperature, humidity, moisture) = futures::join!(
            self.chart(SensorKind::Temperature, view),
            self.chart(SensorKind::Humidity, view),
            self.chart(SensorKind::Moisture, view),
        );

        let sensors = SensorKind::ALL
            .into_iter()
            .zip([temperature, humidity, moisture])
            .map(|(kind, result)| match result {
                Ok(series) => series,
                Err(e) => {
                    tracing::warn!("degrading {} series: {:#}", kind.id(), e);
                    self.degraded_series(kind)
                }
            })
            .collect();

        Dashboard { sensors }
    }

    fn degraded_series(&self, kind: SensorKind) -> ChartSeries {
        match self.sensors.sensor(kind) {
            Some(cfg) => ChartSeries::degraded(
                cfg.id.clone(),
                cfg.title.clone(),
                cfg.unit.clone(),
                cfg.color.clone(),
            ),
            None => ChartSeries::degraded(
                kind.id().to_string(),
                kind.id().to_string(),
                String::new(),
                String::new(),
            ),
        }
    }
}

// Repository trait for reading store access
use crate::domain::reading::RawReading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Most recent readings for one measurement, newest first. Rows come
    /// back unvalidated; the caller decides how strictly to parse them.
    async fn recent_readings(
        &self,
        measurement: &str,
        field: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<RawReading>>;
}

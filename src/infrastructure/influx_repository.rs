// InfluxDB reading store adapter
use crate::application::reading_repository::ReadingRepository;
use crate::domain::reading::RawReading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    host: String,
    token: String,
    database: String,
    retention_policy: String,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    #[allow(dead_code)]
    name: String,
    columns: Vec<String>,
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxRepository {
    pub fn new(host: String, token: String, database: String, retention_policy: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            database,
            retention_policy,
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to reading store")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reading store query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse reading store response")?;

        if let Some(result) = data.results.first() {
            if let Some(error) = &result.error {
                anyhow::bail!("Reading store query error: {}", error);
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl ReadingRepository for InfluxRepository {
    async fn recent_readings(
        &self,
        measurement: &str,
        field: &str,
        limit: usize,
    ) -> Result<Vec<RawReading>> {
        // Newest first, mirroring the dashboard's "most recent N" reads.
        let query = format!(
            "SELECT \"{}\" FROM \"{}\" ORDER BY time DESC LIMIT {}",
            field, measurement, limit
        );
        tracing::debug!("Executing reading query: {}", query);
        let response = self.execute_query(&query).await?;

        let mut readings = Vec::new();
        if let Some(result) = response.results.first() {
            if let Some(series) = &result.series {
                for s in series {
                    let time_idx = s.columns.iter().position(|c| c == "time").unwrap_or(0);
                    let value_idx = s
                        .columns
                        .iter()
                        .position(|c| c == field)
                        .unwrap_or(1);

                    for value_row in &s.values {
                        if value_row.len() > time_idx && value_row.len() > value_idx {
                            if let Some(time_str) = value_row[time_idx].as_str() {
                                readings.push(RawReading {
                                    timestamp: time_str.to_string(),
                                    value: value_row[value_idx].clone(),
                                });
                            }
                        }
                    }
                }
            }
        }

        tracing::debug!("Got {} rows for measurement {}", readings.len(), measurement);
        Ok(readings)
    }
}

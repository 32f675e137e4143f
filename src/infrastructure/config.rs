use crate::domain::reading::SensorKind;
use chrono::FixedOffset;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub store: StoreSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3001
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorsConfig {
    pub display: DisplaySettings,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    /// Fixed offset used for day grouping and axis labels. A fixed
    /// offset keeps output reproducible regardless of host timezone.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Expected sample cadence, used to size week-view fetches.
    #[serde(default = "default_samples_per_day")]
    pub samples_per_day: usize,
}

fn default_samples_per_day() -> usize {
    24
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub color: String,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    /// Override the measurement/field names derived from the sensor id.
    pub measurement: Option<String>,
    pub field: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    24
}

impl SensorsConfig {
    pub fn sensor(&self, kind: SensorKind) -> Option<&SensorConfig> {
        self.sensors.iter().find(|s| s.id == kind.id())
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.display.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

pub fn load_store_config() -> anyhow::Result<StoreConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/store"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_sensors_config() -> anyhow::Result<SensorsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/sensors"))
        .build()?;

    let parsed: SensorsConfig = settings.try_deserialize()?;
    for kind in SensorKind::ALL {
        if parsed.sensor(kind).is_none() {
            anyhow::bail!("config/sensors is missing an entry for '{}'", kind.id());
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENSORS_TOML: &str = r##"
        [display]
        utc_offset_minutes = 120

        [[sensors]]
        id = "temperature"
        title = "Temperature (°C)"
        unit = "°C"
        color = "#ff6b6b"
        y_min = 15.0
        y_max = 35.0

        [[sensors]]
        id = "humidity"
        title = "Humidity (%)"
        unit = "%"
        color = "#2196f3"
        y_min = 0.0
        y_max = 100.0

        [[sensors]]
        id = "moisture"
        title = "Moisture (%)"
        unit = "%"
        color = "#00ffff"
        limit = 48
    "##;

    fn parse_sensors() -> SensorsConfig {
        config::Config::builder()
            .add_source(config::File::from_str(
                SENSORS_TOML,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_sensor_lookup_by_kind() {
        let cfg = parse_sensors();
        let moisture = cfg.sensor(SensorKind::Moisture).unwrap();
        assert_eq!(moisture.limit, 48);
        assert_eq!(moisture.y_min, None);

        let temp = cfg.sensor(SensorKind::Temperature).unwrap();
        assert_eq!(temp.limit, 24);
        assert_eq!(temp.y_max, Some(35.0));
    }

    #[test]
    fn test_display_offset() {
        let cfg = parse_sensors();
        assert_eq!(cfg.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(cfg.display.samples_per_day, 24);
    }
}

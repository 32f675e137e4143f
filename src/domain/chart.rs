// Chart domain model
use super::aggregate::PlotPoint;

/// One aggregated sensor series plus the presentation hints the chart
/// needs (color, unit, optional fixed y-range).
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub color: String,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    /// False when the sensor's fetch failed and the series degraded to
    /// an empty point list.
    pub ok: bool,
    pub points: Vec<PlotPoint>,
}

impl ChartSeries {
    pub fn degraded(id: String, title: String, unit: String, color: String) -> Self {
        Self {
            id,
            title,
            unit,
            color,
            y_min: None,
            y_max: None,
            ok: false,
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub sensors: Vec<ChartSeries>,
}

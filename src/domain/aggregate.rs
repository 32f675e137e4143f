// Time-series aggregation - raw samples to chart-ready points
use super::reading::Sample;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Week view keeps the most recent day groups that actually have data.
const MAX_WEEK_DAYS: usize = 7;

/// Aggregation mode for a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Day,
    Week,
}

impl View {
    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "day" => Some(View::Day),
            "week" => Some(View::Week),
            _ => None,
        }
    }
}

/// A label/value pair ready for a chart axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub label: String,
    pub value: f64,
}

struct DayGroup {
    anchor: DateTime<Utc>,
    sum: f64,
    count: usize,
}

/// Turn an unordered batch of samples into an ordered series of plot
/// points. Input order is not trusted; the store may also return more
/// history than the view needs.
///
/// Day view passes every sample through, labelled with its time of day.
/// Week view averages each calendar day and keeps at most the 7 most
/// recent days present, labelled with the day's date. Grouping and
/// labels both use `offset` so a reading near midnight lands in the
/// same day it is labelled with. Formats are pinned (`%H:%M`,
/// `%Y-%m-%d`) rather than left to the host locale.
pub fn aggregate(samples: &[Sample], view: View, offset: FixedOffset) -> Vec<PlotPoint> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<Sample> = samples.to_vec();
    ordered.sort_by_key(|s| s.timestamp);

    match view {
        View::Day => ordered
            .iter()
            .map(|s| PlotPoint {
                label: s.timestamp.with_timezone(&offset).format("%H:%M").to_string(),
                value: s.value,
            })
            .collect(),
        View::Week => {
            // BTreeMap keeps the day groups in ascending date order.
            let mut days: BTreeMap<NaiveDate, DayGroup> = BTreeMap::new();
            for sample in &ordered {
                let day = sample.timestamp.with_timezone(&offset).date_naive();
                days.entry(day)
                    .and_modify(|g| {
                        g.sum += sample.value;
                        g.count += 1;
                    })
                    .or_insert(DayGroup {
                        // First sample in ascending order is the true
                        // chronological minimum of the day.
                        anchor: sample.timestamp,
                        sum: sample.value,
                        count: 1,
                    });
            }

            let skip = days.len().saturating_sub(MAX_WEEK_DAYS);
            days.into_values()
                .skip(skip)
                .map(|g| PlotPoint {
                    label: g.anchor.with_timezone(&offset).format("%Y-%m-%d").to_string(),
                    value: g.sum / g.count as f64,
                })
                .collect()
        }
    }
}

// ── Chart series domain types ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub time: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSeries {
    pub zone_id: String,
    pub zone_name: String,
    pub data: Vec<TimeSeriesPoint>,
}

/// Crowd-trend series for the chart panel, replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub hourly: Vec<TimeSeriesPoint>,
    pub daily: Vec<TimeSeriesPoint>,
    pub by_zone: Vec<ZoneSeries>,
}

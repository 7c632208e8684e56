use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Response of `GET /points/{lat},{lon}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridReference {
    pub properties: GridReferenceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridReferenceProperties {
    /// Forecast office code, e.g. "TOP".
    pub grid_id: String,
    pub grid_x: i32,
    pub grid_y: i32,

    // Follow-up URLs, passed through untouched.
    pub forecast: String,
    pub forecast_hourly: String,
    pub forecast_grid_data: String,
    pub observation_stations: String,
}

/// Office and grid coordinates, as taken by [`crate::NwsClient::fetch_forecast`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub office: String,
    pub x: i32,
    pub y: i32,
}

impl GridReference {
    pub fn grid_point(&self) -> GridPoint {
        GridPoint {
            office: self.properties.grid_id.clone(),
            x: self.properties.grid_x,
            y: self.properties.grid_y,
        }
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{},{}", self.office, self.x, self.y)
    }
}

/// Response of `GET /gridpoints/{office}/{x},{y}/forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub properties: ForecastProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastProperties {
    pub updated: String,
    /// Units system, "us" or "si".
    pub units: String,
    pub forecast_generator: String,
    pub generated_at: String,
    pub update_time: String,
    /// ISO 8601 interval, e.g. "2023-06-20T08:00:00+00:00/P7DT12H".
    pub valid_times: String,
    pub elevation: Elevation,
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elevation {
    pub value: f64,
    pub unit_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub number: u32,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub is_daytime: bool,
    pub temperature: i32,
    pub temperature_unit: String,
    pub temperature_trend: Option<String>,
    pub wind_speed: String,
    pub wind_direction: String,
    pub icon: String,
    pub short_forecast: String,
    pub detailed_forecast: String,
}

impl ForecastPeriod {
    /// Start of the period, or `None` if the upstream timestamp is not RFC 3339.
    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.start_time).ok()
    }

    pub fn end(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.end_time).ok()
    }
}

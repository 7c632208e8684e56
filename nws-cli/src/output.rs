//! Human-readable rendering of API responses.

use std::fmt::Write;

use nws_core::{Forecast, ForecastPeriod, GridReference};

const PERIOD_TIME_FORMAT: &str = "%a %b %-d %H:%M";

pub fn render_grid_reference(grid: &GridReference) -> String {
    let p = &grid.properties;
    let mut out = String::new();

    let _ = writeln!(out, "Office:               {}", p.grid_id);
    let _ = writeln!(out, "Grid:                 {},{}", p.grid_x, p.grid_y);
    let _ = writeln!(out, "Forecast:             {}", p.forecast);
    let _ = writeln!(out, "Hourly forecast:      {}", p.forecast_hourly);
    let _ = writeln!(out, "Grid data:            {}", p.forecast_grid_data);
    let _ = writeln!(out, "Observation stations: {}", p.observation_stations);

    out
}

pub fn render_forecast(forecast: &Forecast) -> String {
    let p = &forecast.properties;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Forecast generated {} (units: {}, elevation: {} {})",
        p.generated_at, p.units, p.elevation.value, p.elevation.unit_code
    );

    if p.periods.is_empty() {
        out.push_str("No forecast periods available.\n");
        return out;
    }

    for period in &p.periods {
        out.push('\n');
        out.push_str(&render_period(period));
    }

    out
}

fn render_period(period: &ForecastPeriod) -> String {
    // Local time of the forecast office, as sent by the API.
    let start = period
        .start()
        .map(|dt| dt.format(PERIOD_TIME_FORMAT).to_string())
        .unwrap_or_else(|| period.start_time.clone());

    let trend = period
        .temperature_trend
        .as_deref()
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();

    format!(
        "{} [{}]\n  {}°{}{}, wind {} {}\n  {}\n",
        period.name,
        start,
        period.temperature,
        period.temperature_unit,
        trend,
        period.wind_direction,
        period.wind_speed,
        period.detailed_forecast,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast(periods: serde_json::Value) -> Forecast {
        serde_json::from_value(serde_json::json!({
            "properties": {
                "updated": "2023-06-20T14:57:00+00:00",
                "units": "us",
                "forecastGenerator": "ForecastOffice",
                "generatedAt": "2023-06-20T15:57:00+00:00",
                "updateTime": "2023-06-20T14:57:00+00:00",
                "validTimes": "2023-06-20T08:00:00+00:00/P7DT12H",
                "elevation": { "value": 433.12, "unitCode": "unit:m" },
                "periods": periods
            }
        }))
        .expect("valid forecast")
    }

    fn afternoon(trend: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "number": 1,
            "name": "This Afternoon",
            "startTime": "2023-06-20T13:00:00-05:00",
            "endTime": "2023-06-20T18:00:00-05:00",
            "isDaytime": true,
            "temperature": 82,
            "temperatureUnit": "F",
            "temperatureTrend": trend,
            "windSpeed": "10 to 15 mph",
            "windDirection": "S",
            "icon": "https://api.weather.gov/icons/land/day/sct?size=medium",
            "shortForecast": "Mostly Sunny",
            "detailedForecast": "Mostly sunny, with a high near 82."
        })
    }

    #[test]
    fn renders_period_in_office_local_time() {
        let out = render_forecast(&forecast(serde_json::json!([afternoon(None)])));

        assert!(out.contains("units: us, elevation: 433.12 unit:m"));
        assert!(out.contains("This Afternoon [Tue Jun 20 13:00]"));
        assert!(out.contains("82°F, wind S 10 to 15 mph"));
        assert!(out.contains("Mostly sunny, with a high near 82."));
    }

    #[test]
    fn renders_temperature_trend_when_present() {
        let out = render_forecast(&forecast(serde_json::json!([afternoon(Some("falling"))])));
        assert!(out.contains("82°F (falling), wind"));
    }

    #[test]
    fn renders_empty_forecast() {
        let out = render_forecast(&forecast(serde_json::json!([])));
        assert!(out.contains("No forecast periods available."));
    }

    #[test]
    fn renders_grid_reference() {
        let grid: GridReference = serde_json::from_value(serde_json::json!({
            "properties": {
                "gridId": "TOP",
                "gridX": 31,
                "gridY": 80,
                "forecast": "https://api.weather.gov/gridpoints/TOP/31,80/forecast",
                "forecastHourly": "https://api.weather.gov/gridpoints/TOP/31,80/forecast/hourly",
                "forecastGridData": "https://api.weather.gov/gridpoints/TOP/31,80",
                "observationStations": "https://api.weather.gov/gridpoints/TOP/31,80/stations"
            }
        }))
        .expect("valid grid reference");

        let out = render_grid_reference(&grid);

        assert!(out.contains("Office:               TOP"));
        assert!(out.contains("Grid:                 31,80"));
    }
}

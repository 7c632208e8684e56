//! Client library for the National Weather Service API (api.weather.gov).
//!
//! This crate defines:
//! - [`NwsClient`], which resolves coordinates to a forecast grid and fetches forecasts
//! - The response models for the `/points` and `/gridpoints/.../forecast` endpoints
//! - On-disk configuration for the identification (`User-Agent`) string
//!
//! It is used by `nws-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! # async fn run() -> Result<(), nws_core::NwsError> {
//! let client = nws_core::NwsClient::new("my-weather-app, contact@example.com")?;
//! let grid = client.resolve_grid_reference(39.7456, -97.0892).await?;
//! let point = grid.grid_point();
//! let forecast = client.fetch_forecast(&point.office, point.x, point.y).await?;
//! println!("{}", forecast.properties.periods[0].short_forecast);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{ClientOptions, NwsClient, WeatherService};
pub use config::Config;
pub use error::NwsError;
pub use model::{
    Elevation, Forecast, ForecastPeriod, ForecastProperties, GridPoint, GridReference,
    GridReferenceProperties,
};

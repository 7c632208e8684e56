use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Text, validator::Validation};
use nws_core::{Config, Forecast, GridReference, NwsClient, NwsError, WeatherService};
use serde::Serialize;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nws", version, about = "National Weather Service forecast CLI")]
pub struct Cli {
    /// User agent sent to the API (application name and contact). Overrides the configured one.
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Print the raw API response as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the user agent in the config file.
    Configure,

    /// Resolve coordinates to a forecast office and grid point.
    Points {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Show the forecast for a grid point.
    Forecast {
        /// Forecast office code, e.g. "TOP".
        office: String,
        #[arg(allow_negative_numbers = true)]
        grid_x: i32,
        #[arg(allow_negative_numbers = true)]
        grid_y: i32,
    },

    /// Resolve coordinates, then show the forecast for the grid point they fall in.
    Lookup {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupOutput<'a> {
    grid_reference: &'a GridReference,
    forecast: &'a Forecast,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli {
            user_agent,
            json,
            command,
            ..
        } = self;

        match command {
            Command::Configure => configure(user_agent),
            Command::Points {
                latitude,
                longitude,
            } => {
                let client = build_client(user_agent)?;
                let grid = client
                    .resolve_grid_reference(latitude, longitude)
                    .await
                    .context("Failed to resolve grid reference")?;

                if json {
                    print_json(&grid)
                } else {
                    print!("{}", output::render_grid_reference(&grid));
                    Ok(())
                }
            }
            Command::Forecast {
                office,
                grid_x,
                grid_y,
            } => {
                let client = build_client(user_agent)?;
                let forecast = client
                    .fetch_forecast(&office, grid_x, grid_y)
                    .await
                    .with_context(|| format!("Failed to fetch forecast for {office}/{grid_x},{grid_y}"))?;

                if json {
                    print_json(&forecast)
                } else {
                    print!("{}", output::render_forecast(&forecast));
                    Ok(())
                }
            }
            Command::Lookup {
                latitude,
                longitude,
            } => {
                let client = build_client(user_agent)?;
                let (grid, forecast) = lookup(&client, latitude, longitude).await?;

                if json {
                    print_json(&LookupOutput {
                        grid_reference: &grid,
                        forecast: &forecast,
                    })
                } else {
                    print!("{}", output::render_grid_reference(&grid));
                    println!();
                    print!("{}", output::render_forecast(&forecast));
                    Ok(())
                }
            }
        }
    }
}

/// Points lookup followed by a forecast request for the returned grid point.
pub async fn lookup(
    service: &dyn WeatherService,
    latitude: f64,
    longitude: f64,
) -> Result<(GridReference, Forecast)> {
    let grid = service
        .resolve_grid_reference(latitude, longitude)
        .await
        .context("Failed to resolve grid reference")?;

    let point = grid.grid_point();
    tracing::debug!(%point, "resolved grid point");

    let forecast = service
        .fetch_forecast(&point.office, point.x, point.y)
        .await
        .with_context(|| format!("Failed to fetch forecast for {point}"))?;

    Ok((grid, forecast))
}

fn build_client(user_agent: Option<String>) -> Result<NwsClient> {
    let config = config_or_default(Config::load(), user_agent.is_some())?;

    NwsClient::from_options(config.client_options(user_agent)).map_err(|e| match e {
        NwsError::InvalidConfiguration(_) => anyhow!(
            "{e}\n\
             Hint: run `nws configure` or pass --user-agent \"my-weather-app, contact@example.com\"."
        ),
        other => other.into(),
    })
}

/// With `--user-agent` given the config file is optional, so an unreadable one
/// only produces a warning.
fn config_or_default(loaded: Result<Config>, has_user_agent_override: bool) -> Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if has_user_agent_override => {
            tracing::warn!("ignoring config file: {e:#}");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn configure(user_agent: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let user_agent = match user_agent {
        Some(ua) => ua,
        None => prompt_user_agent(config.user_agent())?,
    };

    if user_agent.is_empty() {
        bail!("A user agent is required to use the NWS API.");
    }

    // Rejects values that cannot be sent as a header.
    NwsClient::new(user_agent.as_str())?;

    config.set_user_agent(user_agent);
    let path = config.save()?;

    println!("Saved user agent to {}", path.display());
    Ok(())
}

fn prompt_user_agent(current: Option<&str>) -> Result<String> {
    let mut prompt = Text::new("User agent:")
        .with_help_message("Application name and contact, e.g. \"my-weather-app, contact@example.com\"")
        .with_validator(|input: &str| {
            if input.is_empty() {
                Ok(Validation::Invalid("A user agent is required".into()))
            } else {
                Ok(Validation::Valid)
            }
        });

    if let Some(current) = current {
        prompt = prompt.with_default(current);
    }

    prompt.prompt().context("Failed to read user agent")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{json}");
    Ok(())
}

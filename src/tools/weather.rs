//! `weather/info`: capital city coordinates for a country, ready for a weather lookup

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::definition::ToolDefinition;
use super::provider::ToolProvider;
use super::registry::ToolRegistry;
use super::upstream::{UpstreamClient, UpstreamError};

pub const WEATHER_INFO_TOOL: &str = "weather/info";

pub const WEATHER_NOTE: &str = "You can now query Open-Meteo weather API with these coordinates.";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WeatherInfoArgs {
    /// Country name, e.g. 'france'
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub country: String,
    pub capital: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub population: Option<u64>,
    pub note: String,
}

/// Provider registering `weather/info`
pub struct WeatherTools {
    upstream: Arc<UpstreamClient>,
}

impl WeatherTools {
    pub fn new(upstream: Arc<UpstreamClient>) -> Self {
        Self { upstream }
    }

    pub fn weather_info(&self) -> ToolDefinition {
        let upstream = Arc::clone(&self.upstream);

        ToolDefinition::typed(WEATHER_INFO_TOOL, move |args: WeatherInfoArgs| {
            let upstream = Arc::clone(&upstream);
            async move { locate_capital(&upstream, &args.country).await }
        })
        .with_name("Weather Info")
        .with_description(
            "Get the capital city's location info for a given country (for weather use).",
        )
    }
}

impl ToolProvider for WeatherTools {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn register(&self, registry: &mut ToolRegistry) {
        registry.register(self.weather_info());
    }
}

async fn locate_capital(
    upstream: &UpstreamClient,
    country: &str,
) -> Result<WeatherInfo, UpstreamError> {
    let record = upstream.country(country).await?;
    let capital = record
        .first_capital()
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::Missing(format!("Could not determine capital for {}", country)))?;

    let location = upstream
        .geocode(&capital)
        .await?
        .ok_or_else(|| UpstreamError::Missing(format!("No location found for {}", capital)))?;

    Ok(WeatherInfo {
        country: record.name.common,
        capital,
        latitude: location.latitude,
        longitude: location.longitude,
        timezone: location.timezone,
        population: record.population,
        note: WEATHER_NOTE.to_string(),
    })
}

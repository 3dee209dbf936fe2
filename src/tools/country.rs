//! `country/info`: country facts from RestCountries

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::definition::ToolDefinition;
use super::provider::ToolProvider;
use super::registry::ToolRegistry;
use super::upstream::{RestCountry, UpstreamClient};

pub const COUNTRY_INFO_TOOL: &str = "country/info";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CountryInfoArgs {
    /// e.g. 'france'
    pub name: String,
}

/// Flattened country record returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub name: String,
    pub official_name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub area_km2: Option<f64>,
    pub languages: Vec<String>,
    pub currency: Option<String>,
    pub symbol: Option<String>,
    pub flag: Option<String>,
    pub maps: Option<String>,
    pub borders: Vec<String>,
}

impl From<RestCountry> for CountryInfo {
    fn from(country: RestCountry) -> Self {
        let capital = country.first_capital().map(str::to_string);
        let languages = country.language_names();
        let currency = country.primary_currency();

        Self {
            name: country.name.common,
            official_name: country.name.official,
            capital,
            region: country.region,
            subregion: country.subregion,
            population: country.population,
            area_km2: country.area,
            languages,
            symbol: currency.as_ref().and_then(|c| c.symbol.clone()),
            currency: currency.map(|c| c.name),
            flag: country.flag,
            maps: country.maps.and_then(|maps| maps.google_maps),
            borders: country.borders.unwrap_or_default(),
        }
    }
}

/// Provider registering `country/info`
pub struct CountryTools {
    upstream: Arc<UpstreamClient>,
}

impl CountryTools {
    pub fn new(upstream: Arc<UpstreamClient>) -> Self {
        Self { upstream }
    }

    pub fn country_info(&self) -> ToolDefinition {
        let upstream = Arc::clone(&self.upstream);

        ToolDefinition::typed(COUNTRY_INFO_TOOL, move |args: CountryInfoArgs| {
            let upstream = Arc::clone(&upstream);
            async move { upstream.country(&args.name).await.map(CountryInfo::from) }
        })
        .with_name("Country Info")
        .with_description("Get structured information about a country by name")
    }
}

impl ToolProvider for CountryTools {
    fn name(&self) -> &'static str {
        "country"
    }

    fn register(&self, registry: &mut ToolRegistry) {
        registry.register(self.country_info());
    }
}

//! HTTP client for the public data APIs behind the built-in tools

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Timeout applied to every upstream lookup
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

pub const DEFAULT_RESTCOUNTRIES_URL: &str = "https://restcountries.com";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

/// Errors raised while talking to an upstream data API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The upstream answered but had nothing usable
    #[error("{0}")]
    Missing(String),
}

/// Country record as returned by the RestCountries v3.1 API
#[derive(Debug, Clone, Deserialize)]
pub struct RestCountry {
    pub name: CountryName,
    pub capital: Option<Vec<String>>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub area: Option<f64>,
    /// Keyed by language code, in upstream order
    pub languages: Option<Map<String, Value>>,
    /// Keyed by ISO currency code, in upstream order
    pub currencies: Option<Map<String, Value>>,
    pub flag: Option<String>,
    pub maps: Option<Maps>,
    pub borders: Option<Vec<String>>,
}

impl RestCountry {
    pub fn first_capital(&self) -> Option<&str> {
        self.capital
            .as_ref()
            .and_then(|capitals| capitals.first())
            .map(String::as_str)
    }

    /// Language names in the order the API lists them
    pub fn language_names(&self) -> Vec<String> {
        self.languages
            .iter()
            .flat_map(|languages| languages.values())
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect()
    }

    /// The first currency the API lists
    pub fn primary_currency(&self) -> Option<Currency> {
        let (code, currency) = self.currencies.as_ref()?.iter().next()?;
        match serde_json::from_value(currency.clone()) {
            Ok(currency) => Some(currency),
            Err(e) => {
                tracing::debug!(code = %code, error = %e, "Skipping malformed currency");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryName {
    pub common: String,
    pub official: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Currency {
    pub name: String,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Maps {
    #[serde(rename = "googleMaps")]
    pub google_maps: Option<String>,
}

/// A geocoding hit from the Open-Meteo geocoding API
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeoLocation>>,
}

/// Shared client for RestCountries and Open-Meteo geocoding
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    countries_base_url: Url,
    geocoding_base_url: Url,
}

impl UpstreamClient {
    /// Create a client against the given base URLs
    pub fn new(countries_base_url: &str, geocoding_base_url: &str) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Request {
                url: countries_base_url.to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            countries_base_url: parse_base_url(countries_base_url)?,
            geocoding_base_url: parse_base_url(geocoding_base_url)?,
        })
    }

    /// Create a client against the public endpoints
    pub fn public() -> Result<Self, UpstreamError> {
        Self::new(DEFAULT_RESTCOUNTRIES_URL, DEFAULT_GEOCODING_URL)
    }

    /// Look up a country by (partial) name and return the first match
    pub async fn country(&self, name: &str) -> Result<RestCountry, UpstreamError> {
        let url = with_segments(&self.countries_base_url, &["v3.1", "name", name])?;
        let countries: Vec<RestCountry> = self.get_json(url).await?;

        countries
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Missing(format!("No country found for {}", name)))
    }

    /// Geocode a place name, returning the best hit if there is one
    pub async fn geocode(&self, place: &str) -> Result<Option<GeoLocation>, UpstreamError> {
        let mut url = with_segments(&self.geocoding_base_url, &["v1", "search"])?;
        url.query_pairs_mut()
            .append_pair("name", place)
            .append_pair("count", "1");

        let response: GeocodingResponse = self.get_json(url).await?;
        Ok(response.results.and_then(|results| results.into_iter().next()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        tracing::debug!(%url, "Upstream request");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, UpstreamError> {
    Url::parse(raw).map_err(|e| UpstreamError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })
}

/// Append percent-encoded path segments to a base URL
fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, UpstreamError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidUrl {
            url: base.to_string(),
            message: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

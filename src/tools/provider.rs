//! Tool providers: groups of tools registered together at startup

use std::sync::Arc;

use super::country::CountryTools;
use super::error::ProviderError;
use super::registry::ToolRegistry;
use super::upstream::UpstreamClient;
use super::weather::WeatherTools;

/// Names accepted by [`builtin_providers`], in default registration order
pub const BUILTIN_PROVIDERS: &[&str] = &["country", "weather"];

/// A named group of tools
///
/// Providers are listed explicitly in configuration and registered in that
/// order, so the resulting tool list is deterministic.
pub trait ToolProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut ToolRegistry);
}

/// Resolve provider names to the built-in providers
///
/// Unknown names fail the whole selection; nothing is registered partially.
pub fn builtin_providers(
    names: &[String],
    upstream: Arc<UpstreamClient>,
) -> Result<Vec<Box<dyn ToolProvider>>, ProviderError> {
    names
        .iter()
        .map(|name| -> Result<Box<dyn ToolProvider>, ProviderError> {
            match name.trim() {
                "country" => Ok(Box::new(CountryTools::new(Arc::clone(&upstream)))),
                "weather" => Ok(Box::new(WeatherTools::new(Arc::clone(&upstream)))),
                other => Err(ProviderError {
                    name: other.to_string(),
                    available: BUILTIN_PROVIDERS.join(", "),
                }),
            }
        })
        .collect()
}

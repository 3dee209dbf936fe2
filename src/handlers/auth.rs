// Shared-secret authentication for the tool endpoints

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use warp::{Filter, Rejection};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY: &str = "key";

/// The configured shared secret
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::from(key.into()))
    }

    /// Constant-time comparison against a presented credential
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(presented) => presented.as_bytes().ct_eq(self.0.as_bytes()).into(),
            None => false,
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Rejection for a missing or wrong credential
#[derive(Debug)]
pub struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

/// Credential from the `x-api-key` header, falling back to the `key` query parameter
///
/// An empty header counts as absent.
pub fn presented_key(
    header: Option<String>,
    query: &HashMap<String, String>,
) -> Option<String> {
    header
        .filter(|value| !value.is_empty())
        .or_else(|| query.get(API_KEY_QUERY).cloned())
}

/// Extracts the presented credential, if any
pub fn credentials() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    let query = warp::query::<HashMap<String, String>>()
        .or(warp::any().map(HashMap::new))
        .unify();

    warp::header::optional::<String>(API_KEY_HEADER)
        .and(query)
        .map(|header: Option<String>, query: HashMap<String, String>| {
            presented_key(header, &query)
        })
}

/// Passes only requests carrying the configured key; rejects with [`Unauthorized`]
pub fn require_api_key(
    api_key: ApiKey,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    credentials()
        .and_then(move |presented: Option<String>| {
            let api_key = api_key.clone();
            async move {
                if api_key.verify(presented.as_deref()) {
                    Ok(())
                } else {
                    tracing::warn!("Rejected request with missing or invalid API key");
                    Err(warp::reject::custom(Unauthorized))
                }
            }
        })
        .untuple_one()
}

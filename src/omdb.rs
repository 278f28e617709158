//! OMDb Lookup Adapter
//!
//! Translates a free-text title into an unpersisted movie candidate via the
//! OMDb HTTP API. Each lookup is a single fresh round trip; persistence is
//! the caller's responsibility.

use reqwest::Client;
use serde::Deserialize;

use crate::database::NewMovie;

#[derive(Debug)]
pub enum LookupError {
    /// Network failure or non-success HTTP status from the provider.
    Contact(String),
    /// The provider answered but found no matching movie.
    NotFound(String),
    /// The provider matched, but the payload could not be turned into a
    /// movie candidate.
    Processing(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Contact(msg) => write!(f, "Error contacting movie database: {}", msg),
            LookupError::NotFound(msg) => write!(f, "Movie not found: {}", msg),
            LookupError::Processing(msg) => write!(f, "Error processing movie data: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

/// OMDb response payload, decoded once at the adapter boundary.
#[derive(Debug, Deserialize)]
pub struct OmdbPayload {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Look up a movie by title and build a candidate owned by `user_id`.
    pub async fn lookup(&self, title: &str, user_id: i64) -> Result<NewMovie, LookupError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", title),
                ("type", "movie"),
                ("plot", "short"),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Contact(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Contact(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let payload = response
            .json::<OmdbPayload>()
            .await
            .map_err(|e| LookupError::Contact(e.to_string()))?;

        candidate_from_payload(payload, user_id)
    }
}

/// Map a decoded provider payload into a movie candidate.
///
/// An absent `Year` defaults to 0; a present but unparseable one is a
/// processing error.
pub fn candidate_from_payload(
    payload: OmdbPayload,
    user_id: i64,
) -> Result<NewMovie, LookupError> {
    if payload.response != "True" {
        return Err(LookupError::NotFound(
            payload.error.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let name = payload
        .title
        .ok_or_else(|| LookupError::Processing("payload has no Title".to_string()))?;

    let year = match payload.year.as_deref() {
        None => 0,
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|e| LookupError::Processing(format!("invalid year '{}': {}", raw, e)))?,
    };

    Ok(NewMovie {
        name,
        director: payload.director,
        year,
        poster_url: payload.poster,
        user_id,
    })
}

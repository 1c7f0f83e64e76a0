//! REST Countries client.
//!
//! Thin wrapper over `reqwest`. Speaks the v3.1 endpoints:
//! `GET /all`, `GET /name/{query}`, `GET /alpha/{code}`. Listings answer
//! with a JSON array of country objects. `/alpha` with a field projection
//! answers with a bare object, so both shapes are accepted. A 404 is the
//! API's "no match" signal and is surfaced as
//! `FetchError::Api { status: 404, .. }` for callers to interpret.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::Deserialize;

use super::source::{CountrySource, FetchError};
use super::types::CountryRecord;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Field projection sent with every request. `/all` rejects requests
/// without one, and the API caps it at ten fields.
pub const FIELDS: &str =
    "name,cca3,capital,region,subregion,currencies,languages,population,continents,flags";

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CountryRecord>),
    One(Box<CountryRecord>),
}

impl From<OneOrMany> for Vec<CountryRecord> {
    fn from(body: OneOrMany) -> Self {
        match body {
            OneOrMany::Many(records) => records,
            OneOrMany::One(record) => vec![*record],
        }
    }
}

pub struct RestCountriesClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestCountriesClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `segments` onto the base URL, percent-encoding each one, and
    /// appends the field projection plus any extra query pairs.
    fn endpoint(&self, segments: &[&str], extra: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fields", FIELDS);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_records(&self, url: Url) -> Result<Vec<CountryRecord>, FetchError> {
        info!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        debug!("Countries API response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            if status == 404 {
                debug!("Countries API reported no match");
            } else {
                warn!("Countries API error: {} - {}", status, err_body);
            }
            return Err(FetchError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let records: Vec<CountryRecord> = serde_json::from_str::<OneOrMany>(&body)
            .map_err(|e| FetchError::Parse(e.to_string()))?
            .into();
        info!("Received {} country records", records.len());
        Ok(records)
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    fn name(&self) -> &str {
        "restcountries"
    }

    async fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.endpoint(&["all"], &[])?;
        self.get_records(url).await
    }

    async fn fetch_by_name(&self, query: &str) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.endpoint(&["name", query], &[])?;
        self.get_records(url).await
    }

    async fn fetch_by_full_name(&self, name: &str) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.endpoint(&["name", name], &[("fullText", "true")])?;
        self.get_records(url).await
    }

    async fn fetch_by_code(&self, code: &str) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.endpoint(&["alpha", code], &[])?;
        self.get_records(url).await
    }
}

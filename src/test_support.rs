//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::favorites::{FAVORITES_KEY, Favorites, MemoryStorage};
use crate::core::state::App;
use crate::countries::{CountryName, CountryRecord, CountrySource, FetchError};

/// A source for tests that don't need real API calls. Answers every
/// request with "no match".
pub struct NoopSource;

#[async_trait]
impl CountrySource for NoopSource {
    fn name(&self) -> &str {
        "noop"
    }

    async fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchError> {
        Ok(Vec::new())
    }

    async fn fetch_by_name(&self, _query: &str) -> Result<Vec<CountryRecord>, FetchError> {
        Err(not_found())
    }

    async fn fetch_by_full_name(&self, _name: &str) -> Result<Vec<CountryRecord>, FetchError> {
        Err(not_found())
    }

    async fn fetch_by_code(&self, _code: &str) -> Result<Vec<CountryRecord>, FetchError> {
        Err(not_found())
    }
}

fn not_found() -> FetchError {
    FetchError::Api {
        status: 404,
        message: "Not Found".to_string(),
    }
}

/// A minimal record with the given code and common name.
pub fn record(code: &str, name: &str) -> CountryRecord {
    CountryRecord {
        name: CountryName {
            common: name.to_string(),
            official: format!("Official {name}"),
            ..Default::default()
        },
        cca3: code.to_string(),
        capital: vec![format!("{name} City")],
        region: "Testland".to_string(),
        population: 1_000,
        ..Default::default()
    }
}

/// `n` records coded `C00`, `C01`, ... in order.
pub fn countries(n: usize) -> Vec<CountryRecord> {
    (0..n)
        .map(|i| record(&format!("C{i:02}"), &format!("Country {i:02}")))
        .collect()
}

/// Creates a test App with a NoopSource and empty in-memory favorites.
pub fn test_app() -> App {
    App::new(
        Arc::new(NoopSource),
        Favorites::new(Box::new(MemoryStorage::new())),
    )
}

/// Creates a test App whose favorites store holds the raw JSON `favorites`.
pub fn test_app_with_favorites(favorites: &str) -> App {
    App::new(
        Arc::new(NoopSource),
        Favorites::new(Box::new(MemoryStorage::new().with_value(FAVORITES_KEY, favorites))),
    )
}

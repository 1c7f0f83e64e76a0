//! # Country Detail
//!
//! State for the `/country/:code` view: one record, fetched by code or by
//! exact name, read-only.

use log::{debug, info};

use crate::countries::{CountryRecord, FetchError};

/// How a country is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailKey {
    /// ISO 3166-1 alpha-2 or alpha-3 code (`/alpha/{code}`).
    Code(String),
    /// Exact common or official name (`/name/{name}?fullText=true`).
    Name(String),
}

impl DetailKey {
    /// Two or three ASCII letters are a code; anything else is a name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let is_code = (2..=3).contains(&raw.len()) && raw.chars().all(|c| c.is_ascii_alphabetic());
        if is_code {
            DetailKey::Code(raw.to_ascii_uppercase())
        } else {
            DetailKey::Name(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DetailKey::Code(s) | DetailKey::Name(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Loading(DetailKey),
    Loaded(Box<CountryRecord>),
    NotFound(DetailKey),
    Failed { key: DetailKey, message: String },
}

impl Detail {
    pub fn key(&self) -> Option<&DetailKey> {
        match self {
            Detail::Loading(key) | Detail::NotFound(key) | Detail::Failed { key, .. } => Some(key),
            Detail::Loaded(_) => None,
        }
    }

    pub fn record(&self) -> Option<&CountryRecord> {
        match self {
            Detail::Loaded(record) => Some(record),
            _ => None,
        }
    }

    /// Code of the country being shown, or requested by code.
    pub fn code(&self) -> Option<&str> {
        match self {
            Detail::Loaded(record) => Some(record.code()),
            _ => match self.key() {
                Some(DetailKey::Code(code)) => Some(code),
                _ => None,
            },
        }
    }
}

/// Tracks the detail request in flight so late answers for a country the
/// user already navigated away from are ignored. Request tags come from the
/// caller and must never repeat across views.
pub struct DetailView {
    state: Detail,
    request: u64,
}

impl DetailView {
    pub fn open(key: DetailKey, request: u64) -> Self {
        info!("Opening detail for {:?} (request {})", key, request);
        Self {
            state: Detail::Loading(key),
            request,
        }
    }

    pub fn state(&self) -> &Detail {
        &self.state
    }

    pub fn request(&self) -> u64 {
        self.request
    }

    /// Re-issues the lookup for the current key under a new request tag.
    /// Returns the key to fetch.
    pub fn reload(&mut self, request: u64) -> Option<DetailKey> {
        let key = match &self.state {
            Detail::Loaded(record) => DetailKey::Code(record.code().to_string()),
            other => other.key()?.clone(),
        };
        self.request = request;
        self.state = Detail::Loading(key.clone());
        Some(key)
    }

    /// Applies a fetch result. Returns `false` for a superseded request.
    pub fn resolve(&mut self, request: u64, result: Result<Vec<CountryRecord>, FetchError>) -> bool {
        if request != self.request {
            debug!("Discarding stale detail result (request {}, current {})", request, self.request);
            return false;
        }
        let Detail::Loading(key) = &self.state else {
            return false;
        };
        let key = key.clone();

        self.state = match result {
            Ok(records) => match records.into_iter().next() {
                Some(record) => Detail::Loaded(Box::new(record)),
                None => Detail::NotFound(key),
            },
            Err(e) if e.is_not_found() => Detail::NotFound(key),
            Err(e) => Detail::Failed {
                key,
                message: e.to_string(),
            },
        };
        true
    }
}

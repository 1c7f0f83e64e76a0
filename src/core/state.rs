//! # Application State
//!
//! Core business state for Atlas. Domain logic only, no TUI-specific types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── source: Arc<dyn CountrySource>  // remote country data
//! ├── favorites: Favorites            // persisted favorite codes
//! ├── listing: Listing                // search, fetch lifecycle, window
//! ├── route: Route                    // `/` or `/country/:code`
//! ├── detail: Option<DetailView>      // present while on a detail route
//! ├── debounce: Duration              // quiet period before a search fetch
//! └── status_message: String          // header text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::core::debounce::DEFAULT_DEBOUNCE;
use crate::core::detail::DetailView;
use crate::core::favorites::Favorites;
use crate::core::listing::{DEFAULT_PAGE_SIZE, Listing};
use crate::countries::CountrySource;

/// The two screens, addressed like URL paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Listing,
    /// `/country/:code`
    Country(String),
}

impl Route {
    /// Parses `/` or `/country/<code>`. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Route::Listing);
        }
        let code = trimmed.strip_prefix("/country/")?;
        if code.is_empty() || code.contains('/') {
            return None;
        }
        Some(Route::Country(code.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Listing => "/".to_string(),
            Route::Country(code) => format!("/country/{code}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub struct App {
    pub source: Arc<dyn CountrySource>,
    pub favorites: Favorites,
    pub listing: Listing,
    pub route: Route,
    pub detail: Option<DetailView>,
    /// Last detail request tag handed out. Monotonic across views.
    detail_requests: u64,
    pub debounce: Duration,
    pub status_message: String,
}

impl App {
    pub fn new(source: Arc<dyn CountrySource>, favorites: Favorites) -> Self {
        Self {
            source,
            favorites,
            listing: Listing::new(DEFAULT_PAGE_SIZE),
            route: Route::Listing,
            detail: None,
            detail_requests: 0,
            debounce: DEFAULT_DEBOUNCE,
            status_message: String::from("Welcome to Atlas!"),
        }
    }

    pub fn from_config(
        source: Arc<dyn CountrySource>,
        favorites: Favorites,
        config: &ResolvedConfig,
    ) -> Self {
        let mut app = Self::new(source, favorites);
        app.listing = Listing::new(config.page_size);
        app.debounce = config.debounce;
        app
    }

    /// A request tag no earlier detail lookup has used.
    pub fn next_detail_request(&mut self) -> u64 {
        self.detail_requests += 1;
        self.detail_requests
    }
}

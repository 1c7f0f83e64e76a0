//! # Actions
//!
//! Everything that can happen in Atlas becomes an `Action`.
//! User types in the search box? That's `Action::SearchChanged(text)`.
//! The API answers? That's `Action::CountriesLoaded { .. }`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` describing any I/O the adapter should start. No side effects
//! happen here apart from the synchronous favorites write.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: dispatch actions, assert on state and on
//! the returned effect (e.g. "toggling the filter returns `Effect::None`",
//! which is how we know it never refetches).

use log::{debug, warn};

use crate::core::detail::{DetailKey, DetailView};
use crate::core::listing::{FetchRequest, Phase};
use crate::core::pagination::SentinelId;
use crate::core::state::{App, Route};
use crate::countries::{CountryRecord, FetchError};

#[derive(Debug)]
pub enum Action {
    /// Fetch for the current search immediately (startup).
    Refresh,
    /// The search box text changed.
    SearchChanged(String),
    /// A debounce timer armed for `generation` elapsed.
    SearchSettled { generation: u64 },
    CountriesLoaded {
        generation: u64,
        result: Result<Vec<CountryRecord>, FetchError>,
    },
    SetFavoritesOnly(bool),
    ToggleFavoritesOnly,
    /// The view rendered the element identified by `SentinelId` on screen.
    SentinelVisible(SentinelId),
    ToggleFavorite(String),
    Navigate(Route),
    CountryLoaded {
        request: u64,
        result: Result<Vec<CountryRecord>, FetchError>,
    },
    /// User-initiated retry after a failure.
    Retry,
    Quit,
}

/// Side effects for the adapter to carry out after `update()`.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// (Re)arm the debounce timer; when it fires, dispatch
    /// `Action::SearchSettled { generation }`.
    ScheduleSearch { generation: u64 },
    /// Run a listing fetch; answer with `Action::CountriesLoaded`.
    FetchCountries(FetchRequest),
    /// Run a detail lookup; answer with `Action::CountryLoaded`.
    FetchCountry { key: DetailKey, request: u64 },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Refresh => {
            app.status_message = "Loading countries...".to_string();
            Effect::FetchCountries(app.listing.refresh())
        }
        Action::SearchChanged(text) => match app.listing.set_search(&text) {
            Some(generation) => Effect::ScheduleSearch { generation },
            None => Effect::None,
        },
        Action::SearchSettled { generation } => match app.listing.settle(generation) {
            Some(request) => {
                app.status_message = "Searching...".to_string();
                Effect::FetchCountries(request)
            }
            None => Effect::None,
        },
        Action::CountriesLoaded { generation, result } => {
            let favorites = app.favorites.snapshot();
            if app.listing.resolve(generation, result, &favorites) {
                app.status_message = listing_status(app);
            }
            Effect::None
        }
        Action::SetFavoritesOnly(on) => {
            set_favorites_only(app, on);
            Effect::None
        }
        Action::ToggleFavoritesOnly => {
            let on = !app.listing.favorites_only();
            set_favorites_only(app, on);
            Effect::None
        }
        Action::SentinelVisible(id) => {
            app.listing.sentinel_visible(id);
            Effect::None
        }
        Action::ToggleFavorite(code) => {
            match app.favorites.toggle(&code) {
                Ok(favorited) => {
                    app.listing.apply_favorite(&code, favorited);
                    app.status_message = if favorited {
                        format!("Added {code} to favorites")
                    } else {
                        format!("Removed {code} from favorites")
                    };
                }
                Err(e) => {
                    warn!("Failed to save favorites: {}", e);
                    app.status_message = format!("Could not save favorites: {e}");
                }
            }
            Effect::None
        }
        Action::Navigate(route) => {
            debug!("Navigate to {}", route);
            app.route = route.clone();
            match route {
                Route::Listing => {
                    app.detail = None;
                    app.status_message = listing_status(app);
                    Effect::None
                }
                Route::Country(code) => {
                    let key = DetailKey::parse(&code);
                    let request = app.next_detail_request();
                    app.detail = Some(DetailView::open(key.clone(), request));
                    app.status_message = format!("Loading {}...", key.as_str());
                    Effect::FetchCountry { key, request }
                }
            }
        }
        Action::CountryLoaded { request, result } => {
            if let Some(view) = app.detail.as_mut()
                && view.resolve(request, result)
            {
                app.status_message = match view.state().record() {
                    Some(record) => record.name.common.clone(),
                    None => String::new(),
                };
            }
            Effect::None
        }
        Action::Retry => match app.route {
            Route::Listing if matches!(app.listing.phase(), Phase::Failed(_)) => {
                app.status_message = "Retrying...".to_string();
                Effect::FetchCountries(app.listing.refresh())
            }
            Route::Country(_) => {
                let request = app.next_detail_request();
                match app.detail.as_mut().and_then(|view| view.reload(request)) {
                    Some(key) => Effect::FetchCountry { key, request },
                    None => Effect::None,
                }
            }
            _ => Effect::None,
        },
        Action::Quit => Effect::Quit,
    }
}

fn set_favorites_only(app: &mut App, on: bool) {
    app.listing.set_favorites_only(on);
    app.status_message = if on {
        "Showing favorites".to_string()
    } else {
        listing_status(app)
    };
}

/// Header text summarizing the listing.
fn listing_status(app: &App) -> String {
    match app.listing.phase() {
        Phase::Idle => String::new(),
        Phase::Loading => "Loading countries...".to_string(),
        Phase::Loaded => format!("{} countries", app.listing.entries().len()),
        Phase::Empty => "No countries found".to_string(),
        Phase::Failed(_) => "Request failed".to_string(),
    }
}

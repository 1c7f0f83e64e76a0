//! # Listing Engine
//!
//! Owns the searchable, paginated country list.
//!
//! ```text
//! set_search ─► (debounce elsewhere) ─► settle(gen) ─► FetchRequest
//!                                                          │
//!            resolve(gen, result, favorites snapshot) ◄────┘
//!                    │
//!                    ▼
//!   entries (full list) ─► displayed (favorites filter) ─► window (first `cursor`)
//! ```
//!
//! Every search change bumps `generation`. Timers and fetches carry the
//! generation they were issued for; anything that comes back tagged with an
//! older generation is dropped on the floor.
//!
//! No I/O happens here. The engine hands out [`FetchRequest`]s and accepts
//! their results; the adapter decides how to run them.

use std::collections::HashSet;

use log::{debug, info};

use crate::core::pagination::{Sentinel, SentinelId};
use crate::countries::{CountryRecord, FetchError};

/// Entries revealed on a fresh list, and per sentinel hit.
pub const DEFAULT_PAGE_SIZE: usize = 16;

/// A country record annotated for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryEntry {
    pub record: CountryRecord,
    pub favorited: bool,
}

impl CountryEntry {
    pub fn code(&self) -> &str {
        self.record.code()
    }
}

/// Where the listing is in its fetch lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    Loading,
    /// Last fetch returned at least one country.
    Loaded,
    /// Last fetch returned nothing (or the API said "no match").
    Empty,
    /// Last fetch failed. Stays here until the next fetch starts.
    Failed(String),
}

/// A fetch the adapter should run, tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    /// `None` fetches every country; `Some(q)` searches by name.
    pub query: Option<String>,
}

pub struct Listing {
    search: String,
    generation: u64,
    phase: Phase,
    entries: Vec<CountryEntry>,
    favorites_only: bool,
    page_size: usize,
    limit: usize,
    /// Bumped whenever the displayed list changes identity.
    revision: u64,
    sentinel: Sentinel,
}

impl Default for Listing {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Listing {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            search: String::new(),
            generation: 0,
            phase: Phase::Idle,
            entries: Vec::new(),
            favorites_only: false,
            page_size,
            limit: page_size,
            revision: 0,
            sentinel: Sentinel::new(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The full fetched list, ignoring the favorites filter and the window.
    pub fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }

    // ------------------------------------------------------------------
    // Search & fetch lifecycle
    // ------------------------------------------------------------------

    /// Records a new search string. Returns the generation a debounce timer
    /// should be armed for, or `None` if the text did not change.
    pub fn set_search(&mut self, text: &str) -> Option<u64> {
        if text == self.search {
            return None;
        }
        self.search = text.to_string();
        self.generation += 1;
        debug!("Search changed to {:?} (generation {})", self.search, self.generation);
        Some(self.generation)
    }

    /// Called when a debounce timer fires. Only the timer for the current
    /// generation starts a fetch.
    pub fn settle(&mut self, generation: u64) -> Option<FetchRequest> {
        if generation != self.generation {
            debug!(
                "Ignoring superseded debounce (generation {}, current {})",
                generation, self.generation
            );
            return None;
        }
        Some(self.start())
    }

    /// Starts a fetch for the current search right away (initial load, retry).
    /// Supersedes anything already pending.
    pub fn refresh(&mut self) -> FetchRequest {
        self.generation += 1;
        self.start()
    }

    fn start(&mut self) -> FetchRequest {
        self.phase = Phase::Loading;
        let trimmed = self.search.trim();
        let query = (!trimmed.is_empty()).then(|| trimmed.to_string());
        info!(
            "Fetching countries (generation {}, query {:?})",
            self.generation, query
        );
        FetchRequest {
            generation: self.generation,
            query,
        }
    }

    /// Applies a fetch result. Returns `false` (and changes nothing) when the
    /// result belongs to a superseded generation.
    pub fn resolve(
        &mut self,
        generation: u64,
        result: Result<Vec<CountryRecord>, FetchError>,
        favorites: &HashSet<String>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding stale fetch result (generation {}, current {})",
                generation, self.generation
            );
            return false;
        }

        match result {
            Ok(records) => {
                self.entries = records
                    .into_iter()
                    .map(|record| {
                        let favorited = favorites.contains(record.code());
                        CountryEntry { record, favorited }
                    })
                    .collect();
                self.phase = if self.entries.is_empty() {
                    Phase::Empty
                } else {
                    Phase::Loaded
                };
                info!("Listing loaded {} countries", self.entries.len());
            }
            Err(e) if e.is_not_found() => {
                self.entries.clear();
                self.phase = Phase::Empty;
                info!("No countries match {:?}", self.search);
            }
            Err(e) => {
                self.entries.clear();
                self.phase = Phase::Failed(e.to_string());
                info!("Listing fetch failed: {}", e);
            }
        }
        self.replace_list();
        true
    }

    // ------------------------------------------------------------------
    // Filtering & windowing
    // ------------------------------------------------------------------

    /// Turns the favorites-only filter on or off. Never refetches.
    pub fn set_favorites_only(&mut self, on: bool) {
        if self.favorites_only == on {
            return;
        }
        self.favorites_only = on;
        self.revision += 1;
        self.sync_sentinel();
    }

    /// Entries that pass the favorites filter, in fetch order.
    pub fn displayed(&self) -> impl Iterator<Item = &CountryEntry> {
        let favorites_only = self.favorites_only;
        self.entries
            .iter()
            .filter(move |entry| !favorites_only || entry.favorited)
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed().count()
    }

    /// Number of displayed entries currently revealed.
    pub fn cursor(&self) -> usize {
        self.limit.min(self.displayed_len())
    }

    /// The revealed prefix of the displayed list.
    pub fn window(&self) -> Vec<&CountryEntry> {
        self.displayed().take(self.cursor()).collect()
    }

    pub fn has_more(&self) -> bool {
        self.cursor() < self.displayed_len()
    }

    /// Identity of the last revealed entry, which the view should report
    /// through [`Listing::sentinel_visible`] once it is on screen.
    pub fn sentinel_id(&self) -> Option<SentinelId> {
        self.cursor().checked_sub(1).map(|index| SentinelId {
            revision: self.revision,
            index,
        })
    }

    /// The view saw `id` on screen. Reveals the next page if the sentinel is
    /// bound to `id`, has not fired yet, and more entries remain.
    pub fn sentinel_visible(&mut self, id: SentinelId) -> bool {
        if !self.sentinel.observe(id) || !self.has_more() {
            return false;
        }
        self.limit = self.cursor() + self.page_size;
        debug!("Window advanced to {}", self.cursor());
        self.sync_sentinel();
        true
    }

    fn replace_list(&mut self) {
        self.limit = self.page_size;
        self.revision += 1;
        self.sync_sentinel();
    }

    fn sync_sentinel(&mut self) {
        match self.sentinel_id() {
            Some(id) => self.sentinel.attach(id),
            None => self.sentinel.detach(),
        }
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    /// Patches the `favorited` flag of the entry with `code` after the store
    /// has been written. Returns `false` if the code is not in the list.
    pub fn apply_favorite(&mut self, code: &str, favorited: bool) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.code() == code) else {
            return false;
        };
        entry.favorited = favorited;
        if self.favorites_only {
            // The entry joined or left the filtered list
            self.revision += 1;
            self.sync_sentinel();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{countries, record};

    fn loaded(n: usize, favorites: &[&str]) -> Listing {
        let mut listing = Listing::default();
        let request = listing.refresh();
        let favorites: HashSet<String> = favorites.iter().map(|s| s.to_string()).collect();
        assert!(listing.resolve(request.generation, Ok(countries(n)), &favorites));
        listing
    }

    fn hit_sentinel(listing: &mut Listing) -> bool {
        let id = listing.sentinel_id().expect("window is not empty");
        listing.sentinel_visible(id)
    }

    #[test]
    fn test_starts_idle() {
        let listing = Listing::default();
        assert_eq!(listing.phase(), &Phase::Idle);
        assert_eq!(listing.cursor(), 0);
        assert!(listing.sentinel_id().is_none());
    }

    #[test]
    fn test_empty_search_fetches_all() {
        let mut listing = Listing::default();
        let request = listing.refresh();
        assert_eq!(request.query, None);
        assert_eq!(listing.phase(), &Phase::Loading);
    }

    #[test]
    fn test_whitespace_search_fetches_all() {
        let mut listing = Listing::default();
        let generation = listing.set_search("   ").unwrap();
        assert_eq!(listing.settle(generation).unwrap().query, None);
    }

    #[test]
    fn test_search_is_trimmed() {
        let mut listing = Listing::default();
        let generation = listing.set_search(" bra ").unwrap();
        assert_eq!(listing.settle(generation).unwrap().query.as_deref(), Some("bra"));
    }

    #[test]
    fn test_unchanged_search_does_not_arm_timer() {
        let mut listing = Listing::default();
        assert!(listing.set_search("b").is_some());
        assert!(listing.set_search("b").is_none());
    }

    #[test]
    fn test_only_latest_timer_settles() {
        let mut listing = Listing::default();
        let g1 = listing.set_search("b").unwrap();
        let g2 = listing.set_search("br").unwrap();
        let g3 = listing.set_search("bra").unwrap();
        assert!(listing.settle(g1).is_none());
        assert!(listing.settle(g2).is_none());
        let request = listing.settle(g3).unwrap();
        assert_eq!(request.generation, g3);
        assert_eq!(request.query.as_deref(), Some("bra"));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut listing = loaded(3, &[]);
        let old = listing.refresh();
        let generation = listing.set_search("x").unwrap();
        let _ = listing.settle(generation);

        assert!(!listing.resolve(old.generation, Ok(countries(40)), &HashSet::new()));
        assert_eq!(listing.phase(), &Phase::Loading);
        assert_eq!(listing.entries().len(), 3);
    }

    #[test]
    fn test_not_found_is_empty_not_failed() {
        let mut listing = Listing::default();
        let generation = listing.set_search("xyz").unwrap();
        let request = listing.settle(generation).unwrap();
        let err = FetchError::Api {
            status: 404,
            message: "Not Found".into(),
        };
        listing.resolve(request.generation, Err(err), &HashSet::new());
        assert_eq!(listing.phase(), &Phase::Empty);
        assert_eq!(listing.displayed_len(), 0);
    }

    #[test]
    fn test_other_errors_fail() {
        let mut listing = Listing::default();
        let request = listing.refresh();
        listing.resolve(
            request.generation,
            Err(FetchError::Network("connection refused".into())),
            &HashSet::new(),
        );
        assert!(matches!(listing.phase(), Phase::Failed(msg) if msg.contains("connection refused")));

        // Retry re-enters Loading
        listing.refresh();
        assert_eq!(listing.phase(), &Phase::Loading);
    }

    #[test]
    fn test_empty_success_is_empty() {
        let listing = loaded(0, &[]);
        assert_eq!(listing.phase(), &Phase::Empty);
    }

    #[test]
    fn test_failed_listing_has_no_sentinel() {
        let mut listing = Listing::default();
        let request = listing.refresh();
        listing.resolve(
            request.generation,
            Err(FetchError::Network("connection refused".into())),
            &HashSet::new(),
        );
        assert_eq!(listing.cursor(), 0);
        assert!(listing.sentinel_id().is_none());
        assert!(listing.sentinel().bound_to().is_none());
        assert!(listing.window().is_empty());
    }

    #[test]
    fn test_annotates_favorites() {
        let listing = loaded(3, &["C01"]);
        let flags: Vec<bool> = listing.entries().iter().map(|e| e.favorited).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_initial_window_is_min_of_len_and_page() {
        for n in [0, 1, 15, 16, 17, 250] {
            let listing = loaded(n, &[]);
            assert_eq!(listing.cursor(), n.min(16), "n = {n}");
            assert_eq!(listing.window().len(), n.min(16));
        }
    }

    #[test]
    fn test_window_grows_by_page_per_sentinel_hit() {
        let n = 70;
        let mut listing = loaded(n, &[]);
        for k in 1..=6 {
            let grew = hit_sentinel(&mut listing);
            assert_eq!(grew, 16 + 16 * (k - 1) < n, "k = {k}");
            assert_eq!(listing.cursor(), n.min(16 + 16 * k), "k = {k}");
        }
    }

    #[test]
    fn test_twenty_countries_scenario() {
        let mut listing = loaded(20, &[]);
        assert_eq!(listing.cursor(), 16);
        assert_eq!(listing.sentinel_id().unwrap().index, 15);

        assert!(hit_sentinel(&mut listing));
        assert_eq!(listing.cursor(), 20);
        assert!(!listing.has_more());

        // New sentinel on the last item, but nothing left to reveal
        assert!(!hit_sentinel(&mut listing));
        assert_eq!(listing.cursor(), 20);
    }

    #[test]
    fn test_repeated_report_of_same_sentinel_fires_once() {
        let mut listing = loaded(100, &[]);
        let id = listing.sentinel_id().unwrap();
        assert!(listing.sentinel_visible(id));
        assert!(!listing.sentinel_visible(id));
        assert_eq!(listing.cursor(), 32);
    }

    #[test]
    fn test_new_fetch_resets_window() {
        let mut listing = loaded(100, &[]);
        hit_sentinel(&mut listing);
        hit_sentinel(&mut listing);
        assert_eq!(listing.cursor(), 48);

        let request = listing.refresh();
        listing.resolve(request.generation, Ok(countries(100)), &HashSet::new());
        assert_eq!(listing.cursor(), 16);
    }

    #[test]
    fn test_stale_sentinel_from_previous_list_is_ignored() {
        let mut listing = loaded(100, &[]);
        let old_id = listing.sentinel_id().unwrap();
        let request = listing.refresh();
        listing.resolve(request.generation, Ok(countries(100)), &HashSet::new());
        assert!(!listing.sentinel_visible(old_id));
        assert_eq!(listing.cursor(), 16);
    }

    #[test]
    fn test_favorites_filter_reduces_and_restores() {
        let mut listing = loaded(40, &["C03", "C20", "C35"]);
        listing.set_favorites_only(true);
        let codes: Vec<&str> = listing.displayed().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["C03", "C20", "C35"]);
        assert!(listing.displayed().all(|e| e.favorited));
        assert_eq!(listing.cursor(), 3);

        listing.set_favorites_only(false);
        assert_eq!(listing.displayed_len(), 40);
        assert_eq!(listing.cursor(), 16);
    }

    #[test]
    fn test_cursor_measured_against_filtered_list() {
        let favorites: Vec<String> = (0..30).map(|i| format!("C{i:02}")).collect();
        let refs: Vec<&str> = favorites.iter().map(|s| s.as_str()).collect();
        let mut listing = loaded(60, &refs);
        listing.set_favorites_only(true);
        assert_eq!(listing.cursor(), 16);
        assert!(hit_sentinel(&mut listing));
        assert_eq!(listing.cursor(), 30);
        assert!(!listing.has_more());
    }

    #[test]
    fn test_filter_toggle_rebinds_sentinel() {
        let mut listing = loaded(40, &["C03"]);
        let before = listing.sentinel().attach_count();
        listing.set_favorites_only(true);
        assert_eq!(listing.sentinel().attach_count(), before + 1);
        assert_eq!(listing.sentinel().bound_to(), listing.sentinel_id());
    }

    #[test]
    fn test_apply_favorite_patches_entry_and_window() {
        let mut listing = loaded(20, &["C01"]);
        assert!(listing.apply_favorite("C01", false));
        assert!(!listing.entries()[1].favorited);
        assert!(!listing.window()[1].favorited);

        assert!(listing.apply_favorite("C05", true));
        assert!(listing.window()[5].favorited);

        assert!(!listing.apply_favorite("ZZZ", true));
    }

    #[test]
    fn test_unfavorite_while_filtering_hides_entry() {
        let mut listing = loaded(10, &["C01", "C02"]);
        listing.set_favorites_only(true);
        listing.apply_favorite("C01", false);
        let codes: Vec<&str> = listing.displayed().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["C02"]);
        assert_eq!(listing.sentinel().bound_to(), listing.sentinel_id());
    }

    #[test]
    fn test_record_helper_code() {
        assert_eq!(record("BRA", "Brazil").code(), "BRA");
    }
}

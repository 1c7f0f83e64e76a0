//! # Effect Runner
//!
//! Carries out the `Effect`s returned by `core::action::update`: arms the
//! debounce timer and spawns fetch tasks on the tokio runtime. Every task
//! reports back by sending an `Action` over the channel the UI loop drains.
//!
//! In-flight fetches are never aborted. Their completions carry the
//! generation (or request tag) they were issued for, and the reducer drops
//! the stale ones.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::debounce::Debouncer;
use crate::core::detail::DetailKey;
use crate::core::listing::FetchRequest;
use crate::core::state::App;
use crate::countries::CountrySource;

pub struct EffectRunner {
    debouncer: Debouncer,
    tx: mpsc::Sender<Action>,
}

impl EffectRunner {
    pub fn new(debounce: Duration, tx: mpsc::Sender<Action>) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            tx,
        }
    }

    /// Runs `effect`. Returns `true` when the app should quit.
    pub fn run(&mut self, app: &App, effect: Effect) -> bool {
        match effect {
            Effect::None => {}
            Effect::ScheduleSearch { generation } => {
                let tx = self.tx.clone();
                self.debouncer.schedule_default(generation, move |generation| {
                    if tx.send(Action::SearchSettled { generation }).is_err() {
                        warn!("Failed to deliver debounced search: receiver dropped");
                    }
                });
            }
            Effect::FetchCountries(request) => {
                spawn_listing_fetch(app.source.clone(), request, self.tx.clone());
            }
            Effect::FetchCountry { key, request } => {
                spawn_detail_fetch(app.source.clone(), key, request, self.tx.clone());
            }
            Effect::Quit => {
                self.debouncer.cancel_pending();
                return true;
            }
        }
        false
    }
}

/// Applies `action` and runs the resulting effect. Returns `true` on quit.
pub fn dispatch(app: &mut App, runner: &mut EffectRunner, action: Action) -> bool {
    let effect = update(app, action);
    runner.run(app, effect)
}

fn spawn_listing_fetch(
    source: Arc<dyn CountrySource>,
    request: FetchRequest,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning listing fetch via {} (generation {}, query {:?})",
        source.name(),
        request.generation,
        request.query
    );
    tokio::spawn(async move {
        let result = match request.query.as_deref() {
            Some(query) => source.fetch_by_name(query).await,
            None => source.fetch_all().await,
        };
        if tx
            .send(Action::CountriesLoaded {
                generation: request.generation,
                result,
            })
            .is_err()
        {
            warn!(
                "Failed to deliver countries for generation {}: receiver dropped",
                request.generation
            );
        }
    });
}

fn spawn_detail_fetch(
    source: Arc<dyn CountrySource>,
    key: DetailKey,
    request: u64,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning detail fetch for {:?} (request {})", key, request);
    tokio::spawn(async move {
        let result = match &key {
            DetailKey::Code(code) => source.fetch_by_code(code).await,
            DetailKey::Name(name) => source.fetch_by_full_name(name).await,
        };
        if tx.send(Action::CountryLoaded { request, result }).is_err() {
            warn!("Failed to deliver detail for {:?}: receiver dropped", key);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::listing::Phase;
    use crate::core::state::Route;
    use crate::test_support::test_app;

    #[tokio::test]
    async fn test_refresh_round_trip_through_channel() {
        let mut app = test_app();
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(Duration::from_millis(10), tx);

        assert!(!dispatch(&mut app, &mut runner, Action::Refresh));
        let action = tokio::task::spawn_blocking(move || rx.recv().unwrap())
            .await
            .unwrap();
        assert!(matches!(action, Action::CountriesLoaded { generation: 1, .. }));

        update(&mut app, action);
        // NoopSource answers /all with an empty list
        assert_eq!(app.listing.phase(), &Phase::Empty);
    }

    #[tokio::test]
    async fn test_detail_not_found_round_trip() {
        let mut app = test_app();
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(Duration::from_millis(10), tx);

        dispatch(&mut app, &mut runner, Action::Navigate(Route::Country("ZZZ".into())));
        let action = tokio::task::spawn_blocking(move || rx.recv().unwrap())
            .await
            .unwrap();
        update(&mut app, action);
        assert!(matches!(
            app.detail.as_ref().unwrap().state(),
            crate::core::detail::Detail::NotFound(_)
        ));
    }

    #[test]
    fn test_quit_effect() {
        let app = test_app();
        let (tx, _rx) = mpsc::channel();
        let mut runner = EffectRunner::new(Duration::from_millis(10), tx);
        assert!(runner.run(&app, Effect::Quit));
    }
}

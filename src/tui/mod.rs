//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into `core::action::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Loading** (listing or detail): draws every ~80ms so the spinner turns.
//! - **Idle**: sleeps up to 500ms, only redraws on input, background
//!   results, or terminal resize.
//!
//! After each draw the grid may report that the pagination sentinel was on
//! screen. That report is dispatched right away, and if it revealed more
//! cards the next iteration draws them.

mod component;
mod components;
pub mod effects;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::Action;
use crate::core::config::ResolvedConfig;
use crate::core::detail::Detail;
use crate::core::favorites::{Favorites, FileStorage, MemoryStorage, Storage};
use crate::core::listing::Phase;
use crate::core::state::{App, Route};
use crate::countries::{CountrySource, RestCountriesClient};
use crate::tui::component::EventHandler;
use crate::tui::components::{GridEvent, GridState, SearchBox, SearchEvent};
use crate::tui::effects::{EffectRunner, dispatch};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which part of the listing screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing edits the search text.
    Search,
    /// Arrows move between cards.
    Grid,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub search: SearchBox,
    pub grid: GridState,
    pub focus: Focus,
    /// First visible row of the detail page.
    pub detail_scroll: u16,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            search: SearchBox::new(),
            grid: GridState::new(),
            focus: Focus::Search, // User expects to type immediately
            detail_scroll: 0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn build_source(config: &ResolvedConfig) -> Arc<dyn CountrySource> {
    Arc::new(RestCountriesClient::new(Some(config.base_url.clone())))
}

/// File-backed favorites when there is a data directory, otherwise an
/// in-memory store that lasts for this run only.
pub fn build_storage(config: &ResolvedConfig) -> Box<dyn Storage> {
    match &config.data_dir {
        Some(dir) => {
            info!("Favorites stored under {}", dir.display());
            Box::new(FileStorage::new(dir.clone()))
        }
        None => {
            info!("No data directory; favorites will not persist");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Whether something on screen is waiting on the network.
fn is_loading(app: &App) -> bool {
    match &app.route {
        Route::Listing => matches!(app.listing.phase(), Phase::Idle | Phase::Loading),
        Route::Country(_) => app
            .detail
            .as_ref()
            .is_none_or(|view| matches!(view.state(), Detail::Loading(_))),
    }
}

/// Rows moved by PageUp/PageDown on the detail page.
const DETAIL_PAGE: u16 = 10;

fn code_at(app: &App, index: usize) -> Option<String> {
    app.listing
        .window()
        .get(index)
        .map(|entry| entry.code().to_string())
}

/// Interprets one input event against the current route and focus.
pub fn handle_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Retry => return Some(Action::Retry),
        TuiEvent::Resize => return None,
        _ => {}
    }

    match &app.route {
        Route::Country(_) => match event {
            TuiEvent::Escape | TuiEvent::Backspace => {
                tui.detail_scroll = 0;
                Some(Action::Navigate(Route::Listing))
            }
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                tui.detail_scroll = tui.detail_scroll.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                tui.detail_scroll = tui.detail_scroll.saturating_add(1);
                None
            }
            TuiEvent::PageUp => {
                tui.detail_scroll = tui.detail_scroll.saturating_sub(DETAIL_PAGE);
                None
            }
            TuiEvent::PageDown => {
                tui.detail_scroll = tui.detail_scroll.saturating_add(DETAIL_PAGE);
                None
            }
            TuiEvent::Home => {
                tui.detail_scroll = 0;
                None
            }
            TuiEvent::InputChar('f') => app
                .detail
                .as_ref()
                .and_then(|view| view.state().record())
                .map(|record| Action::ToggleFavorite(record.code().to_string())),
            TuiEvent::InputChar('r') => Some(Action::Retry),
            TuiEvent::InputChar('q') => Some(Action::Quit),
            _ => None,
        },
        Route::Listing => {
            if matches!(event, TuiEvent::ToggleFavoritesOnly) {
                return Some(Action::ToggleFavoritesOnly);
            }
            // The wheel always scrolls the cards
            if matches!(event, TuiEvent::ScrollUp | TuiEvent::ScrollDown) {
                tui.grid.handle_event(event);
                return None;
            }
            match tui.focus {
                Focus::Search => match tui.search.handle_event(event)? {
                    SearchEvent::Changed(text) => Some(Action::SearchChanged(text)),
                    SearchEvent::Moved => None,
                    SearchEvent::Leave => {
                        tui.focus = Focus::Grid;
                        None
                    }
                },
                Focus::Grid => match event {
                    TuiEvent::InputChar('q') => Some(Action::Quit),
                    TuiEvent::InputChar('r') => Some(Action::Retry),
                    TuiEvent::Escape => {
                        tui.focus = Focus::Search;
                        None
                    }
                    // Typing jumps back into the search box
                    TuiEvent::InputChar(c) if *c != ' ' && *c != 'f' && *c != '/' => {
                        tui.focus = Focus::Search;
                        handle_event(app, tui, event)
                    }
                    TuiEvent::Paste(_) | TuiEvent::Backspace => {
                        tui.focus = Focus::Search;
                        handle_event(app, tui, event)
                    }
                    _ => match tui.grid.handle_event(event)? {
                        GridEvent::Open(index) => {
                            tui.detail_scroll = 0;
                            code_at(app, index).map(|code| Action::Navigate(Route::Country(code)))
                        }
                        GridEvent::ToggleFavorite(index) => {
                            code_at(app, index).map(Action::ToggleFavorite)
                        }
                        GridEvent::Leave => {
                            tui.focus = Focus::Search;
                            None
                        }
                    },
                },
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let source = build_source(&config);
    let favorites = Favorites::new(build_storage(&config));
    let mut app = App::from_config(source, favorites, &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner::new(app.debounce, tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // The listing loads even when starting on a detail route, so going back is instant
    let mut should_quit = dispatch(&mut app, &mut runner, Action::Refresh);
    if let Route::Country(_) = config.start_route {
        should_quit |= dispatch(&mut app, &mut runner, Action::Navigate(config.start_route.clone()));
    }

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        let animating = is_loading(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.grid.sync(app.listing.generation(), app.listing.cursor());
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;

            if let Some(id) = tui.grid.take_visible_sentinel() {
                let before = app.listing.cursor();
                dispatch(&mut app, &mut runner, Action::SentinelVisible(id));
                // Revealed cards need drawing, and may expose the next sentinel
                needs_redraw = app.listing.cursor() != before;
            }
        }

        // Short poll while a spinner is turning or more cards are pending
        let timeout = if animating || needs_redraw {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = handle_event(&app, &mut tui, &event) {
                should_quit |= dispatch(&mut app, &mut runner, action);
            }
            if should_quit {
                break;
            }
        }

        // Handle background task actions (debounce timers, fetch results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit |= dispatch(&mut app, &mut runner, action);
        }
    }

    info!("Atlas shutting down");
    ratatui::restore();
    Ok(())
}

//! # Core Application Logic
//!
//! This module contains Atlas's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No network I/O.        │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │   Tests    │
//!             │  Adapter   │          │ (reducer   │
//!             │ (ratatui)  │          │  driven)   │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and `Route`
//! - [`action`]: The `Action` enum and `update()`
//! - [`listing`]: Search, fetch lifecycle, favorites filter, windowing
//! - [`pagination`]: The single-owner sentinel that grows the window
//! - [`debounce`]: Cancellable timer for search input
//! - [`favorites`]: Persisted favorite codes over an injected `Storage`
//! - [`detail`]: The single-country view
//! - [`config`]: `~/.atlas/config.toml` and override resolution

pub mod action;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod favorites;
pub mod listing;
pub mod pagination;
pub mod state;

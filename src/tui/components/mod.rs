//! # TUI Components
//!
//! ## Stateless (props only)
//!
//! - `TitleBar`: app title, route path, status message
//! - `Placeholder`: loading spinner, empty result, error box
//! - `CountryDetail`: the `/country/:code` page
//!
//! ## Stateful
//!
//! Persistent state lives in `TuiState`; the component itself is a
//! transient wrapper rebuilt every frame around a borrow of that state.
//!
//! - `SearchBar` over `SearchBox`: search text and cursor
//! - `CountryGrid` over `GridState`: selection, scroll, sentinel visibility
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── search_bar.rs
//! ├── country_grid.rs
//! ├── country_detail.rs
//! └── placeholder.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod country_detail;
pub mod country_grid;
pub mod placeholder;
pub mod search_bar;

pub use country_detail::CountryDetail;
pub use country_grid::{CountryGrid, GridEvent, GridState};
pub use placeholder::{Placeholder, PlaceholderKind};
pub use search_bar::{SearchBar, SearchBox, SearchEvent};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::listing::Phase;
use crate::core::state::{App, Route};
use crate::tui::component::Component;
use crate::tui::components::{
    CountryDetail, CountryGrid, Placeholder, PlaceholderKind, SearchBar, TitleBar,
};
use crate::tui::{Focus, TuiState};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, main_area, help_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    TitleBar::new(app.route.path(), app.status_message.clone()).render(frame, title_area);

    // Only a drawn grid can report its sentinel
    tui.grid.visible_sentinel = None;

    match &app.route {
        Route::Listing => draw_listing(frame, main_area, app, tui, spinner_frame),
        Route::Country(_) => match &app.detail {
            Some(view) => {
                let favorited = view
                    .state()
                    .code()
                    .is_some_and(|code| app.favorites.is_favorited(code));
                CountryDetail {
                    detail: view.state(),
                    favorited,
                    spinner_frame,
                    scroll: &mut tui.detail_scroll,
                }
                .render(frame, main_area);
            }
            None => Placeholder::new(PlaceholderKind::Loading, spinner_frame).render(frame, main_area),
        },
    }

    let help = help_text(&app.route, tui.focus);
    frame.render_widget(
        Line::styled(help, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_listing(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [search_area, body_area] = Layout::vertical([Length(3), Min(0)]).areas(area);

    SearchBar {
        search: &tui.search,
        favorites_only: app.listing.favorites_only(),
        focused: tui.focus == Focus::Search,
    }
    .render(frame, search_area);

    let kind = match app.listing.phase() {
        Phase::Idle | Phase::Loading => Some(PlaceholderKind::Loading),
        Phase::Empty => Some(PlaceholderKind::Empty),
        Phase::Failed(message) => Some(PlaceholderKind::Error(message.clone())),
        Phase::Loaded if app.listing.displayed_len() == 0 => Some(PlaceholderKind::NoFavorites),
        Phase::Loaded => None,
    };

    match kind {
        Some(kind) => Placeholder::new(kind, spinner_frame).render(frame, body_area),
        None => CountryGrid {
            entries: app.listing.window(),
            sentinel: app.listing.sentinel_id(),
            has_more: app.listing.has_more(),
            focused: tui.focus == Focus::Grid,
            state: &mut tui.grid,
        }
        .render(frame, body_area),
    }
}

fn help_text(route: &Route, focus: Focus) -> &'static str {
    match (route, focus) {
        (Route::Country(_), _) => " Esc Back  ↑↓ Scroll  f Favorite  Ctrl+R Retry  q Quit",
        (Route::Listing, Focus::Search) => " Type to search  Tab Cards  Ctrl+F Favorites only  Ctrl+R Retry  Ctrl+C Quit",
        (Route::Listing, Focus::Grid) => {
            " ←↑↓→ Move  Enter Open  Space Favorite  / Search  Ctrl+F Favorites only  Ctrl+R Retry  q Quit"
        }
    }
}

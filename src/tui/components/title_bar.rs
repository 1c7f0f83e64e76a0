//! # TitleBar Component
//!
//! One-line header: the app title, the current route and the latest status.
//!
//! ```text
//! Countries List  /country/BRA  | Brazil
//! ```
//!
//! Purely presentational. Everything it shows is handed in as props, so a
//! test only has to build the struct and read the buffer back.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const APP_TITLE: &str = "Countries List";

pub struct TitleBar {
    /// Path of the active route, e.g. `/` or `/country/BRA`
    pub route_path: String,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(route_path: String, status_message: String) -> Self {
        Self {
            route_path,
            status_message,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(APP_TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(self.route_path.clone(), Style::default().fg(Color::DarkGray)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!("  | {}", self.status_message)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

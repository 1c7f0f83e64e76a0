//! # Placeholder Component
//!
//! What the listing body shows when there are no cards to draw: the
//! loading spinner, the "no results" message, or the error box.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::tui::component::Component;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderKind {
    Loading,
    Empty,
    /// Favorites filter is on and nothing in the list is favorited
    NoFavorites,
    Error(String),
}

pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub spinner_frame: usize,
}

impl Placeholder {
    pub fn new(kind: PlaceholderKind, spinner_frame: usize) -> Self {
        Self {
            kind,
            spinner_frame,
        }
    }
}

/// A band of `height` rows through the vertical middle of `area`.
fn middle_band(area: Rect, height: u16) -> Rect {
    let [_, band, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    band
}

impl Component for Placeholder {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        match &self.kind {
            PlaceholderKind::Loading => {
                let line = Line::from(vec![
                    Span::styled(spinner(self.spinner_frame), Style::default().fg(Color::Cyan)),
                    Span::raw(" Loading countries..."),
                ]);
                frame.render_widget(Paragraph::new(line).centered(), middle_band(area, 1));
            }
            PlaceholderKind::Empty => {
                let lines = vec![
                    Line::from("Oops! No country was found for this search."),
                    Line::styled("Try another name.", dim),
                ];
                frame.render_widget(Paragraph::new(lines).centered(), middle_band(area, 2));
            }
            PlaceholderKind::NoFavorites => {
                let lines = vec![
                    Line::from("No favorites in this list yet."),
                    Line::styled("Press Space on a card to add one, Ctrl+F to show all.", dim),
                ];
                frame.render_widget(Paragraph::new(lines).centered(), middle_band(area, 2));
            }
            PlaceholderKind::Error(message) => {
                let lines = vec![
                    Line::from(message.as_str()),
                    Line::from(""),
                    Line::styled("Press Ctrl+R to retry", dim),
                ];
                let error_box = Paragraph::new(lines)
                    .block(
                        Block::bordered()
                            .title("ERROR")
                            .border_style(Style::default().fg(Color::Red))
                            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    )
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(error_box, middle_band(area, 6));
            }
        }
    }
}

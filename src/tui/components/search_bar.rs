//! # SearchBar Component
//!
//! Single-line search input plus the favorites-only switch.
//!
//! ```text
//! ┌ Search for a country ──────────────────────┐┌ Favorites ─┐
//! │bra▏                                        ││ [x] Ctrl+F │
//! └────────────────────────────────────────────┘└────────────┘
//! ```
//!
//! The text buffer lives in [`SearchBox`], which persists in `TuiState`.
//! Every edit reports the whole buffer upward; debouncing happens in core.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Buffer contents after an edit
    Changed(String),
    /// Cursor moved without changing the text
    Moved,
    /// User wants to leave the box (Tab, Enter, Down)
    Leave,
}

/// Search text and cursor (byte offset into `buffer`).
#[derive(Debug, Default)]
pub struct SearchBox {
    pub buffer: String,
    cursor: usize,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display column of the cursor, measured in terminal cells.
    pub fn cursor_column(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }

    fn changed(&self) -> Option<SearchEvent> {
        Some(SearchEvent::Changed(self.buffer.clone()))
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl EventHandler for SearchBox {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                self.changed()
            }
            TuiEvent::Paste(text) => {
                // The box is one line
                let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                if text.is_empty() {
                    return None;
                }
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                Some(SearchEvent::Moved)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                Some(SearchEvent::Moved)
            }
            TuiEvent::Home => {
                self.cursor = 0;
                Some(SearchEvent::Moved)
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                Some(SearchEvent::Moved)
            }
            TuiEvent::FocusNext | TuiEvent::Submit | TuiEvent::CursorDown => {
                Some(SearchEvent::Leave)
            }
            _ => None,
        }
    }
}

/// Transient render wrapper, rebuilt every frame.
pub struct SearchBar<'a> {
    pub search: &'a SearchBox,
    pub favorites_only: bool,
    pub focused: bool,
}

impl Component for SearchBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use Constraint::{Length, Min};
        let [input_area, switch_area] = Layout::horizontal([Min(10), Length(16)]).areas(area);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let input = if self.search.buffer.is_empty() && !self.focused {
            Paragraph::new(Span::styled(
                "Type to search...",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.search.buffer.as_str())
        };
        let input = input.block(
            Block::bordered()
                .title(" Search for a country ")
                .border_style(border_style),
        );
        frame.render_widget(input, input_area);

        let (mark, mark_style) = if self.favorites_only {
            ("[x]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("[ ]", Style::default())
        };
        let switch = Paragraph::new(Line::from(vec![
            Span::styled(mark, mark_style),
            Span::styled(" Ctrl+F", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::bordered()
                .title(" Favorites ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(switch, switch_area);

        if self.focused {
            let inner_width = input_area.width.saturating_sub(2);
            let column = self.search.cursor_column().min(inner_width.saturating_sub(1));
            frame.set_cursor_position(Position::new(input_area.x + 1 + column, input_area.y + 1));
        }
    }
}

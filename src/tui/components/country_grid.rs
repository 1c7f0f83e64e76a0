//! # CountryGrid Component
//!
//! Cards for the revealed window of the listing, laid out in as many columns
//! as fit, inside a vertical `ScrollView`.
//!
//! ```text
//! ┌ Brazil ─────────────┐┌ Peru ───────────────┐
//! │Capital: Brasília    ││Capital: Lima        │
//! │Americas             ││Americas             │
//! │BRA  ★               ││PER                  │
//! └─────────────────────┘└─────────────────────┘
//! ```
//!
//! ## Sentinel
//!
//! The last revealed card is the pagination sentinel. Each render checks
//! whether its row intersects the viewport and, if so, leaves its
//! `SentinelId` in [`GridState::visible_sentinel`] for the run loop to
//! dispatch. Core decides whether that actually reveals anything.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::listing::CountryEntry;
use crate::core::pagination::SentinelId;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows per card, borders included.
pub const CARD_HEIGHT: u16 = 5;
/// Narrowest a card may get before a column is dropped.
pub const MIN_CARD_WIDTH: u16 = 26;

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Open the card at this window index
    Open(usize),
    ToggleFavorite(usize),
    /// Hand focus back to the search box
    Leave,
}

/// Selection, scroll position and the geometry measured by the last render.
pub struct GridState {
    pub selected: usize,
    pub scroll_state: ScrollViewState,
    /// Sentinel seen on screen during the last render, not yet dispatched
    pub visible_sentinel: Option<SentinelId>,
    columns: usize,
    len: usize,
    viewport_height: u16,
    content_height: u16,
    generation: u64,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

impl GridState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_state: ScrollViewState::default(),
            visible_sentinel: None,
            columns: 1,
            len: 0,
            viewport_height: 0,
            content_height: 0,
            generation: 0,
        }
    }

    /// Keeps the selection valid for the current window. A new search
    /// generation sends the view back to the top.
    pub fn sync(&mut self, generation: u64, len: usize) {
        if generation != self.generation {
            self.generation = generation;
            self.selected = 0;
            self.scroll_state.set_offset(Position { x: 0, y: 0 });
        }
        self.len = len;
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn take_visible_sentinel(&mut self) -> Option<SentinelId> {
        self.visible_sentinel.take()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn set_offset_y(&mut self, y: u16) {
        self.scroll_state.set_offset(Position {
            x: 0,
            y: y.min(self.max_offset()),
        });
    }

    /// Scrolls the least amount that brings the selected card fully on screen.
    pub fn scroll_to_selected(&mut self) {
        let top = (self.selected / self.columns) as u16 * CARD_HEIGHT;
        let bottom = top + CARD_HEIGHT;
        let offset = self.scroll_state.offset().y;
        if top < offset {
            self.set_offset_y(top);
        } else if bottom > offset + self.viewport_height {
            self.set_offset_y(bottom.saturating_sub(self.viewport_height));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.len == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, self.len as isize - 1) as usize;
        self.scroll_to_selected();
    }

    fn page_rows(&self) -> usize {
        ((self.viewport_height / CARD_HEIGHT) as usize).max(1)
    }
}

impl EventHandler for GridState {
    type Event = GridEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let columns = self.columns as isize;
        match event {
            TuiEvent::CursorUp if self.selected < self.columns => Some(GridEvent::Leave),
            TuiEvent::CursorUp => {
                self.move_selection(-columns);
                None
            }
            TuiEvent::CursorDown => {
                // The last row may be short; land on its last card
                self.move_selection(columns);
                None
            }
            TuiEvent::CursorLeft => {
                self.move_selection(-1);
                None
            }
            TuiEvent::CursorRight => {
                self.move_selection(1);
                None
            }
            TuiEvent::PageUp => {
                self.move_selection(-(self.page_rows() as isize) * columns);
                None
            }
            TuiEvent::PageDown => {
                self.move_selection(self.page_rows() as isize * columns);
                None
            }
            TuiEvent::Home => {
                self.move_selection(-(self.len as isize));
                None
            }
            TuiEvent::End => {
                self.move_selection(self.len as isize);
                None
            }
            TuiEvent::ScrollUp => {
                let y = self.scroll_state.offset().y;
                self.set_offset_y(y.saturating_sub(1));
                None
            }
            TuiEvent::ScrollDown => {
                let y = self.scroll_state.offset().y;
                self.set_offset_y(y.saturating_add(1));
                None
            }
            TuiEvent::Submit if self.len > 0 => Some(GridEvent::Open(self.selected)),
            TuiEvent::InputChar(' ') | TuiEvent::InputChar('f') if self.len > 0 => {
                Some(GridEvent::ToggleFavorite(self.selected))
            }
            TuiEvent::FocusNext | TuiEvent::InputChar('/') => Some(GridEvent::Leave),
            _ => None,
        }
    }
}

/// Whether a card row intersects the viewport `[offset, offset + viewport)`.
pub fn row_visible(row: usize, offset: u16, viewport_height: u16) -> bool {
    let top = row as u16 * CARD_HEIGHT;
    let bottom = top + CARD_HEIGHT;
    top < offset.saturating_add(viewport_height) && bottom > offset
}

/// Cuts `text` to at most `max_width` cells, ending with `…` when shortened.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Transient render wrapper, rebuilt every frame.
pub struct CountryGrid<'a> {
    pub entries: Vec<&'a CountryEntry>,
    pub sentinel: Option<SentinelId>,
    pub has_more: bool,
    pub focused: bool,
    pub state: &'a mut GridState,
}

impl CountryGrid<'_> {
    fn card(&self, entry: &CountryEntry, selected: bool, width: u16) -> Paragraph<'static> {
        let inner = width.saturating_sub(2) as usize;
        let border_style = match (selected, entry.favorited) {
            (true, _) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::Yellow),
            (false, false) => Style::default().fg(Color::DarkGray),
        };
        let record = &entry.record;

        let mut code_line = vec![Span::styled(
            record.code().to_string(),
            Style::default().fg(Color::DarkGray),
        )];
        if entry.favorited {
            code_line.push(Span::styled("  ★", Style::default().fg(Color::Yellow)));
        }

        let lines = vec![
            Line::from(truncate_to_width(
                &format!("Capital: {}", record.capital_label()),
                inner,
            )),
            Line::from(truncate_to_width(&record.region, inner)),
            Line::from(code_line),
        ];

        let title = truncate_to_width(&record.name.common, inner.saturating_sub(2));
        Paragraph::new(lines).block(
            Block::bordered()
                .title(Span::styled(
                    format!(" {title} "),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .border_style(border_style),
        )
    }
}

impl Component for CountryGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // One column is reserved for the scrollbar
        let content_width = area.width.saturating_sub(1).max(1);
        let columns = ((content_width / MIN_CARD_WIDTH) as usize).max(1);
        let card_width = content_width / columns as u16;
        let rows = self.entries.len().div_ceil(columns);
        let footer = u16::from(self.has_more);
        let content_height = rows as u16 * CARD_HEIGHT + footer;

        self.state.columns = columns;
        self.state.len = self.entries.len();
        self.state.viewport_height = area.height;
        self.state.content_height = content_height;
        let offset = self.state.scroll_state.offset().y.min(self.state.max_offset());
        self.state.set_offset_y(offset);

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (i, entry) in self.entries.iter().enumerate() {
            let row = i / columns;
            if !row_visible(row, offset, area.height) {
                continue;
            }
            let rect = Rect::new(
                (i % columns) as u16 * card_width,
                row as u16 * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            );
            let selected = self.focused && i == self.state.selected;
            scroll_view.render_widget(self.card(entry, selected, card_width), rect);
        }

        if self.has_more {
            let hint = Paragraph::new(Span::styled(
                "Scroll for more...",
                Style::default().fg(Color::DarkGray),
            ))
            .centered();
            scroll_view.render_widget(hint, Rect::new(0, rows as u16 * CARD_HEIGHT, content_width, 1));
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        self.state.visible_sentinel = self
            .sentinel
            .filter(|id| row_visible(id.index / columns, offset, area.height));
    }
}

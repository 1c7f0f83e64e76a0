//! # CountryDetail Component
//!
//! Full page for a single country:
//!
//! ```text
//! Home > Federative Republic of Brazil
//!
//! Brazil  ★
//! Capital: Brasília
//!
//! Flag        https://flagcdn.com/br.svg
//!             The flag of Brazil has a green field with a large yellow
//!             rhombus in the center...
//! Region      Americas
//! Subregion   South America
//! Population  213,421,037 residents
//! Currencies  Brazilian real (R$)
//! Languages   Portuguese
//! Continents  South America
//! ```
//!
//! Loading, not-found and failed lookups get their own screens. Terminals
//! cannot draw the flag image, so its URL and alt text stand in for it.
//! Pages taller than the terminal scroll; the offset is clamped on render.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::core::detail::Detail;
use crate::countries::{CountryRecord, format_population};
use crate::tui::component::Component;
use crate::tui::components::placeholder::spinner;

const LABEL_WIDTH: usize = 12;

pub struct CountryDetail<'a> {
    pub detail: &'a Detail,
    pub favorited: bool,
    pub spinner_frame: usize,
    pub scroll: &'a mut u16,
}

fn label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// A labelled field. Long values wrap under the value column.
fn field(label: &str, value: &str, width: u16) -> Vec<Line<'static>> {
    let value_width = (width as usize).saturating_sub(LABEL_WIDTH).max(10);
    let wrapped = textwrap::wrap(value, value_width);
    if wrapped.is_empty() {
        return vec![Line::from(Span::styled(
            format!("{label:<LABEL_WIDTH$}"),
            label_style(),
        ))];
    }
    wrapped
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let label = if i == 0 { label } else { "" };
            Line::from(vec![
                Span::styled(format!("{label:<LABEL_WIDTH$}"), label_style()),
                Span::raw(part.into_owned()),
            ])
        })
        .collect()
}

fn joined_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

fn record_lines(record: &CountryRecord, favorited: bool, width: u16) -> Vec<Line<'static>> {
    let official = if record.name.official.is_empty() {
        record.name.common.clone()
    } else {
        record.name.official.clone()
    };
    let mut title = vec![Span::styled(
        record.name.common.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if favorited {
        title.push(Span::styled("  ★", Style::default().fg(Color::Yellow)));
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Home > ", label_style()),
            Span::raw(official),
        ]),
        Line::from(""),
        Line::from(title),
        Line::from(format!("Capital: {}", record.capital_label())),
        Line::from(""),
    ];

    let flag_url = if record.flags.svg.is_empty() {
        &record.flags.png
    } else {
        &record.flags.svg
    };
    lines.extend(field("Flag", if flag_url.is_empty() { "-" } else { flag_url }, width));
    if let Some(alt) = record.flags.alt.as_deref().filter(|alt| !alt.is_empty()) {
        lines.extend(field("", alt, width));
    }

    let subregion = if record.subregion.is_empty() {
        "-"
    } else {
        &record.subregion
    };
    lines.extend(field("Region", &record.region, width));
    lines.extend(field("Subregion", subregion, width));
    lines.extend(field(
        "Population",
        &format!("{} residents", format_population(record.population)),
        width,
    ));
    lines.extend(field("Currencies", &joined_or_dash(&record.currency_labels()), width));
    lines.extend(field("Languages", &joined_or_dash(&record.language_labels()), width));
    lines.extend(field("Continents", &joined_or_dash(&record.continents), width));
    lines
}

impl Component for CountryDetail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let help = match self.detail {
            Detail::Loaded(_) => " Esc Back  f Favorite  r Reload ",
            Detail::Failed { .. } => " Esc Back  r Retry ",
            _ => " Esc Back ",
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title_bottom(Line::from(help).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        let inner_width = inner.width;

        let lines = match self.detail {
            Detail::Loading(key) => vec![Line::from(vec![
                Span::styled(spinner(self.spinner_frame), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" Loading {}...", key.as_str())),
            ])],
            Detail::Loaded(record) => record_lines(record, self.favorited, inner_width),
            Detail::NotFound(key) => vec![
                Line::from(format!("No country matches \"{}\".", key.as_str())),
                Line::styled("Press Esc to go back to the list.", label_style()),
            ],
            Detail::Failed { key, message } => vec![
                Line::styled(
                    format!("Could not load {}", key.as_str()),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Line::from(message.clone()),
            ],
        };

        let max_scroll = u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .saturating_sub(inner.height);
        *self.scroll = (*self.scroll).min(max_scroll);

        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((*self.scroll, 0)),
            area,
        );
    }
}

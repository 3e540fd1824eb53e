//! Shared rendering for the listing states: loading, error, the three
//! empty flavors, and the populated item table.

use findit_api::{Item, ItemType};
use findit_core::{EmptyReason, ListingState};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table};

use crate::theme;

/// Selection and spinner state for a rendered listing.
#[derive(Debug, Default)]
pub struct ListingView {
    pub selected: usize,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl ListingView {
    /// Advance the loading spinner. Driven by the app's 4 Hz tick.
    pub fn tick(&mut self) {
        self.throbber.calc_next();
    }

    /// Move the selection up, clamped at the first row.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the selection down, clamped at the last row of `len` items.
    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Clamp the selection after the item list changed.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// The currently selected item, if any.
    pub fn selected_item<'a>(&self, state: &'a ListingState) -> Option<&'a Item> {
        state.items().get(self.selected)
    }

    /// Render `state` into `area` inside a bordered block titled `title`.
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &ListingState, title: &str) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match state {
            ListingState::Loading => {
                let spinner = throbber_widgets_tui::Throbber::default()
                    .label("Loading items...")
                    .style(theme::table_row())
                    .throbber_style(Style::default().fg(theme::ACCENT_TEAL));
                let y = inner.y + inner.height / 2;
                let spinner_area = Rect::new(
                    inner.x + inner.width.saturating_sub(20) / 2,
                    y.min(inner.bottom().saturating_sub(1)),
                    20.min(inner.width),
                    1,
                );
                let mut throbber_state = self.throbber.clone();
                frame.render_stateful_widget(spinner, spinner_area, &mut throbber_state);
            }
            ListingState::Error(message) => {
                render_message(
                    frame,
                    inner,
                    &[
                        Line::from(message.clone()),
                        Line::from(""),
                        hint_line("r", "reset filters and retry"),
                    ],
                    theme::error_banner(),
                );
            }
            ListingState::Empty(reason) => {
                render_empty(frame, inner, *reason);
            }
            ListingState::Populated(items) => {
                self.render_table(frame, inner, items);
            }
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, items: &[Item]) {
        let header = Row::new(vec!["Type", "Title", "Category", "Location", "When", "Status"])
            .style(theme::table_header());

        let rows: Vec<Row> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let type_span = match item.item_type {
                    ItemType::Lost => {
                        Span::styled("LOST", Style::default().fg(theme::ERROR_RED))
                    }
                    ItemType::Found => {
                        Span::styled("FOUND", Style::default().fg(theme::SUCCESS_GREEN))
                    }
                };
                let status = if item.is_resolved { "Resolved" } else { "Open" };
                let category = item
                    .category
                    .as_ref()
                    .map_or("—", |c| c.name.as_str())
                    .to_owned();
                let row = Row::new(vec![
                    Line::from(type_span),
                    Line::from(item.title.clone()),
                    Line::from(category),
                    Line::from(item.location.clone()),
                    Line::from(item.date_occurred.format("%Y-%m-%d").to_string()),
                    Line::from(status),
                ]);
                if i == self.selected {
                    row.style(theme::table_selected())
                } else {
                    row.style(theme::table_row())
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(20),
                Constraint::Length(14),
                Constraint::Min(14),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
        )
        .header(header);

        frame.render_widget(table, area);
    }
}

fn render_empty(frame: &mut Frame, area: Rect, reason: EmptyReason) {
    match reason {
        EmptyReason::Unauthenticated => render_message(
            frame,
            area,
            &[
                Line::from(Span::styled("Sign in to view items", theme::title_style())),
                Line::from(""),
                Line::from("Please sign in or create an account to view"),
                Line::from("and interact with lost and found items."),
                Line::from(""),
                hint_line("l", "sign in    g register"),
            ],
            theme::table_row(),
        ),
        EmptyReason::Filtered => render_message(
            frame,
            area,
            &[
                Line::from(Span::styled("No matching items found", theme::title_style())),
                Line::from(""),
                Line::from("We couldn't find any items matching your search"),
                Line::from("criteria. Try adjusting your filters or search terms."),
                Line::from(""),
                hint_line("r", "reset filters"),
            ],
            theme::table_row(),
        ),
        EmptyReason::NoItems => render_message(
            frame,
            area,
            &[
                Line::from(Span::styled("No items yet", theme::title_style())),
                Line::from(""),
                Line::from("There are currently no items to display. Check back"),
                Line::from("later or be the first to post a lost or found item."),
            ],
            theme::table_row(),
        ),
    }
}

fn render_message(frame: &mut Frame, area: Rect, lines: &[Line], style: Style) {
    let top_pad = area.height.saturating_sub(u16::try_from(lines.len()).unwrap_or(0)) / 2;
    let padded: Vec<Line> = std::iter::repeat_n(Line::from(""), usize::from(top_pad))
        .chain(lines.iter().cloned())
        .collect();
    frame.render_widget(
        Paragraph::new(padded)
            .style(style)
            .alignment(Alignment::Center),
        area,
    );
}

fn hint_line(key: &str, rest: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key.to_owned(), theme::key_hint_key()),
        Span::styled(format!(" {rest}"), theme::key_hint()),
    ])
}

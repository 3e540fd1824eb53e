//! Form-field rendering: labeled text inputs with inline validation
//! messages, shared by the auth forms and the item forms.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::Input;

use crate::theme;

/// Height of one rendered field: bordered input plus the error line.
pub const FIELD_HEIGHT: u16 = 4;

/// Render a labeled single-line text field.
///
/// `masked` replaces the value with dots (password entry). When `focused`,
/// the border highlights and the terminal cursor is positioned inside the
/// field.
pub fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    masked: bool,
    error: Option<&str>,
) {
    let [input_area, error_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);

    let border = if focused {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let block = Block::default()
        .title(format!(" {label} "))
        .title_style(theme::form_label())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(input_area);
    frame.render_widget(block, input_area);

    let shown = if masked {
        "•".repeat(input.value().chars().count())
    } else {
        input.value().to_owned()
    };

    // Keep the cursor in view on narrow fields.
    let width = usize::from(inner.width.max(1));
    let scroll = input.visual_scroll(width.saturating_sub(1));
    let visible: String = shown.chars().skip(scroll).collect();
    frame.render_widget(
        Paragraph::new(visible).style(theme::table_row()),
        inner,
    );

    if focused {
        #[allow(clippy::cast_possible_truncation)]
        let cursor_x = inner.x + (input.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    if let Some(message) = error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                message.to_owned(),
                theme::form_error(),
            ))),
            error_area,
        );
    }
}

/// Render a read-only "choice" field (cycled with a key rather than typed).
pub fn render_choice_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    hint: &str,
    focused: bool,
    error: Option<&str>,
) {
    let [input_area, error_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);

    let border = if focused {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let block = Block::default()
        .title(format!(" {label} "))
        .title_style(theme::form_label())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(input_area);
    frame.render_widget(block, input_area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(value.to_owned(), theme::table_row()),
            Span::styled(format!("  {hint}"), theme::key_hint()),
        ])),
        inner,
    );

    if let Some(message) = error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                message.to_owned(),
                theme::form_error(),
            ))),
            error_area,
        );
    }
}

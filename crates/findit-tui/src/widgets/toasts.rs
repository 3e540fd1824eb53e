//! Toast stack -- renders the notification queue in the top-right corner.

use findit_core::{Notification, NotifyKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::theme;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;
const MAX_VISIBLE: usize = 4;

fn kind_color(kind: NotifyKind) -> ratatui::style::Color {
    match kind {
        NotifyKind::Success => theme::SUCCESS_GREEN,
        NotifyKind::Error => theme::ERROR_RED,
        NotifyKind::Info => theme::INFO_BLUE,
    }
}

fn kind_label(kind: NotifyKind) -> &'static str {
    match kind {
        NotifyKind::Success => " ✓ ",
        NotifyKind::Error => " ✗ ",
        NotifyKind::Info => " ℹ ",
    }
}

/// Render the notification queue, newest entries included last, stacked
/// from the top-right corner. Display order is insertion order.
pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Notification]) {
    let width = TOAST_WIDTH.min(area.width.saturating_sub(2));
    if width < 10 || area.height < TOAST_HEIGHT {
        return;
    }
    let x = area.right().saturating_sub(width + 1);

    for (i, toast) in toasts.iter().take(MAX_VISIBLE).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let y = area.y + 1 + (i as u16) * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.bottom() {
            break;
        }
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);

        let color = kind_color(toast.kind);
        let block = Block::default()
            .title(kind_label(toast.kind))
            .title_style(Style::default().fg(color))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(toast_area);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(block, toast_area);
        frame.render_widget(
            Paragraph::new(Line::from(toast.message.clone()))
                .style(theme::table_row())
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

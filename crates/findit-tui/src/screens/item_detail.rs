//! Single-item view. Loads the item named by the incoming `OpenItem`
//! action; a load failure renders a page-level error panel with a
//! return-home affordance instead of crashing or retrying.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::UnboundedSender;

use findit_api::{Item, ItemType};
use findit_core::SessionState;

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::services::Services;
use crate::theme;

pub struct ItemDetailScreen {
    services: Services,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionState,
    item: Option<Item>,
    loading: bool,
    error: Option<String>,
    confirm_delete: bool,
    focused: bool,
}

impl ItemDetailScreen {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            action_tx: None,
            session: SessionState::default(),
            item: None,
            loading: false,
            error: None,
            confirm_delete: false,
            focused: false,
        }
    }

    fn load(&mut self, id: i64) {
        self.item = None;
        self.error = None;
        self.loading = true;
        self.confirm_delete = false;

        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let api = std::sync::Arc::clone(&self.services.api);
        tokio::spawn(async move {
            match api.get_item(id).await {
                Ok(item) => {
                    let _ = tx.send(Action::ItemLoaded(item));
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "item fetch failed");
                    let _ = tx.send(Action::ItemLoadFailed("Failed to load item data".into()));
                }
            }
        });
    }

    /// The signed-in user may manage their own items; admins may manage all.
    fn can_manage(&self) -> bool {
        match (&self.item, &self.session.user) {
            (Some(item), Some(user)) => user.is_admin || item.user_id == user.id,
            _ => false,
        }
    }

    fn delete(&mut self, id: i64) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let api = std::sync::Arc::clone(&self.services.api);
        let notifier = self.services.notifier.clone();
        tokio::spawn(async move {
            match api.delete_item(id).await {
                Ok(()) => {
                    notifier.success("Item deleted");
                    let _ = tx.send(Action::ItemDeleted(id));
                    let _ = tx.send(Action::SwitchScreen(ScreenId::Home));
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "item deletion failed");
                    notifier.error("Failed to delete item. Please try again.");
                }
            }
        });
    }
}

impl Component for ItemDetailScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.confirm_delete {
            match key.code {
                KeyCode::Char('y') => {
                    self.confirm_delete = false;
                    if let Some(id) = self.item.as_ref().map(|i| i.id) {
                        self.delete(id);
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => self.confirm_delete = false,
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('h') if self.error.is_some() => {
                return Ok(Some(Action::SwitchScreen(ScreenId::Home)));
            }
            KeyCode::Esc => return Ok(Some(Action::GoBack)),
            KeyCode::Char('e') if self.can_manage() => {
                if let Some(id) = self.item.as_ref().map(|i| i.id) {
                    return Ok(Some(Action::OpenEditItem(id)));
                }
            }
            KeyCode::Char('d') if self.can_manage() => self.confirm_delete = true,
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SessionChanged(state) => self.session = state.clone(),
            Action::OpenItem(id) => self.load(*id),
            Action::ItemLoaded(item) => {
                self.item = Some(item.clone());
                self.loading = false;
            }
            Action::ItemLoadFailed(message) if self.focused => {
                self.error = Some(message.clone());
                self.loading = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Item ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading {
            frame.render_widget(
                Paragraph::new("Loading item...")
                    .style(theme::table_row())
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        if let Some(ref message) = self.error {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(message.clone(), theme::error_banner())),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("h", theme::key_hint_key()),
                        Span::styled(" return home", theme::key_hint()),
                    ]),
                ])
                .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let Some(ref item) = self.item else {
            frame.render_widget(
                Paragraph::new("Open an item from a listing to view it here.")
                    .style(theme::key_hint())
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        };

        let type_span = match item.item_type {
            ItemType::Lost => Span::styled(" LOST ", Style::default().fg(theme::ERROR_RED)),
            ItemType::Found => {
                Span::styled(" FOUND ", Style::default().fg(theme::SUCCESS_GREEN))
            }
        };
        let status = if item.is_resolved {
            Span::styled("Resolved", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled("Open", Style::default().fg(theme::ACCENT_AMBER))
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(item.title.clone(), theme::title_style()),
                Span::raw("  "),
                type_span,
                Span::raw("  "),
                status,
            ]),
            Line::from(""),
            Line::from(Span::styled(item.description.clone(), theme::table_row())),
            Line::from(""),
            field_line(
                "Category",
                item.category
                    .as_ref()
                    .map_or("—".to_owned(), |c| c.name.clone()),
            ),
            field_line("Location", item.location.clone()),
            field_line(
                "Occurred",
                item.date_occurred.format("%Y-%m-%d %H:%M").to_string(),
            ),
            field_line(
                "Posted",
                item.date_posted.format("%Y-%m-%d %H:%M").to_string(),
            ),
        ];
        if let Some(ref image_url) = item.image_url {
            lines.push(field_line("Image", image_url.clone()));
        }
        lines.push(Line::from(""));

        if self.confirm_delete {
            lines.push(Line::from(vec![
                Span::styled("Delete this item? ", theme::error_banner()),
                Span::styled("y", theme::key_hint_key()),
                Span::styled(" confirm  ", theme::key_hint()),
                Span::styled("n", theme::key_hint_key()),
                Span::styled(" cancel", theme::key_hint()),
            ]));
        } else if self.can_manage() {
            lines.push(Line::from(vec![
                Span::styled("e", theme::key_hint_key()),
                Span::styled(" edit  ", theme::key_hint()),
                Span::styled("d", theme::key_hint_key()),
                Span::styled(" delete  ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" back", theme::key_hint()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" back", theme::key_hint()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn id(&self) -> &str {
        "item-detail"
    }
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>10}: "), theme::form_label()),
        Span::styled(value, theme::table_row()),
    ])
}

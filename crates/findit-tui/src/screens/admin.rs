//! Admin panel -- the full listing with management affordances. The
//! admin-only guard redirects everyone else before this screen renders.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;

use findit_core::{ListingRequest, ListingState, OwnerScope, SessionState};

use crate::action::Action;
use crate::component::Component;
use crate::services::Services;
use crate::theme;
use crate::widgets::listing_view::ListingView;

pub struct AdminScreen {
    services: Services,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionState,
    request: ListingRequest,
    listing: ListingState,
    view: ListingView,
    confirm_delete: Option<i64>,
    focused: bool,
}

impl AdminScreen {
    pub fn new(services: Services) -> Self {
        let request = ListingRequest {
            scope: OwnerScope::Global,
            requires_auth: true,
            max_items: None,
            ..ListingRequest::default()
        };
        Self {
            services,
            action_tx: None,
            session: SessionState::default(),
            request,
            listing: ListingState::Loading,
            view: ListingView::default(),
            confirm_delete: None,
            focused: false,
        }
    }

    fn refetch(&self) {
        let fetcher = self.services.admin_listing.clone();
        let request = self.request.clone();
        let session = self.services.session.state();
        tokio::spawn(async move { fetcher.fetch(&request, &session).await });
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
                    notifier.success("Item removed");
                    let _ = tx.send(Action::ItemDeleted(id));
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "admin item removal failed");
                    notifier.error("Failed to remove item. Please try again.");
                }
            }
        });
    }
}

impl Component for AdminScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(id) = self.confirm_delete {
            match key.code {
                KeyCode::Char('y') => {
                    self.confirm_delete = None;
                    self.delete(id);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.confirm_delete = None,
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.view.select_next(self.listing.items().len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.view.select_prev(),
            KeyCode::Enter => {
                if let Some(item) = self.view.selected_item(&self.listing) {
                    return Ok(Some(Action::OpenItem(item.id)));
                }
            }
            KeyCode::Char('e') => {
                if let Some(item) = self.view.selected_item(&self.listing) {
                    return Ok(Some(Action::OpenEditItem(item.id)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(item) = self.view.selected_item(&self.listing) {
                    self.confirm_delete = Some(item.id);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.view.tick(),
            Action::SessionChanged(state) => self.session = state.clone(),
            Action::AdminListingChanged(state) => {
                self.listing = state.clone();
                self.view.clamp(self.listing.items().len());
            }
            Action::ItemDeleted(_) | Action::ItemSaved(_) if self.focused => self.refetch(),
            _ => {}
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.confirm_delete = None;
            self.refetch();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header_area, listing_area, footer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(area);

        let admin_name = self
            .session
            .user
            .as_ref()
            .map_or_else(String::new, |u| u.username.clone());
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Management Panel", theme::title_style()),
                Span::styled(format!("  ({admin_name})"), theme::key_hint()),
            ])),
            header_area,
        );

        self.view
            .render(frame, listing_area, &self.listing, "All Items");

        let footer = if let Some(id) = self.confirm_delete {
            Line::from(vec![
                Span::styled(
                    format!("Remove item #{id}? This cannot be undone. "),
                    theme::error_banner(),
                ),
                Span::styled("y", theme::key_hint_key()),
                Span::styled(" confirm  ", theme::key_hint()),
                Span::styled("n", theme::key_hint_key()),
                Span::styled(" cancel", theme::key_hint()),
            ])
        } else {
            Line::from(vec![
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" view  ", theme::key_hint()),
                Span::styled("e", theme::key_hint_key()),
                Span::styled(" edit  ", theme::key_hint()),
                Span::styled("d", theme::key_hint_key()),
                Span::styled(" remove", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(footer), footer_area);
    }

    fn id(&self) -> &str {
        "admin"
    }
}

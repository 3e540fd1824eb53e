//! Home screen -- the global listing with search and filters.
//!
//! Without an active search it shows the six most recently posted items;
//! submitting a search lifts the cap and overwrites only the filter's
//! search term, leaving the type/category selections in place.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use findit_api::{Category, ItemType};
use findit_core::{ListingRequest, ListingState, OwnerScope, SessionState};

use crate::action::Action;
use crate::component::Component;
use crate::services::Services;
use crate::theme;
use crate::widgets::listing_view::ListingView;

/// Cap on the "recently posted" view when no search is active.
const RECENT_ITEMS_CAP: usize = 6;

pub struct HomeScreen {
    services: Services,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionState,
    categories: Arc<Vec<Category>>,
    request: ListingRequest,
    listing: ListingState,
    view: ListingView,
    search: Input,
    search_active: bool,
    focused: bool,
}

impl HomeScreen {
    pub fn new(services: Services) -> Self {
        let request = ListingRequest {
            scope: OwnerScope::Global,
            requires_auth: false,
            max_items: Some(RECENT_ITEMS_CAP),
            ..ListingRequest::default()
        };
        Self {
            services,
            action_tx: None,
            session: SessionState::default(),
            categories: Arc::new(Vec::new()),
            request,
            listing: ListingState::Loading,
            view: ListingView::default(),
            search: Input::default(),
            search_active: false,
            focused: false,
        }
    }

    fn refetch(&self) {
        let fetcher = self.services.home_listing.clone();
        let request = self.request.clone();
        let session = self.services.session.state();
        tokio::spawn(async move { fetcher.fetch(&request, &session).await });
    }

    /// Overwrite only the search term of the active filter, then refetch.
    fn apply_search(&mut self) {
        let term = self.search.value().to_owned();
        self.request.max_items = if term.is_empty() {
            Some(RECENT_ITEMS_CAP)
        } else {
            None
        };
        self.request.filter.apply_search(term);
        self.refetch();
    }

    fn cycle_item_type(&mut self) {
        self.request.filter.item_type = match self.request.filter.item_type {
            None => Some(ItemType::Lost),
            Some(ItemType::Lost) => Some(ItemType::Found),
            Some(ItemType::Found) => None,
        };
        self.refetch();
    }

    fn cycle_category(&mut self) {
        let current = self
            .request
            .filter
            .category_id
            .as_deref()
            .and_then(|id| self.categories.iter().position(|c| c.id.to_string() == id));
        let next = match current {
            None => self.categories.first(),
            Some(idx) => self.categories.get(idx + 1),
        };
        self.request.filter.category_id = next.map(|c| c.id.to_string());
        self.refetch();
    }

    /// The reset affordance: clear every filter field and fetch once.
    /// Deliberately not a retry of the identical failed request.
    fn reset_filters(&mut self) {
        self.search = Input::default();
        self.request.filter.clear();
        self.request.max_items = Some(RECENT_ITEMS_CAP);
        self.refetch();
    }

    fn filter_summary(&self) -> Line<'static> {
        let mut spans = vec![Span::styled("Filters: ", theme::key_hint())];
        let type_label = match self.request.filter.item_type {
            None => "all".to_owned(),
            Some(t) => t.to_string(),
        };
        spans.push(Span::styled("t", theme::key_hint_key()));
        spans.push(Span::styled(format!(" type={type_label}  "), theme::key_hint()));

        let category_label = self
            .request
            .filter
            .category_id
            .as_deref()
            .and_then(|id| {
                self.categories
                    .iter()
                    .find(|c| c.id.to_string() == id)
                    .map(|c| c.name.clone())
            })
            .unwrap_or_else(|| "all".to_owned());
        spans.push(Span::styled("c", theme::key_hint_key()));
        spans.push(Span::styled(
            format!(" category={category_label}  "),
            theme::key_hint(),
        ));
        spans.push(Span::styled("r", theme::key_hint_key()));
        spans.push(Span::styled(" reset  ", theme::key_hint()));
        spans.push(Span::styled("/", theme::key_hint_key()));
        spans.push(Span::styled(" search  ", theme::key_hint()));
        spans.push(Span::styled("Enter", theme::key_hint_key()));
        spans.push(Span::styled(" open item", theme::key_hint()));
        Line::from(spans)
    }
}

impl Component for HomeScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_active {
            match key.code {
                KeyCode::Esc => self.search_active = false,
                KeyCode::Enter => {
                    self.search_active = false;
                    self.apply_search();
                }
                _ => {
                    self.search.handle_event(&crossterm::event::Event::Key(key));
                }
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.view.select_next(self.listing.items().len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.view.select_prev(),
            KeyCode::Char('t') => self.cycle_item_type(),
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('r') => self.reset_filters(),
            KeyCode::Char('l') => return Ok(Some(Action::SwitchScreen(crate::screen::ScreenId::Login))),
            KeyCode::Char('g') => {
                return Ok(Some(Action::SwitchScreen(crate::screen::ScreenId::Register)));
            }
            KeyCode::Enter => {
                if let Some(item) = self.view.selected_item(&self.listing) {
                    return Ok(Some(Action::OpenItem(item.id)));
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
            Action::HomeListingChanged(state) => {
                self.listing = state.clone();
                self.view.clamp(self.listing.items().len());
            }
            Action::CategoriesLoaded(categories) => {
                self.categories = Arc::clone(categories);
            }
            Action::ItemDeleted(_) | Action::ItemSaved(_) if self.focused => self.refetch(),
            _ => {}
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.refetch();
        }
    }

    fn wants_text_input(&self) -> bool {
        self.search_active
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [search_area, filter_area, listing_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .areas(area);

        // Search bar
        let border = if self.search_active {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let search_block = Block::default()
            .title(" Search ")
            .title_style(theme::form_label())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let search_inner = search_block.inner(search_area);
        frame.render_widget(search_block, search_area);
        frame.render_widget(
            Paragraph::new(self.search.value().to_owned()).style(theme::table_row()),
            search_inner,
        );
        if self.search_active {
            #[allow(clippy::cast_possible_truncation)]
            let cursor_x = search_inner.x + self.search.visual_cursor() as u16;
            frame.set_cursor_position((
                cursor_x.min(search_inner.right().saturating_sub(1)),
                search_inner.y,
            ));
        }

        frame.render_widget(Paragraph::new(self.filter_summary()), filter_area);

        let title = if self.request.filter.search.is_empty() {
            "Recently Posted Items".to_owned()
        } else {
            format!("Search Results for \"{}\"", self.request.filter.search)
        };
        self.view.render(frame, listing_area, &self.listing, &title);
    }

    fn id(&self) -> &str {
        "home"
    }
}

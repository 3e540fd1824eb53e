//! Item create/edit form, shared between the two screens.
//!
//! Client-side validation gates submission: per-field messages render
//! inline and nothing touches the network until the draft is sound.
//! Submission failures surface in a banner on both variants -- the create
//! form is deliberately not allowed to fail silently.

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

use findit_api::{Category, ImageAttachment, ItemType};
use findit_core::forms::{self, FieldErrors, ItemDraft};

use crate::action::Action;
use crate::component::Component;
use crate::services::Services;
use crate::theme;
use crate::widgets::form;

/// Which flavor of the form this instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    ItemType,
    Category,
    DateOccurred,
    Location,
    ImagePath,
    Resolved,
}

impl Field {
    fn all(mode: FormMode) -> &'static [Field] {
        match mode {
            FormMode::Create => &[
                Self::Title,
                Self::Description,
                Self::ItemType,
                Self::Category,
                Self::DateOccurred,
                Self::Location,
                Self::ImagePath,
            ],
            FormMode::Edit => &[
                Self::Title,
                Self::Description,
                Self::Category,
                Self::DateOccurred,
                Self::Location,
                Self::ImagePath,
                Self::Resolved,
            ],
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Self::Title | Self::Description | Self::DateOccurred | Self::Location | Self::ImagePath
        )
    }
}

pub struct ItemFormScreen {
    services: Services,
    action_tx: Option<UnboundedSender<Action>>,
    mode: FormMode,
    categories: Arc<Vec<Category>>,
    title: Input,
    description: Input,
    date_occurred: Input,
    location: Input,
    image_path: Input,
    item_type: ItemType,
    category_index: Option<usize>,
    /// Category id waiting to be resolved against a category list that
    /// hasn't arrived yet (edit prefill racing the category fetch).
    pending_category_id: Option<i64>,
    is_resolved: bool,
    focus: Field,
    errors: FieldErrors,
    banner: Option<String>,
    submitting: bool,
    /// Edit mode: the item being edited, once loaded.
    edit_id: Option<i64>,
    loading_target: bool,
    focused: bool,
}

impl ItemFormScreen {
    pub fn new(services: Services, mode: FormMode) -> Self {
        Self {
            services,
            action_tx: None,
            mode,
            categories: Arc::new(Vec::new()),
            title: Input::default(),
            description: Input::default(),
            date_occurred: Input::default(),
            location: Input::default(),
            image_path: Input::default(),
            item_type: ItemType::Lost,
            category_index: None,
            pending_category_id: None,
            is_resolved: false,
            focus: Field::Title,
            errors: FieldErrors::default(),
            banner: None,
            submitting: false,
            edit_id: None,
            loading_target: false,
            focused: false,
        }
    }

    fn clear_form(&mut self) {
        self.title = Input::default();
        self.description = Input::default();
        self.date_occurred = Input::default();
        self.location = Input::default();
        self.image_path = Input::default();
        self.item_type = ItemType::Lost;
        self.category_index = None;
        self.pending_category_id = None;
        self.is_resolved = false;
        self.focus = Field::Title;
        self.errors = FieldErrors::default();
        self.banner = None;
    }

    fn prefill(&mut self, draft: &ItemDraft) {
        self.title = Input::new(draft.title.clone());
        self.description = Input::new(draft.description.clone());
        self.date_occurred = Input::new(draft.date_occurred.clone());
        self.location = Input::new(draft.location.clone());
        self.image_path = Input::default();
        self.item_type = draft.item_type;
        self.category_index = draft
            .category_id
            .and_then(|id| self.categories.iter().position(|c| c.id == id));
        self.pending_category_id = if self.category_index.is_none() {
            draft.category_id
        } else {
            None
        };
        self.is_resolved = draft.is_resolved;
    }

    fn draft(&self) -> Result<ItemDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        // A bad image path lands in `errors` alongside the field checks.
        let image = self.load_image(&mut errors);

        let draft = ItemDraft {
            title: self.title.value().to_owned(),
            description: self.description.value().to_owned(),
            item_type: self.item_type,
            category_id: self
                .category_index
                .and_then(|i| self.categories.get(i))
                .map(|c| c.id),
            date_occurred: self.date_occurred.value().to_owned(),
            location: self.location.value().to_owned(),
            is_resolved: self.is_resolved,
            image,
        };

        match draft.validate() {
            Ok(()) if errors.is_empty() => Ok(draft),
            Ok(()) => Err(errors),
            Err(field_errors) => Err(errors.merged(field_errors)),
        }
    }

    fn load_image(&self, errors: &mut FieldErrors) -> Option<ImageAttachment> {
        let path = self.image_path.value().trim();
        if path.is_empty() {
            return None;
        }
        match std::fs::read(path) {
            Ok(bytes) => {
                let filename = std::path::Path::new(path)
                    .file_name()
                    .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
                Some(ImageAttachment { filename, bytes })
            }
            Err(e) => {
                errors.set("image", format!("Could not read image file: {e}"));
                None
            }
        }
    }

    fn submit(&mut self) {
        match self.draft() {
            Err(errors) => {
                self.errors = errors;
            }
            Ok(draft) => {
                self.errors = FieldErrors::default();
                self.banner = None;
                self.submitting = true;

                let Some(tx) = self.action_tx.clone() else {
                    return;
                };
                let api = Arc::clone(&self.services.api);
                let notifier = self.services.notifier.clone();
                let mode = self.mode;
                let edit_id = self.edit_id;
                tokio::spawn(async move {
                    let outcome = match (mode, edit_id) {
                        (FormMode::Create, _) => forms::submit_create(&api, &draft)
                            .await
                            .map(|item| (item.id, "Item posted!")),
                        (FormMode::Edit, Some(id)) => forms::submit_update(&api, id, &draft)
                            .await
                            .map(|()| (id, "Item updated")),
                        (FormMode::Edit, None) => return,
                    };
                    match outcome {
                        Ok((id, message)) => {
                            notifier.success(message);
                            let _ = tx.send(Action::ItemSaved(id));
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "item submission failed");
                            let _ = tx.send(Action::ItemSaveFailed(
                                "Failed to save item. Please try again.".into(),
                            ));
                        }
                    }
                });
            }
        }
    }

    fn load_edit_target(&mut self, id: i64) {
        self.clear_form();
        self.edit_id = Some(id);
        self.loading_target = true;

        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let api = Arc::clone(&self.services.api);
        tokio::spawn(async move {
            match api.get_item(id).await {
                Ok(item) => {
                    let _ = tx.send(Action::EditTargetLoaded(item));
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "edit target fetch failed");
                    let _ = tx.send(Action::ItemLoadFailed("Failed to load item data".into()));
                }
            }
        });
    }

    fn cycle_focus(&mut self, backwards: bool) {
        let order = Field::all(self.mode);
        let idx = order.iter().position(|&f| f == self.focus).unwrap_or(0);
        let next = if backwards {
            (idx + order.len() - 1) % order.len()
        } else {
            (idx + 1) % order.len()
        };
        self.focus = order[next];
    }

    fn cycle_choice(&mut self) {
        match self.focus {
            Field::ItemType => {
                self.item_type = match self.item_type {
                    ItemType::Lost => ItemType::Found,
                    ItemType::Found => ItemType::Lost,
                };
            }
            Field::Category => {
                self.category_index = match self.category_index {
                    None if self.categories.is_empty() => None,
                    None => Some(0),
                    Some(i) if i + 1 < self.categories.len() => Some(i + 1),
                    Some(_) => None,
                };
            }
            Field::Resolved => self.is_resolved = !self.is_resolved,
            _ => {}
        }
    }
}

impl Component for ItemFormScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting || self.loading_target {
            if key.code == KeyCode::Esc {
                return Ok(Some(Action::GoBack));
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.cycle_focus(false),
            KeyCode::BackTab | KeyCode::Up => self.cycle_focus(true),
            KeyCode::Esc => return Ok(Some(Action::GoBack)),
            KeyCode::Char(' ') if !self.focus.is_text() => self.cycle_choice(),
            _ if self.focus.is_text() => {
                let event = crossterm::event::Event::Key(key);
                match self.focus {
                    Field::Title => self.title.handle_event(&event),
                    Field::Description => self.description.handle_event(&event),
                    Field::DateOccurred => self.date_occurred.handle_event(&event),
                    Field::Location => self.location.handle_event(&event),
                    Field::ImagePath => self.image_path.handle_event(&event),
                    _ => None,
                };
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CategoriesLoaded(categories) => {
                self.categories = Arc::clone(categories);
                if let Some(id) = self.pending_category_id.take() {
                    self.category_index = self.categories.iter().position(|c| c.id == id);
                }
            }
            Action::OpenEditItem(id) if self.mode == FormMode::Edit => {
                self.load_edit_target(*id);
            }
            Action::EditTargetLoaded(item) if self.mode == FormMode::Edit => {
                self.loading_target = false;
                let draft = ItemDraft::from_item(item);
                self.prefill(&draft);
            }
            Action::ItemLoadFailed(message) if self.focused && self.mode == FormMode::Edit => {
                self.loading_target = false;
                self.banner = Some(message.clone());
            }
            Action::ItemSaved(_) if self.focused => {
                self.submitting = false;
                if self.mode == FormMode::Create {
                    self.clear_form();
                }
            }
            Action::ItemSaveFailed(message) if self.focused => {
                self.submitting = false;
                self.banner = Some(message.clone());
            }
            _ => {}
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused && self.mode == FormMode::Create {
            self.errors = FieldErrors::default();
            self.banner = None;
        }
    }

    fn wants_text_input(&self) -> bool {
        self.focus.is_text() && !self.submitting && !self.loading_target
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.mode {
            FormMode::Create => " Post an Item ",
            FormMode::Edit => " Edit Item ",
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading_target {
            frame.render_widget(
                Paragraph::new("Loading item...").style(theme::table_row()),
                inner,
            );
            return;
        }

        let [banner_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(inner);

        if let Some(ref message) = self.banner {
            frame.render_widget(
                Paragraph::new(Line::from(message.clone())).style(theme::error_banner()),
                banner_area,
            );
        }

        // Two columns of fields.
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body_area);
        let left_slots: [Rect; 4] = Layout::vertical([
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
        ])
        .areas(left);
        let right_slots: [Rect; 4] = Layout::vertical([
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
        ])
        .areas(right);

        form::render_text_field(
            frame,
            left_slots[0],
            "Title",
            &self.title,
            self.focus == Field::Title,
            false,
            self.errors.get("title"),
        );
        form::render_text_field(
            frame,
            left_slots[1],
            "Description",
            &self.description,
            self.focus == Field::Description,
            false,
            self.errors.get("description"),
        );
        form::render_text_field(
            frame,
            left_slots[2],
            "Date occurred (YYYY-MM-DD)",
            &self.date_occurred,
            self.focus == Field::DateOccurred,
            false,
            self.errors.get("date_occurred"),
        );
        form::render_text_field(
            frame,
            left_slots[3],
            "Location",
            &self.location,
            self.focus == Field::Location,
            false,
            self.errors.get("location"),
        );

        let mut right_idx = 0;
        if self.mode == FormMode::Create {
            form::render_choice_field(
                frame,
                right_slots[right_idx],
                "Type",
                &self.item_type.to_string(),
                "(space to toggle)",
                self.focus == Field::ItemType,
                None,
            );
            right_idx += 1;
        }
        let category_label = self
            .category_index
            .and_then(|i| self.categories.get(i))
            .map_or_else(|| "— select —".to_owned(), |c| c.name.clone());
        form::render_choice_field(
            frame,
            right_slots[right_idx],
            "Category",
            &category_label,
            "(space to cycle)",
            self.focus == Field::Category,
            self.errors.get("category"),
        );
        right_idx += 1;
        form::render_text_field(
            frame,
            right_slots[right_idx],
            "Image file (optional)",
            &self.image_path,
            self.focus == Field::ImagePath,
            false,
            self.errors.get("image"),
        );
        right_idx += 1;
        if self.mode == FormMode::Edit {
            form::render_choice_field(
                frame,
                right_slots[right_idx],
                "Status",
                if self.is_resolved { "Resolved" } else { "Open" },
                "(space to toggle)",
                self.focus == Field::Resolved,
                None,
            );
        }

        let footer = if self.submitting {
            Line::from(Span::styled("Saving...", theme::key_hint()))
        } else {
            Line::from(vec![
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" save   ", theme::key_hint()),
                Span::styled("Tab", theme::key_hint_key()),
                Span::styled(" next field   ", theme::key_hint()),
                Span::styled("Space", theme::key_hint_key()),
                Span::styled(" toggle choice   ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" cancel", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(footer), footer_area);
    }

    fn id(&self) -> &str {
        match self.mode {
            FormMode::Create => "create-item",
            FormMode::Edit => "edit-item",
        }
    }
}

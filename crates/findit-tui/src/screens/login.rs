//! Sign-in form.
//!
//! Validation runs before any network call; an invalid form never leaves
//! the terminal. Submission failures land in the session store's
//! `last_error` and render as a banner here, so the user stays on the form.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::SecretString;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use findit_core::{FieldErrors, LoginForm, SessionState};

use crate::action::Action;
use crate::component::Component;
use crate::services::Services;
use crate::theme;
use crate::widgets::form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

pub struct LoginScreen {
    services: Services,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionState,
    username: Input,
    password: Input,
    focus: Field,
    errors: FieldErrors,
}

impl LoginScreen {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            action_tx: None,
            session: SessionState::default(),
            username: Input::default(),
            password: Input::default(),
            focus: Field::Username,
            errors: FieldErrors::default(),
        }
    }

    fn submit(&mut self) {
        let form = LoginForm {
            username: self.username.value().to_owned(),
            password: self.password.value().to_owned(),
        };

        match form.validate() {
            Err(errors) => {
                // Invalid input never reaches the network.
                self.errors = errors;
            }
            Ok(()) => {
                self.errors = FieldErrors::default();
                self.services.session.clear_error();

                let Some(tx) = self.action_tx.clone() else {
                    return;
                };
                let session = self.services.session.clone();
                let password: SecretString = form.password.into();
                tokio::spawn(async move {
                    if session.login(&form.username, &password).await.is_ok() {
                        let _ = tx.send(Action::SignedIn);
                    }
                    // Failure stays on the form; the session store already
                    // recorded last_error and posted the notification.
                });
            }
        }
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Submit controls are disabled while a call is in flight.
        let busy = self.session.loading;
        if key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            && key.code == KeyCode::Char('r')
        {
            return Ok(Some(Action::SwitchScreen(crate::screen::ScreenId::Register)));
        }
        match key.code {
            KeyCode::Enter if !busy => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.next_field(),
            KeyCode::Esc => return Ok(Some(Action::GoBack)),
            _ if !busy => {
                let event = crossterm::event::Event::Key(key);
                match self.focus {
                    Field::Username => {
                        self.username.handle_event(&event);
                    }
                    Field::Password => {
                        self.password.handle_event(&event);
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SessionChanged(state) = action {
            self.session = state.clone();
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        if focused {
            // A fresh visit starts from a clean form.
            self.errors = FieldErrors::default();
            self.services.session.clear_error();
        }
    }

    fn wants_text_input(&self) -> bool {
        true
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 52_u16.min(area.width.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let panel = Rect::new(x, area.y + 2, width, area.height.saturating_sub(4).min(18));

        let block = Block::default()
            .title(" Sign In ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [banner_area, username_area, password_area, footer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Length(form::FIELD_HEIGHT),
            Constraint::Min(2),
        ])
        .areas(inner);

        // Server-side failure banner (wrong credentials, etc.)
        if let Some(ref message) = self.session.last_error {
            frame.render_widget(
                Paragraph::new(Line::from(message.clone())).style(theme::error_banner()),
                banner_area,
            );
        }

        form::render_text_field(
            frame,
            username_area,
            "Username",
            &self.username,
            self.focus == Field::Username,
            false,
            self.errors.get("username"),
        );
        form::render_text_field(
            frame,
            password_area,
            "Password",
            &self.password,
            self.focus == Field::Password,
            true,
            self.errors.get("password"),
        );

        let footer = if self.session.loading {
            Line::from(Span::styled("Signing in...", theme::key_hint()))
        } else {
            Line::from(vec![
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" sign in   ", theme::key_hint()),
                Span::styled("Tab", theme::key_hint_key()),
                Span::styled(" next field   ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" back   ", theme::key_hint()),
                Span::styled("Ctrl+R", theme::key_hint_key()),
                Span::styled(" create account", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(footer), footer_area);
    }

    fn id(&self) -> &str {
        "login"
    }
}

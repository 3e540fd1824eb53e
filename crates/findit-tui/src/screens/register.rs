//! Account creation form. Same submission contract as sign-in: local
//! validation first, server failures stay on the form, a successful
//! registration is already an authenticated session.

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

use findit_core::{FieldErrors, RegisterForm, SessionState};

use crate::action::Action;
use crate::component::Component;
use crate::services::Services;
use crate::theme;
use crate::widgets::form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    const ALL: [Field; 4] = [
        Self::Username,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
    ];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct RegisterScreen {
    services: Services,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionState,
    username: Input,
    email: Input,
    password: Input,
    confirm_password: Input,
    focus: Field,
    errors: FieldErrors,
}

impl RegisterScreen {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            action_tx: None,
            session: SessionState::default(),
            username: Input::default(),
            email: Input::default(),
            password: Input::default(),
            confirm_password: Input::default(),
            focus: Field::Username,
            errors: FieldErrors::default(),
        }
    }

    fn submit(&mut self) {
        let form = RegisterForm {
            username: self.username.value().to_owned(),
            email: self.email.value().to_owned(),
            password: self.password.value().to_owned(),
            confirm_password: self.confirm_password.value().to_owned(),
        };

        match form.validate() {
            Err(errors) => {
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
                    if session
                        .register(&form.username, &form.email, &password)
                        .await
                        .is_ok()
                    {
                        let _ = tx.send(Action::SignedIn);
                    }
                });
            }
        }
    }

    fn active_input(&mut self) -> &mut Input {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        }
    }
}

impl Component for RegisterScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let busy = self.session.loading;
        match key.code {
            KeyCode::Enter if !busy => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Esc => return Ok(Some(Action::GoBack)),
            _ if !busy => {
                let event = crossterm::event::Event::Key(key);
                self.active_input().handle_event(&event);
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
        let panel = Rect::new(
            x,
            area.y + 1,
            width,
            area.height.saturating_sub(2).min(26),
        );

        let block = Block::default()
            .title(" Create an Account ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [banner_area, username_area, email_area, password_area, confirm_area, footer_area] =
            Layout::vertical([
                Constraint::Length(2),
                Constraint::Length(form::FIELD_HEIGHT),
                Constraint::Length(form::FIELD_HEIGHT),
                Constraint::Length(form::FIELD_HEIGHT),
                Constraint::Length(form::FIELD_HEIGHT),
                Constraint::Min(1),
            ])
            .areas(inner);

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
            email_area,
            "Email",
            &self.email,
            self.focus == Field::Email,
            false,
            self.errors.get("email"),
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
        form::render_text_field(
            frame,
            confirm_area,
            "Confirm Password",
            &self.confirm_password,
            self.focus == Field::ConfirmPassword,
            true,
            self.errors.get("confirm_password"),
        );

        let footer = if self.session.loading {
            Line::from(Span::styled("Creating account...", theme::key_hint()))
        } else {
            Line::from(vec![
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" register   ", theme::key_hint()),
                Span::styled("Tab", theme::key_hint_key()),
                Span::styled(" next field   ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" back", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(footer), footer_area);
    }

    fn id(&self) -> &str {
        "register"
    }
}

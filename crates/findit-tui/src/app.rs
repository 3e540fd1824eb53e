//! Application core -- event loop, screen management, action dispatch.
//!
//! Navigation goes through the route guards: every `SwitchScreen` to a
//! guarded screen is evaluated against the current session, and every
//! session change re-evaluates the active screen, so a logout while a
//! guarded screen is showing redirects immediately.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use findit_core::{GuardOutcome, Notification, Redirect, SessionState, guard};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::services::Services;
use crate::session_bridge::run_session_bridge;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::toasts::render_toasts;

/// Top-level application state and event loop.
pub struct App {
    services: Services,
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Latest session snapshot, for guard evaluation and the status bar.
    session: SessionState,
    /// Latest toast queue snapshot.
    toasts: Arc<Vec<Notification>>,
    /// Navigation deferred while the session bootstrap is still resolving.
    pending_nav: Option<ScreenId>,
    /// Where a successful sign-in should land (the guarded screen the
    /// user originally tried to reach).
    return_to: Option<ScreenId>,
    /// Action sender -- components dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver -- main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(services: Services) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&services).into_iter().collect();

        Self {
            services,
            active_screen: ScreenId::Home,
            previous_screen: None,
            screens,
            running: true,
            session: SessionState::default(),
            toasts: Arc::new(Vec::new()),
            pending_nav: None,
            return_to: None,
            action_tx,
            action_rx,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Bridge task: session, toasts, and listing watches → actions.
        // It also performs the one-time session bootstrap.
        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(run_session_bridge(
            self.services.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        // One-shot category load for the filter bar and item forms.
        {
            let api = Arc::clone(&self.services.api);
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                match api.list_categories().await {
                    Ok(categories) => {
                        let _ = tx.send(Action::CategoriesLoaded(Arc::new(categories)));
                    }
                    Err(e) => tracing::warn!(error = %e, "category fetch failed"),
                }
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        let _ = bridge.await;
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Control-modified keys are global;
    /// printable globals apply only when the active screen isn't typing.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => {
                if let Some(first) = self.toasts.first() {
                    return Ok(Some(Action::DismissToast(first.id)));
                }
                return Ok(None);
            }
            _ => {}
        }

        let typing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.wants_text_input());

        if !typing {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                    let n = c as u8 - b'0';
                    if let Some(screen) = ScreenId::from_number(n) {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
                }
                (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                _ => {}
            }
        }

        // Delegate to the active screen component. Screens return GoBack
        // themselves where Esc means "leave this screen".
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action -- update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(_, _) | Action::Render => {}

            Action::Tick => {
                // Spinners only animate on the visible screen.
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::SwitchScreen(target) => self.navigate(*target),

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::SessionChanged(state) => {
                self.session = state.clone();

                // Deferred navigation resolves once the bootstrap finishes.
                if !state.loading {
                    if let Some(pending) = self.pending_nav.take() {
                        self.navigate(pending);
                    }
                }

                // Re-evaluate the active screen's guard on every session
                // change (e.g. logout while a guarded screen is showing).
                if let Some(policy) = self.active_screen.access_policy() {
                    match guard::evaluate(policy, &self.session, self.active_screen.route()) {
                        GuardOutcome::Denied(Redirect::Login { return_to }) => {
                            self.return_to = ScreenId::from_route(&return_to);
                            self.activate(ScreenId::Login);
                        }
                        GuardOutcome::Denied(Redirect::Home) => self.activate(ScreenId::Home),
                        GuardOutcome::Checking | GuardOutcome::Allowed => {}
                    }
                }

                self.broadcast(action)?;
            }

            Action::ToastsChanged(toasts) => {
                self.toasts = Arc::clone(toasts);
            }

            Action::DismissToast(id) => {
                self.services.notifier.dismiss(*id);
            }

            Action::RequestLogout => {
                let session = self.services.session.clone();
                tokio::spawn(async move { session.logout().await });
            }

            Action::SignedIn => {
                // The store already holds the fresh user; don't wait for the
                // bridge's SessionChanged to arrive before navigating, or
                // the guard would judge against the stale snapshot.
                self.session = self.services.session.state();
                let target = self.return_to.take().unwrap_or(ScreenId::Home);
                self.navigate(target);
            }

            Action::OpenItem(_) => {
                self.navigate(ScreenId::ItemDetail);
                self.broadcast(action)?;
            }

            Action::OpenEditItem(_) => {
                self.navigate(ScreenId::EditItem);
                self.broadcast(action)?;
            }

            Action::ItemSaved(id) => {
                self.broadcast(action)?;
                self.action_tx.send(Action::OpenItem(*id))?;
            }

            // Everything else fans out to the screens.
            other => self.broadcast(other)?,
        }

        Ok(())
    }

    /// Forward an action to every screen, queueing any follow-ups.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Navigate to `target`, honoring its access policy.
    fn navigate(&mut self, target: ScreenId) {
        let decision = target.access_policy().map_or(GuardOutcome::Allowed, |policy| {
            guard::evaluate(policy, &self.session, target.route())
        });

        match decision {
            GuardOutcome::Allowed => self.activate(target),
            GuardOutcome::Checking => {
                // Session bootstrap still in flight -- finish the navigation
                // when it resolves instead of redirecting prematurely.
                debug!("deferring navigation to {target} until session resolves");
                self.pending_nav = Some(target);
            }
            GuardOutcome::Denied(Redirect::Login { return_to }) => {
                self.return_to = ScreenId::from_route(&return_to);
                self.activate(ScreenId::Login);
            }
            GuardOutcome::Denied(Redirect::Home) => self.activate(ScreenId::Home),
        }
    }

    fn activate(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Toasts draw on top of everything.
        render_toasts(frame, content_area, &self.toasts);
    }

    /// Render the bottom tab bar.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar with the session state and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let session_indicator = if self.session.loading {
            Span::styled("◐ checking session", Style::default().fg(theme::ACCENT_AMBER))
        } else {
            match self.session.user {
                Some(ref user) if user.is_admin => Span::styled(
                    format!("● {} (admin)", user.username),
                    Style::default().fg(theme::ACCENT_AMBER),
                ),
                Some(ref user) => Span::styled(
                    format!("● {}", user.username),
                    Style::default().fg(theme::SUCCESS_GREEN),
                ),
                None => Span::styled("○ guest", theme::key_hint()),
            }
        };

        let hints = Span::styled(" │ 1-4 screens  Tab cycle  q quit", theme::key_hint());

        let line = Line::from(vec![Span::raw(" "), session_indicator, hints]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

//! The desktop front end: owns the window manager, routes input to the
//! interaction handler or the focused window, and draws everything.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::clipboard;
use crate::components::{
    AboutComponent, Component, ComponentContext, Dock, DockEntry, DockTarget, ProjectsComponent,
    StatusBar, TerminalComponent,
};
use crate::config::ShellConfig;
use crate::constants::{APP_ABOUT, APP_PROJECTS, APP_TERMINAL, NOTICE_DURATION};
use crate::event_loop::ControlFlow;
use crate::keybindings::{Action, KeyBindings};
use crate::prefs::{PreferenceStore, Preferences};
use crate::projects::ProjectSource;
use crate::terminal::{Effect, SessionProfile, TerminalSession};
use crate::theme::Theme;
use crate::ui::UiFrame;
use crate::window::decorator::{OpenStepDecorator, WindowChrome, WindowDecorator};
use crate::window::interaction::hit_test;
use crate::window::{
    ActionQueue, DesktopMetrics, Geometry, HitTarget, InteractionTracker, WindowId, WindowManager,
    WmAction,
};

/// What a window hosts.
#[derive(Debug)]
pub enum AppContent {
    Terminal(TerminalComponent),
    Projects(ProjectsComponent),
    About(AboutComponent),
}

impl AppContent {
    pub fn component_mut(&mut self) -> &mut dyn Component {
        match self {
            AppContent::Terminal(c) => c,
            AppContent::Projects(c) => c,
            AppContent::About(c) => c,
        }
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        match self {
            AppContent::Terminal(c) => c.take_effects(),
            AppContent::Projects(c) => c.take_effects(),
            AppContent::About(_) => Vec::new(),
        }
    }

    pub fn terminal(&self) -> Option<&TerminalComponent> {
        match self {
            AppContent::Terminal(c) => Some(c),
            _ => None,
        }
    }

    pub fn terminal_mut(&mut self) -> Option<&mut TerminalComponent> {
        match self {
            AppContent::Terminal(c) => Some(c),
            _ => None,
        }
    }
}

pub struct Desktop {
    wm: WindowManager<AppContent>,
    queue: ActionQueue<AppContent>,
    tracker: InteractionTracker,
    decorator: Box<dyn WindowDecorator>,
    bindings: KeyBindings,
    profile: SessionProfile,
    projects: Arc<dyn ProjectSource>,
    prefs: Preferences,
    store: Box<dyn PreferenceStore>,
    theme: Theme,
    menu: StatusBar,
    dock: Dock,
    open_browser: bool,
    notice: Option<(String, Instant)>,
}

impl Desktop {
    /// Build the desktop for a `width` x `height` cell screen. Opens a
    /// terminal, and the about window unless the user turned it off.
    pub fn new(
        config: &ShellConfig,
        store: Box<dyn PreferenceStore>,
        width: u16,
        height: u16,
    ) -> Self {
        let prefs = Preferences::load(store.as_ref());
        let mut desktop = Self {
            wm: WindowManager::new(DesktopMetrics::for_cells(width, height)),
            queue: ActionQueue::new(),
            tracker: InteractionTracker::new(),
            decorator: Box::new(OpenStepDecorator),
            bindings: KeyBindings::default(),
            profile: config.profile.clone(),
            projects: Arc::new(config.projects.clone()),
            prefs,
            store,
            theme: prefs.theme.palette(),
            menu: StatusBar::new(),
            dock: Dock::new(),
            open_browser: config.open_browser,
            notice: None,
        };
        desktop.open_app(APP_TERMINAL);
        if !prefs.skip_welcome {
            desktop.open_app(APP_ABOUT);
        }
        tracing::info!(
            width,
            height,
            theme = %prefs.theme,
            windows = desktop.wm.len(),
            "desktop ready"
        );
        desktop
    }

    pub fn window_manager(&self) -> &WindowManager<AppContent> {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut WindowManager<AppContent> {
        &mut self.wm
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(text, _)| text.as_str())
    }

    /// Open a window of `app_type`. Projects and about are single-instance:
    /// asking again brings the existing window back.
    pub fn open_app(&mut self, app_type: &str) -> Option<WindowId> {
        let existing = if app_type == APP_TERMINAL {
            None
        } else {
            self.wm
                .windows()
                .find(|w| w.app_type == app_type)
                .map(|w| w.id)
        };
        if let Some(id) = existing {
            self.wm.restore(id);
            return Some(id);
        }
        let (title, content) = match app_type {
            APP_TERMINAL => {
                let session = TerminalSession::new(self.profile.clone(), Arc::clone(&self.projects));
                let title = format!("{}@{}", self.profile.username, self.profile.hostname);
                (title, AppContent::Terminal(TerminalComponent::new(session)))
            }
            APP_PROJECTS => (
                "Projects".to_string(),
                AppContent::Projects(ProjectsComponent::new(Arc::clone(&self.projects))),
            ),
            APP_ABOUT => (
                "About".to_string(),
                AppContent::About(AboutComponent::new(
                    &self.bindings,
                    self.prefs.skip_welcome,
                )),
            ),
            other => {
                tracing::warn!(app_type = %other, "unknown app type");
                self.set_notice(format!("Unknown application '{other}'"));
                return None;
            }
        };
        Some(self.wm.open(app_type, title, content))
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let flow = match event {
            Event::Resize(width, height) => {
                self.tracker.release_all();
                self.queue.push(WmAction::SetMetrics(DesktopMetrics::for_cells(
                    *width, *height,
                )));
                ControlFlow::Continue
            }
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                ControlFlow::Continue
            }
            Event::Paste(_) => {
                if let Some(id) = self.visible_active() {
                    self.forward(id, event);
                }
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.queue.drain_into(&mut self.wm);
        flow
    }

    /// Advance every terminal's status timers and expire the notice.
    pub fn tick(&mut self, now: Instant) {
        for (_, content) in self.wm.payloads_mut() {
            if let Some(term) = content.terminal_mut() {
                term.tick(now);
            }
        }
        if self.notice.as_ref().is_some_and(|(_, until)| *until <= now) {
            self.notice = None;
        }
    }

    pub fn run_action(&mut self, action: Action) -> ControlFlow {
        tracing::debug!(?action, "desktop action");
        let active = self.wm.active();
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::NewTerminal => {
                self.open_app(APP_TERMINAL);
            }
            Action::OpenProjects => {
                self.open_app(APP_PROJECTS);
            }
            Action::OpenAbout => {
                self.open_app(APP_ABOUT);
            }
            Action::CloseWindow => {
                if let Some(id) = active {
                    self.queue.push(WmAction::Close(id));
                }
            }
            Action::CycleNextWindow => self.wm.cycle_focus(true),
            Action::CyclePrevWindow => self.wm.cycle_focus(false),
            Action::MinimizeWindow => {
                if let Some(id) = active {
                    self.queue.push(WmAction::SetMinimized(id, true));
                }
            }
            Action::MaximizeWindow => {
                if let Some(id) = active {
                    self.queue.push(WmAction::ToggleMaximize(id));
                }
            }
            Action::RestoreWindows => {
                let minimized: Vec<WindowId> = self
                    .wm
                    .windows()
                    .filter(|w| w.minimized)
                    .map(|w| w.id)
                    .collect();
                for id in minimized {
                    self.wm.restore(id);
                }
            }
            Action::ToggleTheme => {
                self.prefs.theme = self.prefs.theme.toggled();
                self.theme = self.prefs.theme.palette();
                self.save_prefs();
            }
            Action::CopyTranscript => self.copy_transcript(),
        }
        ControlFlow::Continue
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        if key.kind == KeyEventKind::Release {
            return ControlFlow::Continue;
        }
        if let Some(action) = self.bindings.action_for_key(key) {
            return self.run_action(action);
        }
        if let Some(id) = self.visible_active() {
            self.forward(id, &Event::Key(*key));
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(mouse),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((id, _)) = self.tracker.active() {
                    self.tracker.pointer_move(&mut self.wm, id, x, y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some((id, _)) = self.tracker.active() {
                    self.tracker.pointer_up(id);
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(id) = self.wm.window_at(x, y) {
                    self.forward(id, &Event::Mouse(*mouse));
                }
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, mouse: &MouseEvent) {
        let metrics = *self.wm.metrics();
        if u32::from(mouse.row) + 1 >= u32::from(metrics.viewport_height) {
            if let Some(target) = self.dock.target_at(mouse.column, mouse.row) {
                self.activate_dock(target);
            }
            return;
        }
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
        let Some(id) = self.wm.window_at(x, y) else {
            return;
        };
        self.wm.focus(id);
        let target = self
            .wm
            .get(id)
            .and_then(|window| hit_test(window, &metrics, x, y));
        match target {
            Some(HitTarget::TitleBar) => {
                self.tracker.begin_drag(&self.wm, id, x, y);
            }
            Some(HitTarget::ResizeHandle) => {
                self.tracker.begin_resize(&self.wm, id, x, y);
            }
            Some(HitTarget::CloseButton) => self.queue.push(WmAction::Close(id)),
            Some(HitTarget::MinimizeButton) => self.queue.push(WmAction::SetMinimized(id, true)),
            Some(HitTarget::MaximizeButton) => self.queue.push(WmAction::ToggleMaximize(id)),
            Some(HitTarget::Body) | None => self.forward(id, &Event::Mouse(*mouse)),
        }
    }

    fn activate_dock(&mut self, target: DockTarget) {
        match target {
            DockTarget::Launch(app_type) => {
                self.open_app(app_type);
            }
            DockTarget::Window(id) => {
                let showing = self.wm.active() == Some(id)
                    && self.wm.get(id).is_some_and(|w| !w.minimized);
                if showing {
                    self.wm.set_minimized(id, true);
                } else {
                    self.wm.restore(id);
                }
            }
        }
    }

    fn visible_active(&self) -> Option<WindowId> {
        self.wm
            .active()
            .filter(|id| self.wm.get(*id).is_some_and(|w| !w.minimized))
    }

    /// Hand `event` to the window's component, then act on whatever it asked
    /// the host to do.
    fn forward(&mut self, id: WindowId, event: &Event) {
        let ctx = ComponentContext::new(self.wm.active() == Some(id), self.theme);
        let Some(content) = self.wm.payload_mut(id) else {
            return;
        };
        content.component_mut().handle_event(event, &ctx);
        let effects = content.take_effects();
        let skip_welcome = match content {
            AppContent::About(about) => Some(about.skip_welcome()),
            _ => None,
        };
        if let Some(skip) = skip_welcome
            && skip != self.prefs.skip_welcome
        {
            self.prefs.skip_welcome = skip;
            self.save_prefs();
        }
        for effect in effects {
            self.apply_effect(id, effect);
        }
    }

    fn apply_effect(&mut self, source: WindowId, effect: Effect) {
        match effect {
            Effect::OpenUrl(url) => self.open_url(&url),
            Effect::OpenWindow(app_type) => {
                self.open_app(&app_type);
            }
            Effect::Logout => {
                tracing::info!(window_id = %source, "terminal logged out");
                self.queue.push(WmAction::Close(source));
            }
        }
    }

    fn open_url(&mut self, url: &str) {
        if !self.open_browser {
            tracing::info!(%url, "browser disabled, not opening link");
            self.set_notice(format!("Link: {url}"));
            return;
        }
        match webbrowser::open(url) {
            Ok(()) => {
                tracing::info!(%url, "opened link");
                self.set_notice(format!("Opened {url}"));
            }
            Err(err) => {
                tracing::warn!(%url, %err, "failed to open link");
                self.set_notice(format!("Could not open {url}"));
            }
        }
    }

    fn copy_transcript(&mut self) {
        let transcript = self
            .visible_active()
            .and_then(|id| self.wm.get(id))
            .and_then(|w| w.payload.terminal())
            .map(|term| term.session().transcript());
        let Some(transcript) = transcript else {
            self.set_notice("Focus a terminal to copy its transcript");
            return;
        };
        match clipboard::copy_text(&transcript) {
            Ok(()) => self.set_notice("Transcript copied to clipboard"),
            Err(err) => {
                tracing::warn!(%err, "clipboard copy failed");
                self.set_notice(format!("Copy failed: {err}"));
            }
        }
    }

    fn save_prefs(&mut self) {
        if let Err(err) = self.prefs.save(self.store.as_mut()) {
            tracing::warn!(%err, "failed to save preferences");
            self.set_notice("Preferences could not be saved");
        }
    }

    fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some((text.into(), Instant::now() + NOTICE_DURATION));
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = self.theme;
        frame.fill(area, Style::default().bg(theme.desktop_bg));

        let metrics = *self.wm.metrics();
        let active = self.wm.active();
        let stack: Vec<(WindowId, Geometry, String, bool)> = self
            .wm
            .windows_by_z()
            .into_iter()
            .filter(|w| !w.minimized)
            .map(|w| (w.id, w.geometry, w.title.clone(), w.maximized))
            .collect();
        // painter's order: later windows cover earlier ones
        for (id, geometry, title, maximized) in stack {
            let focused = active == Some(id);
            let chrome = WindowChrome {
                geometry,
                title: &title,
                focused,
                maximized,
            };
            let content_area = self.decorator.render_window(frame, chrome, &metrics, &theme);
            if let Some(content) = self.wm.payload_mut(id) {
                let ctx = ComponentContext::new(focused, theme);
                content.component_mut().render(frame, content_area, &ctx);
            }
        }

        let ctx = ComponentContext::new(false, theme);
        self.refresh_bars();
        self.menu
            .set_style(Style::default().fg(theme.menu_fg).bg(theme.menu_bg));
        self.menu
            .render(frame, Rect::new(area.x, area.y, area.width, 1), &ctx);
        let dock_row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        self.dock.render(frame, dock_row, &ctx);
    }

    fn refresh_bars(&mut self) {
        let active = self.wm.active().and_then(|id| self.wm.get(id));
        let title = active.map_or("Desktop", |w| w.title.as_str());
        self.menu
            .set_left(format!(" {} │ {title}", env!("CARGO_PKG_NAME")));
        let right = match &self.notice {
            Some((text, _)) => format!("{text} "),
            None => format!("{} ", chrono::Local::now().format("%a %H:%M")),
        };
        self.menu.set_right(right);

        let status = active
            .filter(|w| !w.minimized)
            .and_then(|w| w.payload.terminal())
            .map(|term| {
                let status = term.session().status();
                (status.to_string(), self.theme.status(status))
            });
        self.dock.set_status(status);
        let entries = self
            .wm
            .windows()
            .map(|w| DockEntry::window(w.id, &w.title, Some(w.id) == self.wm.active(), w.minimized))
            .collect();
        self.dock.set_windows(entries);
    }
}

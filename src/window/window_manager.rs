use std::collections::{BTreeMap, VecDeque};

use super::interaction::{clamp_origin, clamp_size};
use super::{DesktopMetrics, Geometry, Window, WindowId, WindowPatch};
use crate::constants::CASCADE_WRAP;

/// A state transition understood by [`WindowManager::apply`].
#[derive(Debug, Clone)]
pub enum WmAction<P> {
    Open {
        app_type: String,
        title: String,
        payload: P,
    },
    Close(WindowId),
    Focus(WindowId),
    Update(WindowId, WindowPatch),
    SetMinimized(WindowId, bool),
    ToggleMaximize(WindowId),
    SetMetrics(DesktopMetrics),
}

/// Result of applying a [`WmAction`]. Unknown ids are `Ignored`, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmOutcome {
    Opened(WindowId),
    Applied,
    Ignored,
}

/// FIFO of pending actions; lets input handlers enqueue transitions that are
/// applied in order at a single point of the frame.
#[derive(Debug, Clone)]
pub struct ActionQueue<P> {
    pending: VecDeque<WmAction<P>>,
}

impl<P> Default for ActionQueue<P> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<P> ActionQueue<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: WmAction<P>) {
        self.pending.push_back(action);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every queued action in order, returning their outcomes.
    pub fn drain_into(&mut self, wm: &mut WindowManager<P>) -> Vec<WmOutcome> {
        self.pending.drain(..).map(|action| wm.apply(action)).collect()
    }
}

/// Authoritative list of open windows with their geometry, visibility and
/// stacking order. Rendering lives elsewhere; this type only tracks state.
#[derive(Debug, Clone)]
pub struct WindowManager<P> {
    windows: BTreeMap<WindowId, Window<P>>,
    active: Option<WindowId>,
    next_id: u64,
    metrics: DesktopMetrics,
}

impl<P> Default for WindowManager<P> {
    fn default() -> Self {
        Self::new(DesktopMetrics::default())
    }
}

impl<P> WindowManager<P> {
    pub fn new(metrics: DesktopMetrics) -> Self {
        Self {
            windows: BTreeMap::new(),
            active: None,
            next_id: 1,
            metrics,
        }
    }

    pub fn metrics(&self) -> &DesktopMetrics {
        &self.metrics
    }

    /// Single entry point for every state transition.
    pub fn apply(&mut self, action: WmAction<P>) -> WmOutcome {
        match action {
            WmAction::Open {
                app_type,
                title,
                payload,
            } => WmOutcome::Opened(self.open_window(app_type, title, payload)),
            WmAction::Close(id) => self.close_window(id),
            WmAction::Focus(id) => self.focus_window(id),
            WmAction::Update(id, patch) => self.update_window(id, patch),
            WmAction::SetMinimized(id, value) => self.minimize_window(id, value),
            WmAction::ToggleMaximize(id) => self.maximize_window(id),
            WmAction::SetMetrics(metrics) => {
                self.refit(metrics);
                WmOutcome::Applied
            }
        }
    }

    pub fn open(
        &mut self,
        app_type: impl Into<String>,
        title: impl Into<String>,
        payload: P,
    ) -> WindowId {
        self.open_window(app_type.into(), title.into(), payload)
    }

    pub fn close(&mut self, id: WindowId) {
        self.apply(WmAction::Close(id));
    }

    pub fn focus(&mut self, id: WindowId) {
        self.apply(WmAction::Focus(id));
    }

    pub fn update(&mut self, id: WindowId, patch: WindowPatch) {
        self.apply(WmAction::Update(id, patch));
    }

    pub fn set_minimized(&mut self, id: WindowId, minimized: bool) {
        self.apply(WmAction::SetMinimized(id, minimized));
    }

    pub fn toggle_maximize(&mut self, id: WindowId) {
        self.apply(WmAction::ToggleMaximize(id));
    }

    pub fn set_metrics(&mut self, metrics: DesktopMetrics) {
        self.apply(WmAction::SetMetrics(metrics));
    }

    /// Un-minimize and focus, as the dock does when an entry is clicked.
    pub fn restore(&mut self, id: WindowId) {
        if !self.windows.contains_key(&id) {
            return;
        }
        self.set_minimized(id, false);
        self.focus(id);
    }

    /// Move focus to the next (or previous) visible window in creation order.
    pub fn cycle_focus(&mut self, forward: bool) {
        let order: Vec<WindowId> = self
            .windows
            .values()
            .filter(|w| !w.minimized)
            .map(|w| w.id)
            .collect();
        if order.is_empty() {
            return;
        }
        let idx = self
            .active
            .and_then(|active| order.iter().position(|id| *id == active))
            .unwrap_or(0);
        let step = if forward { 1isize } else { -1isize };
        let next = (idx as isize + step).rem_euclid(order.len() as isize) as usize;
        self.focus(order[next]);
    }

    pub fn get(&self, id: WindowId) -> Option<&Window<P>> {
        self.windows.get(&id)
    }

    pub fn payload_mut(&mut self, id: WindowId) -> Option<&mut P> {
        self.windows.get_mut(&id).map(|w| &mut w.payload)
    }

    pub fn payloads_mut(&mut self) -> impl Iterator<Item = (WindowId, &mut P)> {
        self.windows.iter_mut().map(|(id, w)| (*id, &mut w.payload))
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Windows in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &Window<P>> {
        self.windows.values()
    }

    /// Windows from bottom-most to top-most.
    pub fn windows_by_z(&self) -> Vec<&Window<P>> {
        let mut ordered: Vec<&Window<P>> = self.windows.values().collect();
        ordered.sort_by_key(|w| w.z_index);
        ordered
    }

    /// Top-most visible window containing the point.
    pub fn window_at(&self, x: i32, y: i32) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| !w.minimized && w.geometry.contains(x, y))
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    fn top_z(&self) -> u32 {
        self.windows.values().map(|w| w.z_index).max().unwrap_or(0)
    }

    fn open_window(&mut self, app_type: String, title: String, payload: P) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let geometry = self.cascade_geometry();
        let z_index = self.top_z().saturating_add(1);
        tracing::debug!(window_id = %id, app_type = %app_type, z_index, "opened window");
        self.windows.insert(
            id,
            Window::new(id, app_type, title, geometry, z_index, payload),
        );
        self.active = Some(id);
        id
    }

    fn cascade_geometry(&self) -> Geometry {
        let m = &self.metrics;
        let usable = m.usable_area();
        let slot = (self.windows.len() as u32 % CASCADE_WRAP) as i32;
        let offset = slot * m.cascade_step as i32;
        let width = m.default_width.min(usable.width).max(1);
        let height = m.default_height.min(usable.height).max(1);
        let (x, y) = clamp_origin(m, usable.x + offset, usable.y + offset, width, height);
        Geometry {
            x,
            y,
            width,
            height,
        }
    }

    fn close_window(&mut self, id: WindowId) -> WmOutcome {
        if self.windows.remove(&id).is_none() {
            return WmOutcome::Ignored;
        }
        tracing::debug!(window_id = %id, "closed window");
        if self.active == Some(id) {
            self.active = self
                .windows
                .values()
                .max_by_key(|w| w.z_index)
                .map(|w| w.id);
            tracing::debug!(focus = ?self.active, "focus transferred after close");
        }
        WmOutcome::Applied
    }

    fn focus_window(&mut self, id: WindowId) -> WmOutcome {
        let top = self.top_z();
        let Some(window) = self.windows.get_mut(&id) else {
            return WmOutcome::Ignored;
        };
        // Re-focusing the top-most window keeps its z-index.
        let is_top = window.z_index == top;
        if !is_top {
            window.z_index = top.saturating_add(1);
        }
        self.active = Some(id);
        WmOutcome::Applied
    }

    fn update_window(&mut self, id: WindowId, patch: WindowPatch) -> WmOutcome {
        let Some(window) = self.windows.get_mut(&id) else {
            return WmOutcome::Ignored;
        };
        patch.apply_to(window);
        WmOutcome::Applied
    }

    fn minimize_window(&mut self, id: WindowId, minimized: bool) -> WmOutcome {
        let Some(window) = self.windows.get_mut(&id) else {
            return WmOutcome::Ignored;
        };
        window.minimized = minimized;
        tracing::debug!(window_id = %id, minimized, "minimize state changed");
        if minimized && self.active == Some(id) {
            self.active = self
                .windows
                .values()
                .filter(|w| !w.minimized)
                .max_by_key(|w| w.z_index)
                .map(|w| w.id);
        }
        WmOutcome::Applied
    }

    fn maximize_window(&mut self, id: WindowId) -> WmOutcome {
        let usable = self.metrics.usable_area();
        let Some(window) = self.windows.get_mut(&id) else {
            return WmOutcome::Ignored;
        };
        if window.maximized {
            if let Some(prev) = window.restore_geometry.take() {
                window.geometry = prev;
            }
            window.maximized = false;
        } else {
            window.restore_geometry = Some(window.geometry);
            window.geometry = usable;
            window.maximized = true;
        }
        tracing::debug!(window_id = %id, maximized = window.maximized, "toggled maximize");
        WmOutcome::Applied
    }

    fn refit(&mut self, metrics: DesktopMetrics) {
        self.metrics = metrics;
        let usable = metrics.usable_area();
        for window in self.windows.values_mut() {
            if window.maximized {
                window.geometry = usable;
                window.restore_geometry = window
                    .restore_geometry
                    .map(|g| fit_into_view(&metrics, g));
            } else {
                window.geometry = fit_into_view(&metrics, window.geometry);
            }
        }
        tracing::debug!(
            width = metrics.viewport_width,
            height = metrics.viewport_height,
            "viewport refit"
        );
    }
}

/// Shrink `g` to the usable area and pull it back inside the viewport.
fn fit_into_view(metrics: &DesktopMetrics, g: Geometry) -> Geometry {
    let usable = metrics.usable_area();
    let width = g.width.min(usable.width).max(1);
    let height = g.height.min(usable.height).max(1);
    let (x, y) = clamp_origin(metrics, g.x, g.y, width, height);
    let (width, height) = clamp_size(metrics, x, y, width, height);
    Geometry {
        x,
        y,
        width,
        height,
    }
}

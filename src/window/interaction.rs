//! Pointer interaction protocol for floating windows.
//!
//! The window manager trusts the geometry it is given, so every clamp lives
//! here: a title-bar drag keeps the title bar inside the viewport and below
//! the top chrome, and a resize never goes under the minimum size or past the
//! viewport edge.

use std::collections::BTreeMap;

use super::{DesktopMetrics, Geometry, Window, WindowId, WindowManager, WindowPatch};

/// Region of a window under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    TitleBar,
    MinimizeButton,
    MaximizeButton,
    CloseButton,
    ResizeHandle,
    Body,
}

/// An in-progress pointer gesture bound to a single window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Offset between the pointer and the window origin at press time.
    Drag { offset_x: i32, offset_y: i32 },
    Resize {
        start_width: u16,
        start_height: u16,
        start_pointer_x: i32,
        start_pointer_y: i32,
    },
}

/// Clamp a window origin so its title bar stays visible.
///
/// When a window is larger than the viewport the lower bound wins.
pub fn clamp_origin(
    metrics: &DesktopMetrics,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
) -> (i32, i32) {
    let margin = metrics.margin as i32;
    let max_x = metrics.viewport_width as i32 - width as i32 - margin;
    let max_y = metrics.viewport_height as i32 - height as i32 - margin;
    (
        x.min(max_x).max(margin),
        y.min(max_y).max(metrics.top_chrome as i32),
    )
}

/// Clamp a window size to `[min, viewport - origin - margin]`.
pub fn clamp_size(
    metrics: &DesktopMetrics,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
) -> (u16, u16) {
    let margin = metrics.margin as i32;
    let max_w = metrics.viewport_width as i32 - x - margin;
    let max_h = metrics.viewport_height as i32 - y - margin;
    let w = (width as i32).min(max_w).max(metrics.min_width as i32);
    let h = (height as i32).min(max_h).max(metrics.min_height as i32);
    (to_u16(w), to_u16(h))
}

fn to_u16(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

/// Origin for a drag step: pointer minus captured offset, clamped.
pub fn drag_origin(
    metrics: &DesktopMetrics,
    geometry: Geometry,
    offset_x: i32,
    offset_y: i32,
    pointer_x: i32,
    pointer_y: i32,
) -> (i32, i32) {
    clamp_origin(
        metrics,
        pointer_x - offset_x,
        pointer_y - offset_y,
        geometry.width,
        geometry.height,
    )
}

/// Size for a resize step: start size plus pointer delta, clamped.
#[allow(clippy::too_many_arguments)]
pub fn resize_extent(
    metrics: &DesktopMetrics,
    geometry: Geometry,
    start_width: u16,
    start_height: u16,
    start_pointer_x: i32,
    start_pointer_y: i32,
    pointer_x: i32,
    pointer_y: i32,
) -> (u16, u16) {
    let desired_w = start_width as i32 + (pointer_x - start_pointer_x);
    let desired_h = start_height as i32 + (pointer_y - start_pointer_y);
    clamp_size(
        metrics,
        geometry.x,
        geometry.y,
        to_u16(desired_w),
        to_u16(desired_h),
    )
}

/// Classify a point against a window's chrome.
pub fn hit_test<P>(
    window: &Window<P>,
    metrics: &DesktopMetrics,
    x: i32,
    y: i32,
) -> Option<HitTarget> {
    let g = window.geometry;
    if window.minimized || !g.contains(x, y) {
        return None;
    }
    let right = g.x + g.width as i32;
    let bottom = g.y + g.height as i32;
    let grip = metrics.resize_handle.max(1) as i32;
    if !window.maximized && x >= right - grip && y >= bottom - grip {
        return Some(HitTarget::ResizeHandle);
    }
    if !window.title_bar(metrics).contains(x, y) {
        return Some(HitTarget::Body);
    }
    let bw = metrics.button_width.max(1) as i32;
    // Buttons sit inside the right border, close outermost.
    let end = right - 1;
    let target = if x >= end - bw && x < end {
        HitTarget::CloseButton
    } else if x >= end - 2 * bw && x < end - bw {
        HitTarget::MaximizeButton
    } else if x >= end - 3 * bw && x < end - 2 * bw {
        HitTarget::MinimizeButton
    } else {
        HitTarget::TitleBar
    };
    Some(target)
}

/// Tracks the gesture each window is in. Drag and resize are exclusive per
/// window; different windows are independent.
#[derive(Debug, Clone, Default)]
pub struct InteractionTracker {
    gestures: BTreeMap<WindowId, Gesture>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self, id: WindowId) -> Option<Gesture> {
        self.gestures.get(&id).copied()
    }

    /// First window with a gesture in flight, if any.
    pub fn active(&self) -> Option<(WindowId, Gesture)> {
        self.gestures.iter().next().map(|(id, g)| (*id, *g))
    }

    fn can_begin<P>(&self, wm: &WindowManager<P>, id: WindowId) -> Option<Geometry> {
        if self.gestures.contains_key(&id) {
            return None;
        }
        let window = wm.get(id)?;
        if window.maximized || window.minimized {
            return None;
        }
        Some(window.geometry)
    }

    /// Pointer pressed on a title bar.
    pub fn begin_drag<P>(
        &mut self,
        wm: &WindowManager<P>,
        id: WindowId,
        pointer_x: i32,
        pointer_y: i32,
    ) -> bool {
        let Some(g) = self.can_begin(wm, id) else {
            return false;
        };
        self.gestures.insert(
            id,
            Gesture::Drag {
                offset_x: pointer_x - g.x,
                offset_y: pointer_y - g.y,
            },
        );
        tracing::trace!(window_id = %id, "drag started");
        true
    }

    /// Pointer pressed on a resize handle.
    pub fn begin_resize<P>(
        &mut self,
        wm: &WindowManager<P>,
        id: WindowId,
        pointer_x: i32,
        pointer_y: i32,
    ) -> bool {
        let Some(g) = self.can_begin(wm, id) else {
            return false;
        };
        self.gestures.insert(
            id,
            Gesture::Resize {
                start_width: g.width,
                start_height: g.height,
                start_pointer_x: pointer_x,
                start_pointer_y: pointer_y,
            },
        );
        tracing::trace!(window_id = %id, "resize started");
        true
    }

    /// Pointer moved; applies the clamped geometry to the window manager.
    pub fn pointer_move<P>(
        &mut self,
        wm: &mut WindowManager<P>,
        id: WindowId,
        pointer_x: i32,
        pointer_y: i32,
    ) -> bool {
        let Some(gesture) = self.gesture(id) else {
            return false;
        };
        let Some(window) = wm.get(id) else {
            self.gestures.remove(&id);
            return false;
        };
        if window.maximized {
            return false;
        }
        let metrics = *wm.metrics();
        let geometry = window.geometry;
        let patch = match gesture {
            Gesture::Drag { offset_x, offset_y } => {
                let (x, y) = drag_origin(
                    &metrics, geometry, offset_x, offset_y, pointer_x, pointer_y,
                );
                WindowPatch::position(x, y)
            }
            Gesture::Resize {
                start_width,
                start_height,
                start_pointer_x,
                start_pointer_y,
            } => {
                let (w, h) = resize_extent(
                    &metrics,
                    geometry,
                    start_width,
                    start_height,
                    start_pointer_x,
                    start_pointer_y,
                    pointer_x,
                    pointer_y,
                );
                WindowPatch::size(w, h)
            }
        };
        wm.update(id, patch);
        true
    }

    /// Pointer released; ends whatever gesture the window was in.
    pub fn pointer_up(&mut self, id: WindowId) -> bool {
        self.gestures.remove(&id).is_some()
    }

    pub fn release_all(&mut self) {
        self.gestures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (WindowManager<()>, WindowId) {
        let mut wm = WindowManager::new(DesktopMetrics::default());
        let id = wm.open("terminal", "T", ());
        wm.update(id, WindowPatch::geometry(Geometry::new(100, 100, 200, 200)));
        (wm, id)
    }

    #[test]
    fn drag_clamps_to_left_margin() {
        let (mut wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        // press 10px into the title bar
        assert!(tracker.begin_drag(&wm, id, 110, 110));
        tracker.pointer_move(&mut wm, id, -490, 110);
        assert_eq!(wm.get(id).unwrap().geometry.x, wm.metrics().margin as i32);
    }

    #[test]
    fn drag_clamps_to_right_edge() {
        let (mut wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_drag(&wm, id, 110, 110));
        tracker.pointer_move(&mut wm, id, 5000, 110);
        let m = *wm.metrics();
        assert_eq!(
            wm.get(id).unwrap().geometry.x,
            m.viewport_width as i32 - 200 - m.margin as i32
        );
    }

    #[test]
    fn drag_never_goes_above_top_chrome() {
        let (mut wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_drag(&wm, id, 110, 110));
        tracker.pointer_move(&mut wm, id, 300, -100);
        assert_eq!(
            wm.get(id).unwrap().geometry.y,
            wm.metrics().top_chrome as i32
        );
    }

    #[test]
    fn drag_keeps_pointer_offset() {
        let (mut wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_drag(&wm, id, 120, 105));
        tracker.pointer_move(&mut wm, id, 320, 205);
        let g = wm.get(id).unwrap().geometry;
        assert_eq!((g.x, g.y), (300, 200));
        assert!(tracker.pointer_up(id));
        assert!(!tracker.pointer_move(&mut wm, id, 0, 0));
    }

    #[test]
    fn drag_disabled_while_maximized() {
        let (mut wm, id) = setup();
        wm.toggle_maximize(id);
        let mut tracker = InteractionTracker::new();
        assert!(!tracker.begin_drag(&wm, id, 50, 50));
        wm.toggle_maximize(id);
        assert_eq!(
            wm.get(id).unwrap().geometry,
            Geometry::new(100, 100, 200, 200)
        );
    }

    #[test]
    fn maximize_mid_drag_leaves_cached_geometry_alone() {
        let (mut wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_drag(&wm, id, 110, 110));
        wm.toggle_maximize(id);
        assert!(!tracker.pointer_move(&mut wm, id, 400, 400));
        wm.toggle_maximize(id);
        assert_eq!(
            wm.get(id).unwrap().geometry,
            Geometry::new(100, 100, 200, 200)
        );
    }

    #[test]
    fn resize_clamps_to_minimum_and_viewport() {
        let (mut wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_resize(&wm, id, 299, 299));
        tracker.pointer_move(&mut wm, id, 0, 0);
        let m = *wm.metrics();
        let g = wm.get(id).unwrap().geometry;
        assert_eq!((g.width, g.height), (m.min_width, m.min_height));

        tracker.pointer_move(&mut wm, id, 9000, 9000);
        let g = wm.get(id).unwrap().geometry;
        assert_eq!(g.width as i32, m.viewport_width as i32 - 100 - m.margin as i32);
        assert_eq!(g.height as i32, m.viewport_height as i32 - 100 - m.margin as i32);
        // origin untouched by a resize
        assert_eq!((g.x, g.y), (100, 100));
    }

    #[test]
    fn drag_and_resize_are_exclusive_per_window() {
        let (wm, id) = setup();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_drag(&wm, id, 110, 110));
        assert!(!tracker.begin_resize(&wm, id, 299, 299));
        assert!(matches!(tracker.gesture(id), Some(Gesture::Drag { .. })));
    }

    #[test]
    fn gestures_on_different_windows_are_independent() {
        let (mut wm, a) = setup();
        let b = wm.open("terminal", "B", ());
        let mut tracker = InteractionTracker::new();
        assert!(tracker.begin_drag(&wm, a, 110, 110));
        let gb = wm.get(b).unwrap().geometry;
        let grip_x = gb.x + gb.width as i32 - 1;
        let grip_y = gb.y + gb.height as i32 - 1;
        assert!(tracker.begin_resize(&wm, b, grip_x, grip_y));
        tracker.pointer_up(a);
        assert!(tracker.gesture(a).is_none());
        assert!(tracker.gesture(b).is_some());
    }

    #[test]
    fn hit_test_classifies_chrome() {
        let (wm, id) = setup();
        let m = *wm.metrics();
        let w = wm.get(id).unwrap();
        let bw = m.button_width as i32;
        let end = 100 + 200 - 1;
        assert_eq!(hit_test(w, &m, 110, 105), Some(HitTarget::TitleBar));
        assert_eq!(hit_test(w, &m, end - 1, 105), Some(HitTarget::CloseButton));
        assert_eq!(
            hit_test(w, &m, end - bw - 1, 105),
            Some(HitTarget::MaximizeButton)
        );
        assert_eq!(
            hit_test(w, &m, end - 2 * bw - 1, 105),
            Some(HitTarget::MinimizeButton)
        );
        assert_eq!(hit_test(w, &m, 299, 299), Some(HitTarget::ResizeHandle));
        assert_eq!(hit_test(w, &m, 150, 200), Some(HitTarget::Body));
        assert_eq!(hit_test(w, &m, 50, 50), None);
    }

    #[test]
    fn oversized_window_pins_to_lower_bound() {
        let m = DesktopMetrics::for_cells(40, 12);
        assert_eq!(clamp_origin(&m, 30, 8, 60, 20), (0, 1));
    }
}

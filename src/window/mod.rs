pub mod decorator;
pub mod interaction;

mod window_manager;

use ratatui::prelude::Rect;

pub use interaction::{Gesture, HitTarget, InteractionTracker};
pub use window_manager::{ActionQueue, WindowManager, WmAction, WmOutcome};

/// Identifier handed out by [`WindowManager::open`]. Never reused within a
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Signed origin with unsigned size, in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.width > 0
            && self.height > 0
            && x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }

    /// Portion of the geometry that lies inside `bounds`, as a ratatui rect.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let bounds_x0 = bounds.x as i32;
        let bounds_y0 = bounds.y as i32;
        let bounds_x1 = bounds_x0 + bounds.width as i32;
        let bounds_y1 = bounds_y0 + bounds.height as i32;
        let x0 = self.x.max(bounds_x0);
        let y0 = self.y.max(bounds_y0);
        let x1 = (self.x + self.width as i32).min(bounds_x1);
        let y1 = (self.y + self.height as i32).min(bounds_y1);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        }
    }
}

/// Viewport and chrome sizes the window manager lays windows out against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopMetrics {
    pub viewport_width: u16,
    pub viewport_height: u16,
    /// Fixed chrome above the desktop (menu bar).
    pub top_chrome: u16,
    /// Fixed chrome below the desktop (dock).
    pub bottom_chrome: u16,
    pub margin: u16,
    pub min_width: u16,
    pub min_height: u16,
    pub default_width: u16,
    pub default_height: u16,
    pub cascade_step: u16,
    pub title_bar_height: u16,
    /// Width of each title bar button (minimize, maximize, close).
    pub button_width: u16,
    /// Side of the square resize grip in the bottom-right corner.
    pub resize_handle: u16,
}

impl Default for DesktopMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 800,
            top_chrome: 32,
            bottom_chrome: 80,
            margin: 8,
            min_width: 200,
            min_height: 150,
            default_width: 640,
            default_height: 420,
            cascade_step: 30,
            title_bar_height: 36,
            button_width: 36,
            resize_handle: 16,
        }
    }
}

impl DesktopMetrics {
    /// Metrics for a character-cell viewport: one row of menu bar, one row
    /// of dock, and windows measured in cells.
    pub fn for_cells(width: u16, height: u16) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            top_chrome: 1,
            bottom_chrome: 1,
            margin: 0,
            min_width: 20,
            min_height: 6,
            default_width: 72,
            default_height: 20,
            cascade_step: 2,
            title_bar_height: 1,
            button_width: 3,
            resize_handle: 1,
        }
    }

    /// Area available to maximized windows: the viewport minus top and
    /// bottom chrome, inset by the margin.
    pub fn usable_area(&self) -> Geometry {
        let m = self.margin as i32;
        let width = (self.viewport_width as i32 - 2 * m).max(1);
        let height = (self.viewport_height as i32
            - self.top_chrome as i32
            - self.bottom_chrome as i32
            - 2 * m)
            .max(1);
        Geometry {
            x: m,
            y: self.top_chrome as i32 + m,
            width: width as u16,
            height: height as u16,
        }
    }
}

/// One managed window. `P` is an opaque payload the manager never inspects.
#[derive(Debug, Clone)]
pub struct Window<P> {
    pub id: WindowId,
    pub app_type: String,
    pub title: String,
    pub geometry: Geometry,
    pub z_index: u32,
    pub minimized: bool,
    pub maximized: bool,
    pub payload: P,
    restore_geometry: Option<Geometry>,
}

impl<P> Window<P> {
    fn new(
        id: WindowId,
        app_type: String,
        title: String,
        geometry: Geometry,
        z_index: u32,
        payload: P,
    ) -> Self {
        Self {
            id,
            app_type,
            title,
            geometry,
            z_index,
            minimized: false,
            maximized: false,
            payload,
            restore_geometry: None,
        }
    }

    /// Geometry cached when the window was maximized.
    pub fn restore_geometry(&self) -> Option<Geometry> {
        self.restore_geometry
    }

    /// Strip of the window that acts as the drag handle.
    pub fn title_bar(&self, metrics: &DesktopMetrics) -> Geometry {
        Geometry {
            x: self.geometry.x,
            y: self.geometry.y,
            width: self.geometry.width,
            height: metrics.title_bar_height.min(self.geometry.height),
        }
    }
}

/// Partial update merged by [`WindowManager::update`]. `None` fields are left
/// untouched. Flipping `maximized` caches or drops the restore geometry the
/// same way [`WindowManager::toggle_maximize`] does, but does not resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub minimized: Option<bool>,
    pub maximized: Option<bool>,
}

impl WindowPatch {
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: u16, height: u16) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            ..Self::default()
        }
    }

    fn apply_to<P>(&self, window: &mut Window<P>) {
        let before = window.geometry;
        if let Some(x) = self.x {
            window.geometry.x = x;
        }
        if let Some(y) = self.y {
            window.geometry.y = y;
        }
        if let Some(width) = self.width {
            window.geometry.width = width;
        }
        if let Some(height) = self.height {
            window.geometry.height = height;
        }
        if let Some(minimized) = self.minimized {
            window.minimized = minimized;
        }
        if let Some(maximized) = self.maximized
            && maximized != window.maximized
        {
            window.restore_geometry = maximized.then_some(before);
            window.maximized = maximized;
        }
    }
}

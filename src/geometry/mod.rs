// geometry/mod.rs - Screen Geometry Types
//
// Plain rectangle/point types in screen pixels plus the alignment vocabulary
// used to place the popup window relative to the tray icon.

mod positioner;

pub use positioner::{
    calculate, compute_anchored_position, compute_cursor_fallback_position, detect_taskbar_edge,
};

use serde::{Deserialize, Serialize};

/// A point on screen (origin top-left)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A rectangular region on the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// x coordinate one past the right edge, saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// y coordinate one past the bottom edge
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// A display as reported by the OS: full bounds and the usable work area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub bounds: Rect,
    pub work_area: Rect,
}

impl Display {
    pub fn new(bounds: Rect, work_area: Rect) -> Self {
        Self { bounds, work_area }
    }
}

/// Screen edge occupied by the system taskbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskbarEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Horizontal placement against the anchor when the taskbar is top or bottom.
///
/// `Right` puts the window's left edge on the anchor's left edge so the
/// window extends to the right; `Left` is the mirror image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    /// Lenient parse; unrecognized names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Vertical placement against the anchor when the taskbar is left or right.
///
/// `Down` puts the window's top edge on the anchor's top edge; `Up` puts the
/// window's bottom edge on the anchor's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Up,
    Middle,
    Down,
}

impl VerticalAlign {
    /// Lenient parse; unrecognized names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "middle" => Some(Self::Middle),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

/// Optional alignment overrides. Missing fields use the edge default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub x: Option<HorizontalAlign>,
    pub y: Option<VerticalAlign>,
}

impl Alignment {
    pub fn new(x: Option<HorizontalAlign>, y: Option<VerticalAlign>) -> Self {
        Self { x, y }
    }

    /// Build from raw names, dropping anything unrecognized
    pub fn from_names(x: Option<&str>, y: Option<&str>) -> Self {
        Self {
            x: x.and_then(HorizontalAlign::parse),
            y: y.and_then(VerticalAlign::parse),
        }
    }

    /// Fields set in `other` win over ours
    pub fn overridden_by(self, other: Alignment) -> Self {
        Self {
            x: other.x.or(self.x),
            y: other.y.or(self.y),
        }
    }
}

/// Point-in-time screen state the popup is positioned against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenContext {
    /// Display nearest the cursor
    pub display: Display,
    /// Current cursor position
    pub cursor: Point,
    /// Whether the running platform can report tray icon bounds
    pub reports_tray_bounds: bool,
}

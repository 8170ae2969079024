// platform/macos.rs - macOS Display and Cursor Queries
//
// winit only reports monitor bounds. The status item lives in the menu bar,
// so the tray icon rectangle tells us where the work area starts.

use crate::geometry::{Display, Point, Rect};

pub fn display_for(bounds: Rect, _point: Point, tray: Option<Rect>) -> Display {
    Display::new(bounds, super::menu_bar_work_area(bounds, tray))
}

/// No global pointer query without AppKit; tray events carry the position
pub fn cursor_position() -> Option<Point> {
    None
}

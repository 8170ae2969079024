// geometry/positioner.rs - Popup Window Positioning
//
// Computes where the popup window's top-left corner goes, given the window
// size, the tray icon rectangle and the display it lives on. Everything here
// is a pure function of its arguments; display and cursor queries happen in
// the caller.

use log::debug;

use super::{
    Alignment, Display, HorizontalAlign, Point, Rect, ScreenContext, Size, TaskbarEdge,
    VerticalAlign,
};

/// Infer which edge hosts the taskbar from how the work area is inset
/// from the full display bounds.
///
/// A display without any taskbar reports `Bottom`.
pub fn detect_taskbar_edge(display: &Display) -> TaskbarEdge {
    let work_area = &display.work_area;

    if work_area.y > 0 {
        TaskbarEdge::Top
    } else if work_area.x > 0 {
        TaskbarEdge::Left
    } else if work_area.width == display.bounds.width {
        TaskbarEdge::Bottom
    } else {
        TaskbarEdge::Right
    }
}

/// Position the window against a known tray icon rectangle.
///
/// One axis is pinned to the work area edge that hosts the taskbar, the other
/// is aligned against the anchor (x defaults to centered, y defaults to down).
pub fn compute_anchored_position(
    window: Size,
    anchor: Rect,
    display: &Display,
    alignment: Alignment,
) -> Point {
    let edge = detect_taskbar_edge(display);
    let work_area = &display.work_area;

    let position = match edge {
        TaskbarEdge::Left => Point::new(
            work_area.x,
            align_y(window, anchor, display, alignment.y),
        ),
        TaskbarEdge::Right => Point::new(
            work_area.right().saturating_sub(window.width),
            align_y(window, anchor, display, alignment.y),
        ),
        TaskbarEdge::Bottom => Point::new(
            align_x(window, anchor, display, alignment.x),
            work_area.bottom().saturating_sub(window.height),
        ),
        TaskbarEdge::Top => Point::new(
            align_x(window, anchor, display, alignment.x),
            work_area.y,
        ),
    };

    debug!("Taskbar on {:?} edge, anchored position {:?}", edge, position);
    position
}

/// Position the window at the cursor, flipping left/up when it would run
/// past the display's right/bottom edge.
///
/// No further clamping: a window larger than the space on either side of the
/// cursor can still overlap a screen edge.
pub fn compute_cursor_fallback_position(window: Size, display: &Display, cursor: Point) -> Point {
    let mut x = cursor.x;
    let mut y = cursor.y;

    if x.saturating_add(window.width) > display.bounds.width {
        x = x.saturating_sub(window.width);
    }

    if y.saturating_add(window.height) > display.bounds.height {
        y = y.saturating_sub(window.height);
    }

    Point::new(x, y)
}

/// Single entry point used by the popup controller.
///
/// Falls back to cursor placement when the platform cannot report tray
/// bounds or the anchor is missing / has no area.
pub fn calculate(
    window: Size,
    anchor: Option<Rect>,
    alignment: Alignment,
    screen: &ScreenContext,
) -> Point {
    let anchor = anchor.filter(|rect| !rect.is_empty());

    let position = match anchor {
        Some(anchor) if screen.reports_tray_bounds => {
            compute_anchored_position(window, anchor, &screen.display, alignment)
        }
        _ => {
            debug!("No usable tray bounds, positioning by cursor at {:?}", screen.cursor);
            compute_cursor_fallback_position(window, &screen.display, screen.cursor)
        }
    };

    debug!("Popup {}x{} -> {:?}", window.width, window.height, position);
    position
}

/// Horizontal alignment against the anchor.
///
/// An explicit `Left` skips the right-edge clamp and an explicit `Right`
/// skips the left-edge clamp; the default gets both.
fn align_x(window: Size, anchor: Rect, display: &Display, align: Option<HorizontalAlign>) -> i32 {
    let mut x = match align.unwrap_or(HorizontalAlign::Center) {
        HorizontalAlign::Right => anchor.x,
        HorizontalAlign::Left => anchor.right().saturating_sub(window.width),
        HorizontalAlign::Center => round_half_up(
            f64::from(anchor.x) + f64::from(anchor.width) / 2.0 - f64::from(window.width) / 2.0,
        ),
    };

    if x.saturating_add(window.width) > display.bounds.width && align != Some(HorizontalAlign::Left) {
        x = display.bounds.width.saturating_sub(window.width);
    } else if x < 0 && align != Some(HorizontalAlign::Right) {
        x = 0;
    }

    x
}

/// Vertical alignment against the anchor, mirroring `align_x`.
fn align_y(window: Size, anchor: Rect, display: &Display, align: Option<VerticalAlign>) -> i32 {
    let mut y = match align.unwrap_or(VerticalAlign::Down) {
        VerticalAlign::Down => anchor.y,
        VerticalAlign::Up => anchor.bottom().saturating_sub(window.height),
        VerticalAlign::Middle => round_half_up(
            f64::from(anchor.y) + f64::from(anchor.height) / 2.0 - f64::from(window.height) / 2.0,
        ),
    };

    if y.saturating_add(window.height) > display.bounds.height && align != Some(VerticalAlign::Up) {
        y = display.bounds.height.saturating_sub(window.height);
    } else if y < 0 && align != Some(VerticalAlign::Down) {
        y = 0;
    }

    y
}

/// Round halves toward positive infinity (-2.5 -> -2, 2.5 -> 3).
/// Out-of-range values saturate at the i32 bounds.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

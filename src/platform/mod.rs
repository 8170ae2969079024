// platform/mod.rs - Platform Abstraction Layer
//
// Point-in-time queries the popup controller injects into the positioning
// engine: the display nearest a point (bounds and work area), the cursor
// position, and whether the tray can report its icon bounds.

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
use self::windows as native;

#[cfg(target_os = "macos")]
use self::macos as native;

#[cfg(target_os = "linux")]
use self::linux as native;

use log::warn;

use crate::constants;
use crate::geometry::{Display, Point, Rect, ScreenContext};

/// Whether tray icons on this platform report their screen bounds
pub const REPORTS_TRAY_BOUNDS: bool = cfg!(any(target_os = "windows", target_os = "macos"));

/// Preset used when the options do not name one
pub fn default_window_position() -> &'static str {
    if cfg!(target_os = "windows") {
        constants::preset::WINDOWS_DEFAULT
    } else {
        constants::preset::DEFAULT
    }
}

/// Monitor containing `point`, or the closest one when none does
pub fn nearest_monitor(point: Point, monitors: &[Rect]) -> Option<Rect> {
    if let Some(monitor) = monitors.iter().find(|m| m.contains(point)) {
        return Some(*monitor);
    }

    monitors
        .iter()
        .min_by_key(|m| {
            let dx = distance_to_span(point.x, m.x, m.right());
            let dy = distance_to_span(point.y, m.y, m.bottom());
            i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy)
        })
        .copied()
}

fn distance_to_span(value: i32, start: i32, end: i32) -> i32 {
    if value < start {
        start.saturating_sub(value)
    } else if value >= end {
        value.saturating_sub(end).saturating_add(1)
    } else {
        0
    }
}

/// Display nearest `point`, including its work area where the OS exposes it
pub fn display_near(point: Point, monitors: &[Rect], tray: Option<Rect>) -> Display {
    let bounds = nearest_monitor(point, monitors).unwrap_or_else(|| {
        warn!("No monitor reported, assuming a default display");
        Rect::new(
            0,
            0,
            constants::display::FALLBACK_WIDTH,
            constants::display::FALLBACK_HEIGHT,
        )
    });
    native::display_for(bounds, point, tray)
}

/// Current cursor position, or the last one seen in a tray event
pub fn cursor_position(last_known: Option<Point>, monitors: &[Rect]) -> Point {
    native::cursor_position()
        .or(last_known)
        .unwrap_or_else(|| default_cursor(monitors))
}

/// Top-right corner of the first monitor, where most trays live
fn default_cursor(monitors: &[Rect]) -> Point {
    match monitors.first() {
        Some(monitor) => Point::new(monitor.right() - 1, monitor.y),
        None => Point::new(constants::display::FALLBACK_WIDTH - 1, 0),
    }
}

/// Work area below the menu bar, for platforms that only report bounds.
///
/// The status item sits in the menu bar, so its bottom edge marks where the
/// work area starts. A tray rect on another monitor says nothing about this
/// one; the default height is used then.
pub fn menu_bar_work_area(bounds: Rect, tray: Option<Rect>) -> Rect {
    let inset = tray
        .filter(|tray| !tray.is_empty() && bounds.contains(Point::new(tray.x, tray.y)))
        .map(|tray| tray.bottom().saturating_sub(bounds.y))
        .filter(|inset| *inset < bounds.height)
        .unwrap_or(constants::display::MENU_BAR_HEIGHT);

    Rect::new(
        bounds.x,
        bounds.y.saturating_add(inset),
        bounds.width,
        bounds.height.saturating_sub(inset),
    )
}

/// Gather everything `geometry::calculate` needs about the screen
pub fn screen_context(last_cursor: Option<Point>, monitors: &[Rect], tray: Option<Rect>) -> ScreenContext {
    let cursor = cursor_position(last_cursor, monitors);
    ScreenContext {
        display: display_near(cursor, monitors, tray),
        cursor,
        reports_tray_bounds: REPORTS_TRAY_BOUNDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitors() -> Vec<Rect> {
        vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 2560, 1440)]
    }

    #[test]
    fn test_nearest_monitor_containing() {
        assert_eq!(nearest_monitor(Point::new(500, 500), &monitors()), Some(monitors()[0]));
        assert_eq!(nearest_monitor(Point::new(2000, 1300), &monitors()), Some(monitors()[1]));
    }

    #[test]
    fn test_nearest_monitor_outside_all() {
        assert_eq!(nearest_monitor(Point::new(-50, 200), &monitors()), Some(monitors()[0]));
        assert_eq!(nearest_monitor(Point::new(5000, 200), &monitors()), Some(monitors()[1]));
        assert_eq!(nearest_monitor(Point::new(10, 10), &[]), None);
    }

    #[test]
    fn test_nearest_monitor_at_extreme_point() {
        assert_eq!(nearest_monitor(Point::new(i32::MIN, i32::MIN), &monitors()), Some(monitors()[0]));
        assert_eq!(nearest_monitor(Point::new(i32::MAX, i32::MAX), &monitors()), Some(monitors()[1]));
    }

    #[test]
    fn test_menu_bar_work_area_from_tray() {
        let bounds = Rect::new(0, 0, 1440, 900);
        let tray = Rect::new(1200, 0, 22, 25);
        assert_eq!(menu_bar_work_area(bounds, Some(tray)), Rect::new(0, 25, 1440, 875));
        assert_eq!(menu_bar_work_area(bounds, None), Rect::new(0, 24, 1440, 876));
    }

    #[test]
    fn test_menu_bar_work_area_ignores_tray_on_other_monitor() {
        // Secondary display stacked above the primary, tray on the primary
        let secondary = Rect::new(0, -1440, 2560, 1440);
        let tray = Rect::new(1200, 0, 22, 25);
        assert_eq!(
            menu_bar_work_area(secondary, Some(tray)),
            Rect::new(0, -1416, 2560, 1416)
        );

        let primary = Rect::new(0, 0, 1440, 900);
        let tray_above = Rect::new(1200, -1440, 22, 25);
        assert_eq!(menu_bar_work_area(primary, Some(tray_above)), Rect::new(0, 24, 1440, 876));
    }

    #[test]
    fn test_default_cursor() {
        assert_eq!(default_cursor(&monitors()), Point::new(1919, 0));
        assert_eq!(default_cursor(&[]), Point::new(1919, 0));
    }

    #[test]
    fn test_default_window_position_is_known_preset() {
        assert!(crate::config::WindowPosition::from_name(default_window_position()).is_some());
    }
}

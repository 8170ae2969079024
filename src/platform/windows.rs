// platform/windows.rs - Windows Display and Cursor Queries
//
// Uses the Win32 monitor API for the real work area (the taskbar may sit on
// any edge) and GetCursorPos for the pointer.

use log::warn;
use windows::Win32::{
    Foundation::{POINT, RECT},
    Graphics::Gdi::{GetMonitorInfoW, MonitorFromPoint, MONITORINFO, MONITOR_DEFAULTTONEAREST},
    UI::WindowsAndMessaging::GetCursorPos,
};

use crate::geometry::{Display, Point, Rect};

fn rect_from(rc: RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
}

/// Bounds and work area of the monitor nearest `point`
pub fn display_for(bounds: Rect, point: Point, _tray: Option<Rect>) -> Display {
    unsafe {
        let monitor = MonitorFromPoint(POINT { x: point.x, y: point.y }, MONITOR_DEFAULTTONEAREST);
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };

        if GetMonitorInfoW(monitor, &mut info).as_bool() {
            return Display::new(rect_from(info.rcMonitor), rect_from(info.rcWork));
        }
    }

    warn!("GetMonitorInfoW failed, using monitor bounds as work area");
    Display::new(bounds, bounds)
}

pub fn cursor_position() -> Option<Point> {
    let mut point = POINT { x: 0, y: 0 };
    unsafe { GetCursorPos(&mut point).ok()? };
    Some(Point::new(point.x, point.y))
}

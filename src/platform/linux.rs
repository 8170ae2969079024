// platform/linux.rs - Linux Display and Cursor Queries
//
// Tray icons (AppIndicator) report neither bounds nor clicks, so the popup is
// placed by cursor. GTK lives on the tray thread; pointer queries are posted
// to its main context and answered over a channel.

use std::sync::mpsc;
use std::time::Duration;

use gtk::gdk;
use gtk::gdk::prelude::*;
use gtk::glib;
use log::warn;

use crate::geometry::{Display, Point, Rect};

/// How long to wait for the GTK thread to answer a pointer query
const POINTER_QUERY_TIMEOUT: Duration = Duration::from_millis(250);

pub fn display_for(bounds: Rect, _point: Point, _tray: Option<Rect>) -> Display {
    Display::new(bounds, bounds)
}

/// Pointer position in physical pixels, asked of the GTK thread
pub fn cursor_position() -> Option<Point> {
    if !gtk::is_initialized() {
        return None;
    }

    let (sender, receiver) = mpsc::channel();
    glib::MainContext::default().invoke(move || {
        let _ = sender.send(pointer_position());
    });

    match receiver.recv_timeout(POINTER_QUERY_TIMEOUT) {
        Ok(position) => position,
        Err(e) => {
            warn!("Pointer query on the GTK thread failed: {}", e);
            None
        }
    }
}

/// Must run on the thread that called `gtk::init`
fn pointer_position() -> Option<Point> {
    let display = gdk::Display::default()?;
    let (_, x, y) = display.default_seat()?.pointer()?.position();
    let scale = display
        .monitor_at_point(x, y)
        .map_or(1, |monitor| monitor.scale_factor());
    Some(to_physical(x, y, scale))
}

/// GDK reports logical pixels; monitors from winit are physical
fn to_physical(x: i32, y: i32, scale: i32) -> Point {
    let scale = scale.max(1);
    Point::new(x.saturating_mul(scale), y.saturating_mul(scale))
}

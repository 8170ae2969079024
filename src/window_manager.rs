// window_manager.rs - Popup Window Management
//
// The popup is a frameless, hidden-until-shown winit window. `WinitHost`
// lends the controller everything it needs for one event: the active event
// loop (to create the window), the window itself, and the tray.
//
// POPUP WINDOW REQUIREMENTS:
// - Frameless (no title bar, no borders)
// - Not resizable
// - Created hidden, positioned, then shown
// - Kept out of the taskbar on Windows

use anyhow::{Context, Result};
use log::{debug, info};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId, WindowLevel},
};

use traypop::app::{PopupEvent, PopupHost};
use traypop::config::WindowOptions;
use traypop::constants;
use traypop::geometry::{Point, Rect, ScreenContext, Size};
use traypop::platform;

use crate::ui::SystemTray;

/// Wrapper for the popup window
pub struct PopupWindow {
    window: Window,
    /// winit cannot report visibility on every backend, so track it here
    visible: bool,
}

impl PopupWindow {
    pub fn new(event_loop: &ActiveEventLoop, options: &WindowOptions) -> Result<Self> {
        info!("Creating popup window {}x{}", options.width, options.height);

        let level = if options.always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };

        let attributes = WindowAttributes::default()
            .with_title(constants::popup::TITLE)
            .with_inner_size(PhysicalSize::new(options.width, options.height))
            .with_decorations(false)
            .with_resizable(false)
            .with_visible(false)
            .with_window_level(level);

        #[cfg(target_os = "windows")]
        let attributes = {
            use winit::platform::windows::WindowAttributesExtWindows;
            attributes.with_skip_taskbar(true)
        };

        let window = event_loop
            .create_window(attributes)
            .context("Failed to create popup window")?;

        info!("Popup window created with ID: {:?}", window.id());

        Ok(Self {
            window,
            visible: false,
        })
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    fn size(&self) -> Size {
        let size = self.window.outer_size();
        Size::new(size.width as i32, size.height as i32)
    }

    fn set_position(&self, position: Point) {
        self.window
            .set_outer_position(PhysicalPosition::new(position.x, position.y));
    }

    fn show(&mut self) {
        self.window.set_visible(true);
        self.window.focus_window();
        self.visible = true;
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
        self.visible = false;
    }
}

/// Monitor bounds in physical pixels
pub fn monitor_rects(event_loop: &ActiveEventLoop) -> Vec<Rect> {
    event_loop
        .available_monitors()
        .map(|monitor| {
            let position = monitor.position();
            let size = monitor.size();
            Rect::new(position.x, position.y, size.width as i32, size.height as i32)
        })
        .collect()
}

/// Toolkit access for the popup controller, valid for one event
pub struct WinitHost<'a> {
    event_loop: &'a ActiveEventLoop,
    popup: &'a mut Option<PopupWindow>,
    tray: &'a SystemTray,
    last_cursor: Option<Point>,
}

impl<'a> WinitHost<'a> {
    pub fn new(
        event_loop: &'a ActiveEventLoop,
        popup: &'a mut Option<PopupWindow>,
        tray: &'a SystemTray,
        last_cursor: Option<Point>,
    ) -> Self {
        Self {
            event_loop,
            popup,
            tray,
            last_cursor,
        }
    }
}

impl PopupHost for WinitHost<'_> {
    fn create_window(&mut self, options: &WindowOptions) -> Result<()> {
        *self.popup = Some(PopupWindow::new(self.event_loop, options)?);
        Ok(())
    }

    fn window_size(&self) -> Size {
        self.popup.as_ref().map(PopupWindow::size).unwrap_or_default()
    }

    fn is_window_visible(&self) -> bool {
        self.popup.as_ref().is_some_and(|popup| popup.visible)
    }

    fn set_window_position(&mut self, position: Point) {
        if let Some(popup) = self.popup.as_ref() {
            popup.set_position(position);
        }
    }

    fn show_window(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.show();
        }
    }

    fn hide_window(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.hide();
        }
    }

    fn tray_bounds(&self) -> Option<Rect> {
        self.tray.rect()
    }

    fn screen_context(&self) -> ScreenContext {
        let monitors = monitor_rects(self.event_loop);
        platform::screen_context(self.last_cursor, &monitors, self.tray.rect())
    }

    fn emit(&mut self, event: PopupEvent) {
        debug!("Popup event: {:?}", event);
    }
}

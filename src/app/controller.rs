// app/controller.rs - Popup Controller
//
// Owns the show/hide policy for the popup: click handling, the cached tray
// icon bounds, lazy window creation and lifecycle events. The windowing
// toolkit is reached only through `PopupHost`, so the policy runs the same
// against winit or a test double.

use anyhow::Result;
use log::{debug, info};

use crate::config::{Options, WindowOptions};
use crate::geometry::{self, Alignment, Point, Rect, ScreenContext, Size};
use crate::platform;

/// Lifecycle notifications, in the order they can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    /// Tray is set up and clicks are accepted
    Ready,
    /// About to create the popup window
    CreateWindow,
    /// Popup window exists
    AfterCreateWindow,
    /// About to show the popup
    Show,
    /// Popup is positioned and visible
    AfterShow,
    /// About to hide the popup
    Hide,
    /// Popup is hidden
    AfterHide,
}

/// Keyboard modifiers held during a tray click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl ClickModifiers {
    pub fn any(&self) -> bool {
        self.alt || self.shift || self.ctrl || self.meta
    }
}

/// Toolkit operations the controller needs
pub trait PopupHost {
    /// Create the (hidden) popup window
    fn create_window(&mut self, options: &WindowOptions) -> Result<()>;

    /// Current outer size of the popup window
    fn window_size(&self) -> Size;

    fn is_window_visible(&self) -> bool;

    fn set_window_position(&mut self, position: Point);

    fn show_window(&mut self);

    fn hide_window(&mut self);

    /// Tray icon bounds, if the platform reports them
    fn tray_bounds(&self) -> Option<Rect>;

    /// Display nearest the cursor, the cursor itself and platform capability
    fn screen_context(&self) -> ScreenContext;

    fn emit(&mut self, event: PopupEvent);
}

/// Show/hide policy for a single tray icon and a single popup window.
///
/// The host is passed into each call rather than owned, so it can borrow
/// short-lived toolkit handles (an active event loop) for that call only.
pub struct PopupController {
    options: Options,
    /// Resolved once from the preset and fine alignment
    alignment: Alignment,
    ready: bool,
    has_window: bool,
    /// Last known tray icon bounds
    cached_bounds: Option<Rect>,
}

impl PopupController {
    /// Create a controller using the running platform's default preset
    pub fn new(options: Options) -> Self {
        let alignment = options.resolve_alignment(platform::default_window_position());
        Self::with_alignment(options, alignment)
    }

    pub fn with_alignment(options: Options, alignment: Alignment) -> Self {
        debug!("Popup alignment resolved to {:?}", alignment);
        Self {
            options,
            alignment,
            ready: false,
            has_window: false,
            cached_bounds: None,
        }
    }

    /// Called once the tray icon exists
    pub fn ready(&mut self, host: &mut impl PopupHost) -> Result<()> {
        if self.options.preload_window {
            self.create_window(host)?;
        }
        self.ready = true;
        host.emit(PopupEvent::Ready);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn cached_bounds(&self) -> Option<Rect> {
        self.cached_bounds
    }

    pub fn has_window(&self) -> bool {
        self.has_window
    }

    /// Tray icon clicked (or double-clicked).
    ///
    /// Modifier clicks and clicks while the popup is open hide it; otherwise
    /// the popup is shown against the delivered (or cached) icon bounds.
    pub fn clicked(
        &mut self,
        host: &mut impl PopupHost,
        modifiers: ClickModifiers,
        bounds: Option<Rect>,
    ) -> Result<()> {
        if modifiers.any() {
            debug!("Modifier click {:?}, hiding popup", modifiers);
            self.hide(host);
            return Ok(());
        }

        if self.is_visible(host) {
            self.hide(host);
            return Ok(());
        }

        if let Some(bounds) = bounds.filter(|rect| !rect.is_empty()) {
            self.cached_bounds = Some(bounds);
        }
        self.show(host).map(|_| ())
    }

    /// Show or hide without a click, e.g. from a menu item
    pub fn toggle(&mut self, host: &mut impl PopupHost) -> Result<()> {
        if self.is_visible(host) {
            self.hide(host);
            Ok(())
        } else {
            self.show(host).map(|_| ())
        }
    }

    /// Position and reveal the popup, returning where it was placed
    pub fn show(&mut self, host: &mut impl PopupHost) -> Result<Point> {
        if !self.has_window {
            self.create_window(host)?;
        }

        host.emit(PopupEvent::Show);

        if self.cached_bounds.is_none() {
            self.cached_bounds = host.tray_bounds().filter(|rect| !rect.is_empty());
        }

        let screen = host.screen_context();
        let window = host.window_size();
        let computed = geometry::calculate(window, self.cached_bounds, self.alignment, &screen);

        let position = Point::new(
            self.options.window.x.unwrap_or(computed.x),
            self.options.window.y.unwrap_or(computed.y),
        );

        host.set_window_position(position);
        host.show_window();
        info!("Popup shown at ({}, {})", position.x, position.y);
        host.emit(PopupEvent::AfterShow);

        Ok(position)
    }

    pub fn hide(&mut self, host: &mut impl PopupHost) {
        if !self.has_window {
            return;
        }
        host.emit(PopupEvent::Hide);
        host.hide_window();
        info!("Popup hidden");
        host.emit(PopupEvent::AfterHide);
    }

    /// Popup lost focus
    pub fn window_blurred(&mut self, host: &mut impl PopupHost) {
        if !self.options.window.always_on_top {
            self.hide(host);
        }
    }

    /// Popup window was closed by the system; the next show recreates it
    pub fn window_closed(&mut self) {
        self.has_window = false;
    }

    fn is_visible(&self, host: &impl PopupHost) -> bool {
        self.has_window && host.is_window_visible()
    }

    fn create_window(&mut self, host: &mut impl PopupHost) -> Result<()> {
        host.emit(PopupEvent::CreateWindow);
        host.create_window(&self.options.window)?;
        self.has_window = true;
        host.emit(PopupEvent::AfterCreateWindow);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Display, HorizontalAlign};
    use anyhow::anyhow;

    /// Records every call made by the controller
    struct MockHost {
        visible: bool,
        created: u32,
        fail_create: bool,
        tray_bounds: Option<Rect>,
        tray_queries: std::cell::Cell<u32>,
        screen: ScreenContext,
        size: Size,
        position: Option<Point>,
        events: Vec<PopupEvent>,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                visible: false,
                created: 0,
                fail_create: false,
                tray_bounds: None,
                tray_queries: std::cell::Cell::new(0),
                screen: ScreenContext {
                    display: Display::new(Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1030)),
                    cursor: Point::new(1200, 760),
                    reports_tray_bounds: true,
                },
                size: Size::new(300, 400),
                position: None,
                events: Vec::new(),
            }
        }
    }

    impl PopupHost for MockHost {
        fn create_window(&mut self, _options: &WindowOptions) -> Result<()> {
            if self.fail_create {
                return Err(anyhow!("no display"));
            }
            self.created += 1;
            Ok(())
        }

        fn window_size(&self) -> Size {
            self.size
        }

        fn is_window_visible(&self) -> bool {
            self.visible
        }

        fn set_window_position(&mut self, position: Point) {
            self.position = Some(position);
        }

        fn show_window(&mut self) {
            self.visible = true;
        }

        fn hide_window(&mut self) {
            self.visible = false;
        }

        fn tray_bounds(&self) -> Option<Rect> {
            self.tray_queries.set(self.tray_queries.get() + 1);
            self.tray_bounds
        }

        fn screen_context(&self) -> ScreenContext {
            self.screen
        }

        fn emit(&mut self, event: PopupEvent) {
            self.events.push(event);
        }
    }

    fn controller(options: Options) -> PopupController {
        let alignment = options.resolve_alignment("trayCenter");
        PopupController::with_alignment(options, alignment)
    }

    fn icon() -> Rect {
        Rect::new(1000, 1030, 24, 24)
    }

    #[test]
    fn test_click_shows_at_icon() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();

        popup.clicked(&mut host, ClickModifiers::default(), Some(icon())).unwrap();

        assert!(host.visible);
        assert_eq!(host.position, Some(Point::new(862, 630)));
        assert_eq!(popup.cached_bounds(), Some(icon()));
    }

    #[test]
    fn test_second_click_hides() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();

        popup.clicked(&mut host, ClickModifiers::default(), Some(icon())).unwrap();
        popup.clicked(&mut host, ClickModifiers::default(), Some(icon())).unwrap();

        assert!(!host.visible);
        assert_eq!(host.created, 1);
    }

    #[test]
    fn test_modifier_click_hides_without_showing() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        let shift = ClickModifiers {
            shift: true,
            ..Default::default()
        };

        popup.clicked(&mut host, shift, Some(icon())).unwrap();

        assert!(!host.visible);
        assert_eq!(host.created, 0);
        assert!(host.events.is_empty());
        assert_eq!(popup.cached_bounds(), None);
    }

    #[test]
    fn test_cached_bounds_reused_when_click_has_none() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();

        popup.clicked(&mut host, ClickModifiers::default(), Some(icon())).unwrap();
        popup.hide(&mut host);
        popup.clicked(&mut host, ClickModifiers::default(), None).unwrap();

        assert_eq!(host.position, Some(Point::new(862, 630)));
        assert_eq!(host.tray_queries.get(), 0);
    }

    #[test]
    fn test_tray_queried_when_cache_empty() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        host.tray_bounds = Some(Rect::new(1500, 1030, 24, 24));

        let position = popup.show(&mut host).unwrap();

        assert_eq!(host.tray_queries.get(), 1);
        assert_eq!(popup.cached_bounds(), Some(Rect::new(1500, 1030, 24, 24)));
        assert_eq!(position, Point::new(1362, 630));
    }

    #[test]
    fn test_empty_bounds_fall_back_to_cursor() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        host.tray_bounds = Some(Rect::default());

        popup.clicked(&mut host, ClickModifiers::default(), Some(Rect::default())).unwrap();

        assert_eq!(popup.cached_bounds(), None);
        // Cursor at (1200, 760), flipped up since 760 + 400 > 1080
        assert_eq!(host.position, Some(Point::new(1200, 360)));
    }

    #[test]
    fn test_platform_without_tray_bounds_uses_cursor() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        host.screen.reports_tray_bounds = false;
        host.screen.display = Display::new(Rect::new(0, 0, 1280, 800), Rect::new(0, 0, 1280, 800));
        host.size = Size::new(300, 200);

        popup.clicked(&mut host, ClickModifiers::default(), Some(icon())).unwrap();

        assert_eq!(host.position, Some(Point::new(900, 560)));
    }

    #[test]
    fn test_configured_position_overrides_computed() {
        let mut options = Options::default();
        options.window.x = Some(10);
        let mut popup = controller(options);
        let mut host = MockHost::new();
        host.tray_bounds = Some(icon());

        let position = popup.show(&mut host).unwrap();

        assert_eq!(position, Point::new(10, 630));
        assert_eq!(host.position, Some(Point::new(10, 630)));
    }

    #[test]
    fn test_preset_alignment_applied() {
        let options = Options {
            window_position: Some("trayLeft".to_string()),
            ..Default::default()
        };
        let mut popup = controller(options);
        let mut host = MockHost::new();
        assert_eq!(popup.alignment().x, Some(HorizontalAlign::Right));

        popup.clicked(&mut host, ClickModifiers::default(), Some(icon())).unwrap();

        assert_eq!(host.position, Some(Point::new(1000, 630)));
    }

    #[test]
    fn test_show_event_order() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();

        popup.show(&mut host).unwrap();
        popup.hide(&mut host);

        assert_eq!(
            host.events,
            vec![
                PopupEvent::CreateWindow,
                PopupEvent::AfterCreateWindow,
                PopupEvent::Show,
                PopupEvent::AfterShow,
                PopupEvent::Hide,
                PopupEvent::AfterHide,
            ]
        );
    }

    #[test]
    fn test_hide_without_window_is_noop() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();

        popup.hide(&mut host);

        assert!(host.events.is_empty());
    }

    #[test]
    fn test_ready_preloads_window() {
        let options = Options {
            preload_window: true,
            ..Default::default()
        };
        let mut popup = controller(options);
        let mut host = MockHost::new();
        assert!(!popup.is_ready());

        popup.ready(&mut host).unwrap();

        assert!(popup.is_ready());
        assert!(popup.has_window());
        assert!(!host.visible);
        assert_eq!(
            host.events,
            vec![PopupEvent::CreateWindow, PopupEvent::AfterCreateWindow, PopupEvent::Ready]
        );
    }

    #[test]
    fn test_blur_hides_unless_always_on_top() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        popup.show(&mut host).unwrap();
        popup.window_blurred(&mut host);
        assert!(!host.visible);

        let mut options = Options::default();
        options.window.always_on_top = true;
        let mut pinned = controller(options);
        let mut pinned_host = MockHost::new();
        pinned.show(&mut pinned_host).unwrap();
        pinned.window_blurred(&mut pinned_host);
        assert!(pinned_host.visible);
    }

    #[test]
    fn test_closed_window_is_recreated() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        popup.show(&mut host).unwrap();
        popup.window_closed();
        host.visible = false;

        popup.toggle(&mut host).unwrap();

        assert_eq!(host.created, 2);
        assert!(host.visible);
    }

    #[test]
    fn test_toggle_hides_visible_popup() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();

        popup.toggle(&mut host).unwrap();
        assert!(host.visible);
        popup.toggle(&mut host).unwrap();
        assert!(!host.visible);
    }

    #[test]
    fn test_create_failure_propagates() {
        let mut popup = controller(Options::default());
        let mut host = MockHost::new();
        host.fail_create = true;

        assert!(popup.show(&mut host).is_err());
        assert!(!popup.has_window());
        assert!(!host.visible);
    }
}

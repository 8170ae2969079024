// ui/tray.rs - System Tray Icon Implementation
//
// Builds the tray icon and its context menu, and forwards clicks and menu
// selections to the winit event loop as `UserEvent`s.

use std::path::Path;
use std::sync::{Arc, Mutex};
#[cfg(target_os = "linux")]
use std::{sync::mpsc, thread};

use anyhow::{Context, Result};
use log::{error, info, warn};
use muda::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use winit::event_loop::EventLoopProxy;

use traypop::config::Options;
use traypop::constants;
use traypop::geometry::{Point, Rect};

use crate::UserEvent;

type SharedProxy = Arc<Mutex<Option<EventLoopProxy<UserEvent>>>>;

/// System tray icon manager
///
/// On Linux the icon belongs to a dedicated GTK thread, which owns it until
/// the tray is dropped.
pub struct SystemTray {
    /// The tray icon
    #[cfg(not(target_os = "linux"))]
    tray_icon: Option<TrayIcon>,
    /// Thread running the GTK main loop
    #[cfg(target_os = "linux")]
    gtk_thread: Option<thread::JoinHandle<()>>,
    /// Event loop proxy for sending events
    event_proxy: SharedProxy,
}

impl Default for SystemTray {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTray {
    /// Create a new system tray
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "linux"))]
            tray_icon: None,
            #[cfg(target_os = "linux")]
            gtk_thread: None,
            event_proxy: Arc::new(Mutex::new(None)),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn is_initialized(&self) -> bool {
        self.tray_icon.is_some()
    }

    #[cfg(target_os = "linux")]
    pub fn is_initialized(&self) -> bool {
        self.gtk_thread.is_some()
    }

    /// Initialize the tray icon. Must be called once the event loop runs.
    pub fn init(&mut self, event_proxy: EventLoopProxy<UserEvent>, options: &Options) -> Result<()> {
        info!("Initializing system tray icon");

        if let Ok(mut slot) = self.event_proxy.lock() {
            *slot = Some(event_proxy);
        }

        self.start(options)?;

        info!("System tray icon initialized successfully");
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn start(&mut self, options: &Options) -> Result<()> {
        self.tray_icon = Some(build_tray(options, &self.event_proxy)?);
        Ok(())
    }

    /// AppIndicator needs GTK initialized and its main loop running on the
    /// thread that builds the icon. Blocks until that thread reports back.
    #[cfg(target_os = "linux")]
    fn start(&mut self, options: &Options) -> Result<()> {
        let options = options.clone();
        let proxy = self.event_proxy.clone();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        let handle = thread::Builder::new()
            .name("tray-gtk".into())
            .spawn(move || {
                if let Err(e) = gtk::init() {
                    let _ = ready_tx.send(Err(anyhow::anyhow!("Failed to initialize GTK: {}", e)));
                    return;
                }

                match build_tray(&options, &proxy) {
                    Ok(_tray_icon) => {
                        let _ = ready_tx.send(Ok(()));
                        gtk::main();
                        info!("GTK main loop finished");
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                }
            })
            .context("Failed to spawn tray thread")?;

        ready_rx
            .recv()
            .context("Tray thread exited during startup")??;

        self.gtk_thread = Some(handle);
        Ok(())
    }

    /// Icon bounds in physical pixels, where the platform reports them
    #[cfg(not(target_os = "linux"))]
    pub fn rect(&self) -> Option<Rect> {
        self.tray_icon.as_ref()?.rect().map(|rect| to_rect(&rect))
    }

    #[cfg(target_os = "linux")]
    pub fn rect(&self) -> Option<Rect> {
        None
    }
}

#[cfg(target_os = "linux")]
impl Drop for SystemTray {
    fn drop(&mut self) {
        if let Some(handle) = self.gtk_thread.take() {
            gtk::glib::MainContext::default().invoke(gtk::main_quit);
            if handle.join().is_err() {
                error!("Tray thread panicked");
            }
        }
    }
}

/// Windows and macOS always open the tray menu on right click, so the menu
/// is left off when the right button toggles the popup. AppIndicator reports
/// no clicks and always needs it.
fn attach_menu(show_on_right_click: bool) -> bool {
    cfg!(target_os = "linux") || !show_on_right_click
}

/// Build the icon (and menu) and route its events to the event loop.
/// Runs on the thread that will drive the tray.
fn build_tray(options: &Options, proxy: &SharedProxy) -> Result<TrayIcon> {
    let mut builder = TrayIconBuilder::new()
        .with_tooltip(options.tooltip_text())
        .with_icon(load_icon(options.icon.as_deref())?);

    let menu_ids = if attach_menu(options.show_on_right_click) {
        let show = MenuItem::new("Show", true, None);
        let quit = MenuItem::new("Quit", true, None);

        let menu = Menu::new();
        menu.append_items(&[&show, &PredefinedMenuItem::separator(), &quit])?;

        // Left click belongs to the popup
        builder = builder.with_menu(Box::new(menu)).with_menu_on_left_click(false);
        Some((show.id().clone(), quit.id().clone()))
    } else {
        info!("Right click toggles the popup, tray menu disabled");
        None
    };

    let tray_icon = builder.build().context("Failed to create tray icon")?;
    install_handlers(proxy, menu_ids, options.show_on_right_click);
    Ok(tray_icon)
}

fn install_handlers(proxy: &SharedProxy, menu_ids: Option<(MenuId, MenuId)>, show_on_right_click: bool) {
    let tray_proxy = proxy.clone();
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        if let Some(user_event) = translate_tray_event(&event, show_on_right_click) {
            send_event(&tray_proxy, user_event);
        }
    }));

    if let Some((show, quit)) = menu_ids {
        let menu_proxy = proxy.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            if event.id() == &show {
                send_event(&menu_proxy, UserEvent::ShowRequested);
            } else if event.id() == &quit {
                send_event(&menu_proxy, UserEvent::Exit);
            }
        }));
    }
}

/// Send event to the main event loop
fn send_event(proxy: &SharedProxy, event: UserEvent) {
    let Ok(slot) = proxy.lock() else {
        error!("Tray event proxy poisoned, dropping {:?}", event);
        return;
    };
    if let Some(proxy) = slot.as_ref() {
        if let Err(e) = proxy.send_event(event) {
            error!("Failed to send tray event: {}", e);
        }
    }
}

/// Map a raw tray event to what the popup cares about
fn translate_tray_event(event: &TrayIconEvent, show_on_right_click: bool) -> Option<UserEvent> {
    let toggle_button = if show_on_right_click {
        MouseButton::Right
    } else {
        MouseButton::Left
    };

    match event {
        TrayIconEvent::Click {
            button,
            button_state: MouseButtonState::Up,
            rect,
            position,
            ..
        } if *button == toggle_button => Some(UserEvent::TrayClicked {
            bounds: Some(to_rect(rect)),
            cursor: Point::new(position.x.round() as i32, position.y.round() as i32),
        }),
        TrayIconEvent::DoubleClick { rect, position, .. } => Some(UserEvent::TrayClicked {
            bounds: Some(to_rect(rect)),
            cursor: Point::new(position.x.round() as i32, position.y.round() as i32),
        }),
        TrayIconEvent::Enter { position, .. } | TrayIconEvent::Move { position, .. } => Some(
            UserEvent::TrayPointer(Point::new(position.x.round() as i32, position.y.round() as i32)),
        ),
        _ => None,
    }
}

fn to_rect(rect: &tray_icon::Rect) -> Rect {
    Rect::new(
        rect.position.x.round() as i32,
        rect.position.y.round() as i32,
        rect.size.width as i32,
        rect.size.height as i32,
    )
}

/// Load the configured icon, falling back to the built-in glyph
fn load_icon(path: Option<&Path>) -> Result<Icon> {
    if let Some(path) = path {
        match load_icon_file(path) {
            Ok(icon) => return Ok(icon),
            Err(e) => warn!("{:#}, using built-in icon", e),
        }
    }

    let size = constants::icon::SIZE;
    Ok(Icon::from_rgba(glyph_rgba(size), size, size)?)
}

fn load_icon_file(path: &Path) -> Result<Icon> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load tray icon {:?}", path))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(Icon::from_rgba(image.into_raw(), width, height)?)
}

/// White popup glyph: a caret pointing at the bar above a panel
fn glyph_rgba(size: u32) -> Vec<u8> {
    let mut data = vec![0u8; (size * size * 4) as usize];
    let mid = size / 2;
    let caret_rows = size / 4;

    for y in 0..size {
        for x in 0..size {
            let caret = y < caret_rows && x.abs_diff(mid) <= y;
            let panel = y >= caret_rows && y < size - 1 && x >= 1 && x < size - 1;
            if caret || panel {
                let offset = ((y * size + x) * 4) as usize;
                data[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }

    data
}

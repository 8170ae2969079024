// main.rs - TrayPop Application Entry Point
//
// This is the orchestrator for the application. It manages:
// 1. The tray icon (created once the event loop is running)
// 2. The popup window, created lazily by the controller
// 3. Routing tray clicks and window focus changes to the popup controller

mod ui;
mod window_manager;

use anyhow::Result;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::WindowId,
};

use traypop::app::{ClickModifiers, PopupController};
use traypop::config::Options;
use traypop::geometry::{Point, Rect};

use ui::SystemTray;
use window_manager::{PopupWindow, WinitHost};

/// Custom user events for the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// Tray icon clicked or double-clicked
    TrayClicked { bounds: Option<Rect>, cursor: Point },
    /// Pointer moved over the tray icon
    TrayPointer(Point),
    /// "Show" picked from the tray menu
    ShowRequested,
    /// Exit application
    Exit,
}

/// Main application struct
struct TrayPopApp {
    /// Show/hide policy
    controller: PopupController,
    /// System tray icon
    tray: SystemTray,
    /// Popup window, once created
    popup: Option<PopupWindow>,
    /// Modifiers last reported while the popup had focus
    modifiers: ClickModifiers,
    /// Last pointer position seen in a tray event
    last_cursor: Option<Point>,
    /// Event loop proxy handed to the tray
    event_proxy: EventLoopProxy<UserEvent>,
}

impl TrayPopApp {
    fn new(options: Options, event_proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            controller: PopupController::new(options),
            tray: SystemTray::new(),
            popup: None,
            modifiers: ClickModifiers::default(),
            last_cursor: None,
            event_proxy,
        }
    }

    /// Run one controller call against the live toolkit, logging failures
    fn with_host(
        &mut self,
        event_loop: &ActiveEventLoop,
        action: impl FnOnce(&mut PopupController, &mut WinitHost) -> Result<()>,
    ) {
        let mut host = WinitHost::new(event_loop, &mut self.popup, &self.tray, self.last_cursor);
        if let Err(e) = action(&mut self.controller, &mut host) {
            error!("Popup error: {:#}", e);
        }
    }

    fn is_popup(&self, window_id: WindowId) -> bool {
        self.popup.as_ref().is_some_and(|popup| popup.id() == window_id)
    }
}

impl ApplicationHandler<UserEvent> for TrayPopApp {
    /// Tray icons must be created after the event loop has started
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.tray.is_initialized() {
            return;
        }

        info!("Application resumed");

        if let Err(e) = self.tray.init(self.event_proxy.clone(), self.controller.options()) {
            error!("Failed to create tray icon: {:#}", e);
            event_loop.exit();
            return;
        }

        self.with_host(event_loop, |controller, host| controller.ready(host));
        info!("Tray ready");
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::TrayClicked { bounds, cursor } => {
                self.last_cursor = Some(cursor);
                let modifiers = self.modifiers;
                self.with_host(event_loop, |controller, host| {
                    controller.clicked(host, modifiers, bounds)
                });
            }
            UserEvent::TrayPointer(cursor) => {
                self.last_cursor = Some(cursor);
            }
            UserEvent::ShowRequested => {
                self.with_host(event_loop, |controller, host| controller.toggle(host));
            }
            UserEvent::Exit => {
                info!("Exit requested from tray menu");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if !self.is_popup(window_id) {
            return;
        }

        match event {
            WindowEvent::Focused(false) => {
                self.modifiers = ClickModifiers::default();
                self.with_host(event_loop, |controller, host| {
                    controller.window_blurred(host);
                    Ok(())
                });
            }

            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                info!("Popup window closed");
                self.popup = None;
                self.controller.window_closed();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = click_modifiers(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.with_host(event_loop, |controller, host| {
                        controller.hide(host);
                        Ok(())
                    });
                }
            }

            _ => {}
        }
    }
}

fn click_modifiers(state: ModifiersState) -> ClickModifiers {
    ClickModifiers {
        alt: state.alt_key(),
        shift: state.shift_key(),
        ctrl: state.control_key(),
        meta: state.super_key(),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("TrayPop starting...");

    let options = Options::load();

    #[allow(unused_mut)]
    let mut builder = EventLoop::<UserEvent>::with_user_event();

    #[cfg(target_os = "macos")]
    if !options.show_dock_icon {
        use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
        builder.with_activation_policy(ActivationPolicy::Accessory);
    }

    // Create the winit event loop
    let event_loop = builder.build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = TrayPopApp::new(options, event_loop.create_proxy());

    // Run the event loop
    event_loop.run_app(&mut app)?;

    info!("TrayPop shutting down");
    Ok(())
}

// ui/mod.rs - Tray User Interface
//
// The tray icon and its menu. The popup's content is left to the embedding
// application.

mod tray;

pub use tray::SystemTray;

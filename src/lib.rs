//! TrayPop - Menu-bar Style Tray Popup Library
//!
//! This library provides the popup positioning engine, the show/hide
//! controller and the platform queries behind them. The binary wires them to
//! a real tray icon and window.

pub mod app;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod platform;

// Re-export commonly used types
pub use app::{ClickModifiers, PopupController, PopupEvent, PopupHost};
pub use config::{Options, WindowOptions, WindowPosition};
pub use geometry::{
    Alignment, Display, HorizontalAlign, Point, Rect, ScreenContext, Size, TaskbarEdge,
    VerticalAlign,
};

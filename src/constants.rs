// constants.rs - Application-wide Constants
//
// Centralized names, dimensions and fallbacks shared by the controller,
// the platform layer and the binary.

/// Application identity
pub mod app {
    /// Human readable name (tooltip fallback, logs)
    pub const NAME: &str = "TrayPop";
    /// Directory name under the OS config dir
    pub const CONFIG_DIR: &str = "traypop";
    /// Options file inside `CONFIG_DIR`
    pub const CONFIG_FILE: &str = "options.json";
}

/// Popup window defaults
pub mod popup {
    /// Default window width
    pub const DEFAULT_WIDTH: u32 = 400;
    /// Default window height
    pub const DEFAULT_HEIGHT: u32 = 400;
    /// Title set on the (frameless) popup window
    pub const TITLE: &str = "TrayPop";
}

/// Window position presets understood by the controller
pub mod preset {
    /// Default on Windows, where the tray usually sits bottom-right
    pub const WINDOWS_DEFAULT: &str = "trayBottomRight";
    /// Default on macOS and Linux
    pub const DEFAULT: &str = "trayCenter";
}

/// Display used when the platform reports no monitor at all
pub mod display {
    pub const FALLBACK_WIDTH: i32 = 1920;
    pub const FALLBACK_HEIGHT: i32 = 1080;
    /// macOS menu bar height when the status item cannot tell us
    pub const MENU_BAR_HEIGHT: i32 = 24;
}

/// Generated tray icon
pub mod icon {
    /// Side length of the built-in RGBA glyph
    pub const SIZE: u32 = 16;
}

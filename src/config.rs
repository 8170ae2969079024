// config.rs - Popup Options and Persistence
//
// Options are read from a JSON file in the platform config directory.
// Every field is optional; a missing or broken file never stops the app.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::geometry::{Alignment, HorizontalAlign, VerticalAlign};

/// Named window placement presets.
///
/// The name says where the window sits relative to the tray icon; `Bottom`
/// variants are meant for a taskbar at the bottom of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    TrayCenter,
    TrayLeft,
    TrayRight,
    TrayBottomCenter,
    TrayBottomLeft,
    TrayBottomRight,
}

impl WindowPosition {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "trayCenter" => Some(Self::TrayCenter),
            "trayLeft" => Some(Self::TrayLeft),
            "trayRight" => Some(Self::TrayRight),
            "trayBottomCenter" => Some(Self::TrayBottomCenter),
            "trayBottomLeft" => Some(Self::TrayBottomLeft),
            "trayBottomRight" => Some(Self::TrayBottomRight),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TrayCenter => "trayCenter",
            Self::TrayLeft => "trayLeft",
            Self::TrayRight => "trayRight",
            Self::TrayBottomCenter => "trayBottomCenter",
            Self::TrayBottomLeft => "trayBottomLeft",
            Self::TrayBottomRight => "trayBottomRight",
        }
    }

    /// Decompose the preset into the engine's alignment form
    pub fn alignment(self) -> Alignment {
        // A window on the tray's left edge extends to the right, hence the swap
        let (x, y) = match self {
            Self::TrayCenter => (HorizontalAlign::Center, None),
            Self::TrayLeft => (HorizontalAlign::Right, None),
            Self::TrayRight => (HorizontalAlign::Left, None),
            Self::TrayBottomCenter => (HorizontalAlign::Center, Some(VerticalAlign::Up)),
            Self::TrayBottomLeft => (HorizontalAlign::Right, Some(VerticalAlign::Up)),
            Self::TrayBottomRight => (HorizontalAlign::Left, Some(VerticalAlign::Up)),
        };
        Alignment::new(Some(x), y)
    }
}

impl std::fmt::Display for WindowPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw alignment names as written in the options file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentNames {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AlignmentNames {
    /// Unrecognized names are dropped so the edge default applies
    pub fn parse(&self) -> Alignment {
        let alignment = Alignment::from_names(self.x.as_deref(), self.y.as_deref());
        if self.x.is_some() && alignment.x.is_none() {
            warn!("Unknown x alignment {:?}, using edge default", self.x);
        }
        if self.y.is_some() && alignment.y.is_none() {
            warn!("Unknown y alignment {:?}, using edge default", self.y);
        }
        alignment
    }
}

/// Popup window options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub width: u32,
    pub height: u32,
    /// Fixed x position, overriding the computed one
    pub x: Option<i32>,
    /// Fixed y position, overriding the computed one
    pub y: Option<i32>,
    /// Keep the popup open (and above other windows) when it loses focus
    pub always_on_top: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: constants::popup::DEFAULT_WIDTH,
            height: constants::popup::DEFAULT_HEIGHT,
            x: None,
            y: None,
            always_on_top: false,
        }
    }
}

/// Application options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Preset name; the platform default is used when unset
    pub window_position: Option<String>,
    /// Fine alignment, applied on top of the preset
    pub alignment: AlignmentNames,
    /// Create the popup window at startup instead of on first show
    pub preload_window: bool,
    /// Keep the dock icon (macOS)
    pub show_dock_icon: bool,
    /// Toggle on right click instead of left click
    pub show_on_right_click: bool,
    pub tooltip: String,
    /// Tray icon image; a built-in glyph is used when unset
    pub icon: Option<PathBuf>,
    pub window: WindowOptions,
}

impl Options {
    /// Default location of the options file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(constants::app::CONFIG_DIR)
                .join(constants::app::CONFIG_FILE)
        })
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("No config directory on this platform, using default options");
            return Self::default();
        };

        if !path.exists() {
            info!("No options file at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(options) => {
                info!("Options loaded from {:?}", path);
                options
            }
            Err(e) => {
                error!("Failed to load options: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {:?}", path))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse options file {:?}", path))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize options")?;
        fs::write(path, json).with_context(|| format!("Failed to write options file {:?}", path))?;
        info!("Options saved to {:?}", path);
        Ok(())
    }

    /// Resolve preset + fine alignment into the engine's form.
    ///
    /// `default_preset` is the platform's preset, used when none is configured.
    pub fn resolve_alignment(&self, default_preset: &str) -> Alignment {
        let name = self.window_position.as_deref().unwrap_or(default_preset);
        let preset = match WindowPosition::from_name(name) {
            Some(preset) => {
                debug!("Window position preset {}", preset);
                preset.alignment()
            }
            None => {
                warn!("Unknown window position preset {:?}, using edge defaults", name);
                Alignment::default()
            }
        };
        preset.overridden_by(self.alignment.parse())
    }

    /// Tooltip shown on the tray icon
    pub fn tooltip_text(&self) -> &str {
        if self.tooltip.is_empty() {
            constants::app::NAME
        } else {
            &self.tooltip
        }
    }
}

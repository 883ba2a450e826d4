use serde::{Deserialize, Serialize};

use crate::viewer::DEFAULT_ZOOM;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppTheme {
    #[default]
    System,
    Light,
    Dark,
}

impl AppTheme {
    pub const ALL: [Self; 3] = [Self::System, Self::Light, Self::Dark];

    /// Resolves `System` through the desktop's preference.
    pub fn is_dark(self) -> bool {
        match self {
            Self::Dark => true,
            Self::Light => false,
            Self::System => matches!(dark_light::detect(), Ok(dark_light::Mode::Dark)),
        }
    }
}

impl From<&str> for AppTheme {
    fn from(s: &str) -> Self {
        match s {
            "Light" => Self::Light,
            "Dark" => Self::Dark,
            _ => Self::System,
        }
    }
}

impl std::fmt::Display for AppTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::System => "System",
            Self::Light => "Light",
            Self::Dark => "Dark",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: AppTheme,
    pub default_zoom: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: AppTheme::default(),
            default_zoom: DEFAULT_ZOOM,
        }
    }
}

impl AppSettings {
    /// Non-positive or non-finite zoom values fall back to the default.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.default_zoom.is_finite() || self.default_zoom <= 0.0 {
            self.default_zoom = DEFAULT_ZOOM;
        }
        self
    }
}

//! Editor settings

use serde::{Deserialize, Serialize};
use shared::Background;

/// Unit system for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    Centimeters,
    Millimeters,
    Inches,
    Pixels,
}

impl Units {
    /// Get the abbreviation for this unit
    pub fn abbrev(&self) -> &'static str {
        match self {
            Units::Centimeters => "cm",
            Units::Millimeters => "mm",
            Units::Inches => "in",
            Units::Pixels => "px",
        }
    }

    /// Get the display name for this unit
    pub fn display_name(&self) -> &'static str {
        match self {
            Units::Centimeters => "Centimeters",
            Units::Millimeters => "Millimeters",
            Units::Inches => "Inches",
            Units::Pixels => "Pixels",
        }
    }

    /// Pixels per one of this unit at the given print density
    pub fn to_px(&self, dpi: f64) -> f64 {
        match self {
            Units::Centimeters => dpi / 2.54,
            Units::Millimeters => dpi / 25.4,
            Units::Inches => dpi,
            Units::Pixels => 1.0,
        }
    }

    /// All available units
    pub fn all() -> &'static [Units] {
        &[
            Units::Centimeters,
            Units::Millimeters,
            Units::Inches,
            Units::Pixels,
        ]
    }
}

/// Defaults applied to newly created documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDefaults {
    /// Sheet width in pixels
    pub width: f64,
    /// Sheet height in pixels
    pub height: f64,
    /// Print density
    pub dpi: f64,
    /// Background fill
    pub background: Background,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            dpi: 300.0,
            background: Background::Transparent,
        }
    }
}

/// Defaults applied to fill directives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillDefaults {
    /// Spacing between copies in pixels
    pub gap: f64,
}

impl Default for FillDefaults {
    fn default() -> Self {
        Self { gap: 10.0 }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Display units
    pub units: Units,
    /// New-document defaults
    pub document: DocumentDefaults,
    /// Fill defaults
    #[serde(default)]
    pub fill: FillDefaults,
}

impl EditorSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "sheetlab", "sheetlab") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "sheetlab", "sheetlab") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(Units::Pixels.to_px(300.0), 1.0);
        assert_eq!(Units::Inches.to_px(300.0), 300.0);
        assert!((Units::Centimeters.to_px(300.0) - 118.110_236).abs() < 1e-5);
        assert!((Units::Millimeters.to_px(300.0) - 11.811_023).abs() < 1e-5);
    }

    #[test]
    fn test_defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.units, Units::Centimeters);
        assert_eq!(s.document.width, 1000.0);
        assert_eq!(s.document.dpi, 300.0);
        assert_eq!(s.fill.gap, 10.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut s = EditorSettings::default();
        s.units = Units::Inches;
        s.document.dpi = 150.0;
        let json = serde_json::to_string(&s).unwrap();
        let back: EditorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.units, Units::Inches);
        assert_eq!(back.document.dpi, 150.0);
    }

    #[test]
    fn test_missing_fill_section_defaults() {
        let json = r#"{"units": "Pixels", "document": {"width": 500.0, "height": 500.0, "dpi": 72.0, "background": {"type": "white"}}}"#;
        let s: EditorSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.fill.gap, 10.0);
    }
}

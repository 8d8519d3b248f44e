use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, de};

use crate::region::{ZONE_CATEGORIES, ZoneCategory};

/// Viewer configuration, read from `assets/config/viewer.toml`.
///
/// A missing or malformed file is not fatal: the viewer logs a warning
/// and runs on the built-in defaults.
#[derive(Resource, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub zones: Vec<ZoneStyle>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical extent of the orthographic view volume, in world units
    pub viewport_height: f32,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
}

/// One entry of the static zone style table
#[derive(Deserialize, Debug, Clone)]
pub struct ZoneStyle {
    pub code: char,
    pub label: String,
    #[serde(deserialize_with = "deserialize_hex_color")]
    pub color: [f32; 3],
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    let s = s.trim_start_matches('#');
    if s.len() != 6 {
        return Err(de::Error::custom("hex color must be 6 characters"));
    }
    let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
    let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
    let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
    Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Region Viewer".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_height: 40.0,
            yaw_degrees: 45.0,
            pitch_degrees: 35.0,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let zones = ZONE_CATEGORIES
            .iter()
            .map(|zone| {
                let srgba = zone.fallback_color().to_srgba();
                ZoneStyle {
                    code: zone.code(),
                    label: zone.fallback_label().to_string(),
                    color: [srgba.red, srgba.green, srgba.blue],
                }
            })
            .collect();
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            zones,
        }
    }
}

impl ViewerConfig {
    /// Load the config file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(err) => {
                    warn!("failed to parse {}: {err}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to read {}: {err}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

/// The zone -> color and zone -> label lookup tables, built from config.
///
/// Lookups never fail: a category missing from the table resolves to the
/// Unknown entry, and failing that to the built-in style.
#[derive(Resource, Debug, Clone)]
pub struct ZonePalette {
    colors: HashMap<ZoneCategory, Color>,
    labels: HashMap<ZoneCategory, String>,
}

impl ZonePalette {
    pub fn from_config(zones: &[ZoneStyle]) -> Self {
        let mut colors = HashMap::new();
        let mut labels = HashMap::new();
        for style in zones {
            let zone = ZoneCategory::from_code(style.code);
            let [r, g, b] = style.color;
            colors.insert(zone, Color::srgb(r, g, b));
            labels.insert(zone, style.label.clone());
        }
        Self { colors, labels }
    }

    pub fn color(&self, zone: ZoneCategory) -> Color {
        self.colors
            .get(&zone)
            .or_else(|| self.colors.get(&ZoneCategory::Unknown))
            .copied()
            .unwrap_or_else(|| zone.fallback_color())
    }

    pub fn label(&self, zone: ZoneCategory) -> String {
        self.labels
            .get(&zone)
            .cloned()
            .unwrap_or_else(|| zone.fallback_label().to_string())
    }

    /// Legend rows in display order
    pub fn entries(&self) -> impl Iterator<Item = (ZoneCategory, Color, String)> + '_ {
        ZONE_CATEGORIES
            .iter()
            .map(|&zone| (zone, self.color(zone), self.label(zone)))
    }
}

impl Default for ZonePalette {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default().zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_toml() {
        let raw = r##"
            [window]
            width = 800.0
            height = 600.0
            title = "Test Viewer"

            [camera]
            viewport_height = 30.0
            yaw_degrees = 40.0
            pitch_degrees = 30.0

            [[zones]]
            code = "r"
            label = "Homes"
            color = "#11aa22"
        "##;
        let config: ViewerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.window.title, "Test Viewer");
        assert_eq!(config.zones.len(), 1);
        assert_eq!(config.zones[0].code, 'r');
        assert!((config.zones[0].color[0] - 0x11 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_hex_color_rejected() {
        let raw = r##"
            [[zones]]
            code = "r"
            label = "Homes"
            color = "#11aa2"
        "##;
        assert!(toml::from_str::<ViewerConfig>(raw).is_err());
    }

    #[test]
    fn test_missing_zone_falls_back_to_unknown() {
        let zones = vec![ZoneStyle {
            code: 'u',
            label: "Unzoned".to_string(),
            color: [0.5, 0.5, 0.5],
        }];
        let palette = ZonePalette::from_config(&zones);
        assert_eq!(
            palette.color(ZoneCategory::Residential),
            Color::srgb(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn test_empty_palette_uses_builtin_style() {
        let palette = ZonePalette::from_config(&[]);
        assert_eq!(
            palette.color(ZoneCategory::Water),
            ZoneCategory::Water.fallback_color()
        );
        assert_eq!(palette.label(ZoneCategory::Park), "Park");
    }

    #[test]
    fn test_default_palette_covers_all_zones() {
        let palette = ZonePalette::default();
        assert_eq!(palette.entries().count(), ZONE_CATEGORIES.len());
    }
}

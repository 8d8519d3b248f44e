use bevy::prelude::*;

/// Land-use categories for region tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneCategory {
    Residential,
    Commercial,
    Industrial,
    Park,
    Water,
    Unknown,
}

/// Display order for legends and palettes
pub const ZONE_CATEGORIES: [ZoneCategory; 6] = [
    ZoneCategory::Residential,
    ZoneCategory::Commercial,
    ZoneCategory::Industrial,
    ZoneCategory::Park,
    ZoneCategory::Water,
    ZoneCategory::Unknown,
];

impl ZoneCategory {
    /// Convert from the one-letter wire code used by the region backend
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_lowercase() {
            'r' => ZoneCategory::Residential,
            'c' => ZoneCategory::Commercial,
            'i' => ZoneCategory::Industrial,
            'p' => ZoneCategory::Park,
            'w' => ZoneCategory::Water,
            _ => ZoneCategory::Unknown,
        }
    }

    /// The one-letter wire code for this category
    pub fn code(&self) -> char {
        match self {
            ZoneCategory::Residential => 'r',
            ZoneCategory::Commercial => 'c',
            ZoneCategory::Industrial => 'i',
            ZoneCategory::Park => 'p',
            ZoneCategory::Water => 'w',
            ZoneCategory::Unknown => 'u',
        }
    }

    /// Built-in fill color, used when the configured palette has no entry
    pub fn fallback_color(&self) -> Color {
        match self {
            ZoneCategory::Residential => Color::srgb(0.55, 0.76, 0.49),
            ZoneCategory::Commercial => Color::srgb(0.36, 0.54, 0.78),
            ZoneCategory::Industrial => Color::srgb(0.79, 0.69, 0.39),
            ZoneCategory::Park => Color::srgb(0.42, 0.72, 0.35),
            ZoneCategory::Water => Color::srgb(0.25, 0.44, 0.69),
            ZoneCategory::Unknown => Color::srgb(0.62, 0.62, 0.62),
        }
    }

    /// Built-in human-readable label
    pub fn fallback_label(&self) -> &'static str {
        match self {
            ZoneCategory::Residential => "Residential",
            ZoneCategory::Commercial => "Commercial",
            ZoneCategory::Industrial => "Industrial",
            ZoneCategory::Park => "Park",
            ZoneCategory::Water => "Water",
            ZoneCategory::Unknown => "Unzoned",
        }
    }
}

/// One grid cell of a region.
///
/// Coordinates are grid-integral by construction. `population` is absent
/// for tiles the backend carries no census figure for; such tiles render
/// as a flat base plate with no building volume.
#[derive(Debug, Clone)]
pub struct Tile {
    pub coordinates: IVec2,
    pub zone: ZoneCategory,
    pub population: Option<f32>,
}

impl Tile {
    pub fn new(x: i32, y: i32, zone: ZoneCategory, population: Option<f32>) -> Self {
        Self {
            coordinates: IVec2::new(x, y),
            zone,
            population,
        }
    }
}

/// A complete region snapshot as delivered by the subscription adapter.
/// Immutable once delivered; a new snapshot replaces the whole scene.
#[derive(Debug, Clone)]
pub struct RegionModel {
    pub name: String,
    pub tiles: Vec<Tile>,
}

impl RegionModel {
    pub fn new(name: impl Into<String>, tiles: Vec<Tile>) -> Self {
        Self {
            name: name.into(),
            tiles,
        }
    }

    /// Center of the tile grid in grid coordinates, for camera targeting
    pub fn grid_center(&self) -> Vec2 {
        if self.tiles.is_empty() {
            return Vec2::ZERO;
        }
        let mut min = IVec2::MAX;
        let mut max = IVec2::MIN;
        for tile in &self.tiles {
            min = min.min(tile.coordinates);
            max = max.max(tile.coordinates);
        }
        (min.as_vec2() + max.as_vec2()) / 2.0
    }
}

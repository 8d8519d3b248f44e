use bevy::color::Srgba;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use noise::{Fbm, NoiseFn, Perlin};

use crate::config::ZonePalette;
use crate::region::ZoneCategory;

/// Flat color for non-commercial building volumes (#eeeeee)
pub const BUILDING_COLOR: Color = Color::Srgba(Srgba::new(0.933, 0.933, 0.933, 1.0));
/// Flat color for commercial building volumes (#aaccee)
pub const COMMERCIAL_BUILDING_COLOR: Color = Color::Srgba(Srgba::new(0.667, 0.8, 0.933, 1.0));

/// Pure description of a volume's surface, resolved before any asset
/// is touched. Realization decides between the shared textured handles
/// and a freshly constructed material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialSpec {
    /// Fully diffuse flat fill, used for base plates
    Matte { color: Color },
    /// Default-shaded flat color, used for building volumes
    Flat { color: Color },
    WaterSurface,
    GrassSurface,
}

/// Style for a tile's base plate. Water and Park use the two shared
/// textured materials; every other category gets a matte fill in its
/// palette color.
pub fn resolve_base_material(zone: ZoneCategory, palette: &ZonePalette) -> MaterialSpec {
    match zone {
        ZoneCategory::Water => MaterialSpec::WaterSurface,
        ZoneCategory::Park => MaterialSpec::GrassSurface,
        other => MaterialSpec::Matte {
            color: palette.color(other),
        },
    }
}

/// Style for a tile's building volumes: commercial blue-grey, plain
/// off-white for everything else.
pub fn resolve_building_material(zone: ZoneCategory) -> MaterialSpec {
    let color = if zone == ZoneCategory::Commercial {
        COMMERCIAL_BUILDING_COLOR
    } else {
        BUILDING_COLOR
    };
    MaterialSpec::Flat { color }
}

/// The two process-wide textured materials, created once at startup and
/// reused by every Water/Park tile. Never registered with the scene
/// primitive registry, so destroy cycles cannot release them.
#[derive(Resource)]
pub struct SharedMaterials {
    pub water: Handle<StandardMaterial>,
    pub grass: Handle<StandardMaterial>,
}

/// Turn a material spec into a concrete handle. Returns `true` when the
/// material was freshly constructed and must be registered for release
/// on the next destroy cycle.
pub fn realize_material(
    spec: &MaterialSpec,
    shared: &SharedMaterials,
    materials: &mut Assets<StandardMaterial>,
) -> (Handle<StandardMaterial>, bool) {
    match spec {
        MaterialSpec::WaterSurface => (shared.water.clone(), false),
        MaterialSpec::GrassSurface => (shared.grass.clone(), false),
        MaterialSpec::Matte { color } => (
            materials.add(StandardMaterial {
                base_color: *color,
                perceptual_roughness: 1.0,
                ..default()
            }),
            true,
        ),
        MaterialSpec::Flat { color } => (
            materials.add(StandardMaterial {
                base_color: *color,
                ..default()
            }),
            true,
        ),
    }
}

/// Setup system: synthesize the water and grass surface textures and
/// wrap them in the shared materials
pub fn setup_shared_materials(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let water_image = images.add(surface_texture(
        [0.13, 0.33, 0.62],
        [0.33, 0.55, 0.78],
        7,
        6.0,
    ));
    let grass_image = images.add(surface_texture(
        [0.20, 0.46, 0.19],
        [0.37, 0.64, 0.30],
        11,
        9.0,
    ));

    let water = materials.add(StandardMaterial {
        base_color_texture: Some(water_image),
        perceptual_roughness: 0.35,
        ..default()
    });
    let grass = materials.add(StandardMaterial {
        base_color_texture: Some(grass_image),
        perceptual_roughness: 0.9,
        ..default()
    });

    commands.insert_resource(SharedMaterials { water, grass });
}

const SURFACE_TEXTURE_SIZE: u32 = 64;

/// Generate a small tileable-looking surface texture by blending two
/// colors through fractal noise
fn surface_texture(base: [f32; 3], accent: [f32; 3], seed: u32, scale: f64) -> Image {
    let fbm = Fbm::<Perlin>::new(seed);
    let size = SURFACE_TEXTURE_SIZE;
    let mut data = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let nx = x as f64 / size as f64 * scale;
            let ny = y as f64 / size as f64 * scale;
            let t = (fbm.get([nx, ny]) as f32 * 0.5 + 0.5).clamp(0.0, 1.0);

            for channel in 0..3 {
                let value = base[channel] + (accent[channel] - base[channel]) * t;
                data.push((value * 255.0) as u8);
            }
            data.push(255);
        }
    }

    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_shared() -> (SharedMaterials, Assets<StandardMaterial>) {
        let mut materials = Assets::default();
        let shared = SharedMaterials {
            water: materials.add(StandardMaterial::default()),
            grass: materials.add(StandardMaterial::default()),
        };
        (shared, materials)
    }

    #[test]
    fn test_base_resolution_by_zone() {
        let palette = ZonePalette::default();
        assert_eq!(
            resolve_base_material(ZoneCategory::Water, &palette),
            MaterialSpec::WaterSurface
        );
        assert_eq!(
            resolve_base_material(ZoneCategory::Park, &palette),
            MaterialSpec::GrassSurface
        );
        assert_eq!(
            resolve_base_material(ZoneCategory::Residential, &palette),
            MaterialSpec::Matte {
                color: palette.color(ZoneCategory::Residential)
            }
        );
    }

    #[test]
    fn test_building_material_two_way_choice() {
        assert_eq!(
            resolve_building_material(ZoneCategory::Commercial),
            MaterialSpec::Flat {
                color: COMMERCIAL_BUILDING_COLOR
            }
        );
        for zone in [
            ZoneCategory::Residential,
            ZoneCategory::Industrial,
            ZoneCategory::Water,
            ZoneCategory::Unknown,
        ] {
            assert_eq!(
                resolve_building_material(zone),
                MaterialSpec::Flat {
                    color: BUILDING_COLOR
                }
            );
        }
    }

    #[test]
    fn test_shared_specs_reuse_the_same_handle() {
        let (shared, mut materials) = test_shared();
        let (first, owned_first) =
            realize_material(&MaterialSpec::WaterSurface, &shared, &mut materials);
        let (second, owned_second) =
            realize_material(&MaterialSpec::WaterSurface, &shared, &mut materials);
        assert_eq!(first, second);
        assert_eq!(first, shared.water);
        assert!(!owned_first && !owned_second);
    }

    #[test]
    fn test_flat_specs_construct_fresh_materials() {
        let (shared, mut materials) = test_shared();
        let spec = MaterialSpec::Flat {
            color: BUILDING_COLOR,
        };
        let (first, owned_first) = realize_material(&spec, &shared, &mut materials);
        let (second, owned_second) = realize_material(&spec, &shared, &mut materials);
        assert_ne!(first, second, "building materials are per tile, not cached");
        assert!(owned_first && owned_second);
    }

    #[test]
    fn test_surface_texture_dimensions() {
        let image = surface_texture([0.1, 0.2, 0.3], [0.4, 0.5, 0.6], 1, 4.0);
        assert_eq!(image.width(), SURFACE_TEXTURE_SIZE);
        assert_eq!(image.height(), SURFACE_TEXTURE_SIZE);
    }
}

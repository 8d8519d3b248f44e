use bevy::prelude::*;
use noise::{Fbm, NoiseFn, Perlin};
use rand::Rng;

use crate::region::{RegionModel, RegionSnapshot, Tile, ZoneCategory};

/// Side length of an archetype region, in tiles
pub const REGION_GRID: usize = 4;

/// A canned demo region: total population plus zoning proportions, laid
/// out the way the region backend allots zone letters to grid cells.
pub struct RegionArchetype {
    pub name: &'static str,
    pub population: f32,
    pub zoning: &'static [(ZoneCategory, f32)],
}

pub const ARCHETYPES: &[RegionArchetype] = &[
    RegionArchetype {
        name: "Harbourside",
        population: 9_800.0,
        zoning: &[
            (ZoneCategory::Water, 0.35),
            (ZoneCategory::Commercial, 0.25),
            (ZoneCategory::Residential, 0.30),
            (ZoneCategory::Park, 0.10),
        ],
    },
    RegionArchetype {
        name: "Greenfield Estate",
        population: 6_400.0,
        zoning: &[
            (ZoneCategory::Residential, 0.65),
            (ZoneCategory::Park, 0.25),
            (ZoneCategory::Commercial, 0.10),
        ],
    },
    RegionArchetype {
        name: "Central Business District",
        population: 62_000.0,
        zoning: &[
            (ZoneCategory::Commercial, 0.70),
            (ZoneCategory::Residential, 0.20),
            (ZoneCategory::Park, 0.10),
        ],
    },
    RegionArchetype {
        name: "Millbrook Industrial Park",
        population: 3_100.0,
        zoning: &[
            (ZoneCategory::Industrial, 0.55),
            (ZoneCategory::Commercial, 0.15),
            (ZoneCategory::Residential, 0.20),
            (ZoneCategory::Water, 0.10),
        ],
    },
];

/// Expand an archetype into a populated tile grid.
///
/// Population is spread over the grid by normalized uniform weights;
/// zone letters are allotted cell counts by rounded proportion and the
/// remainder is padded as Unknown. Water and Park cells carry no census
/// figure, so they render as flat plates.
pub fn tiles_from_archetype(archetype: &RegionArchetype, rng: &mut impl Rng) -> RegionModel {
    let cell_count = REGION_GRID * REGION_GRID;

    let weights: Vec<f32> = (0..cell_count).map(|_| rng.random::<f32>()).collect();
    let weight_sum: f32 = weights.iter().sum();

    let proportion_sum: f32 = archetype.zoning.iter().map(|(_, p)| p).sum();
    let mut zones = Vec::with_capacity(cell_count);
    for &(zone, proportion) in archetype.zoning {
        let cells = ((proportion / proportion_sum) * cell_count as f32).round() as usize;
        zones.extend(std::iter::repeat_n(zone, cells));
    }
    zones.truncate(cell_count);
    while zones.len() < cell_count {
        zones.push(ZoneCategory::Unknown);
    }

    let mut tiles = Vec::with_capacity(cell_count);
    for y in 0..REGION_GRID {
        for x in 0..REGION_GRID {
            let index = y * REGION_GRID + x;
            let zone = zones[index];
            let population = match zone {
                ZoneCategory::Water | ZoneCategory::Park => None,
                _ => Some(weights[index] / weight_sum * archetype.population),
            };
            tiles.push(Tile::new(x as i32, y as i32, zone, population));
        }
    }

    RegionModel::new(archetype.name, tiles)
}

/// Parameters for the noise-driven region generator
#[derive(Clone)]
pub struct RegionGenParams {
    pub name: String,
    pub grid_size: u32,
    pub population: f32,
    pub seed: u32,
}

impl Default for RegionGenParams {
    fn default() -> Self {
        Self {
            name: "Generated Region".to_string(),
            grid_size: 8,
            population: 40_000.0,
            seed: 0,
        }
    }
}

/// Generate a larger demo region from fractal noise. Elevation picks
/// water and parkland in the basins; a second noise channel zones the
/// dry cells. Deterministic for a given seed.
pub fn generate_region(params: &RegionGenParams) -> RegionModel {
    let elevation = Fbm::<Perlin>::new(params.seed);
    let zoning = Perlin::new(params.seed.wrapping_add(1));
    let size = params.grid_size;

    let mut cells = Vec::with_capacity((size * size) as usize);
    let mut weight_sum = 0.0;
    for y in 0..size {
        for x in 0..size {
            let nx = x as f64 / size as f64 * 3.0;
            let ny = y as f64 / size as f64 * 3.0;
            let height = elevation.get([nx, ny]) as f32;

            let zone = if height < -0.3 {
                ZoneCategory::Water
            } else if height < -0.15 {
                ZoneCategory::Park
            } else {
                match zoning.get([nx + 10.0, ny + 10.0]) as f32 {
                    v if v < -0.25 => ZoneCategory::Industrial,
                    v if v < 0.3 => ZoneCategory::Residential,
                    v if v < 0.7 => ZoneCategory::Commercial,
                    _ => ZoneCategory::Unknown,
                }
            };

            let weight = match zone {
                ZoneCategory::Water | ZoneCategory::Park => 0.0,
                _ => (height + 1.0).max(0.0),
            };
            weight_sum += weight;
            cells.push((x as i32, y as i32, zone, weight));
        }
    }

    let tiles = cells
        .into_iter()
        .map(|(x, y, zone, weight)| {
            let population = if weight > 0.0 && weight_sum > 0.0 {
                Some(weight / weight_sum * params.population)
            } else {
                None
            };
            Tile::new(x, y, zone, population)
        })
        .collect();

    RegionModel::new(params.name.clone(), tiles)
}

/// Demo snapshot source: one region at startup, R for a random
/// archetype, G for a fresh noise-generated region.
pub struct DemoRegionPlugin;

impl Plugin for DemoRegionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, emit_initial_region)
            .add_systems(Update, demo_region_input);
    }
}

fn emit_initial_region(mut snapshots: EventWriter<RegionSnapshot>) {
    let region = tiles_from_archetype(&ARCHETYPES[0], &mut rand::rng());
    info!("loading demo region '{}'", region.name);
    snapshots.write(RegionSnapshot(region));
}

fn demo_region_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut snapshots: EventWriter<RegionSnapshot>,
    mut generated_count: Local<u32>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        let mut rng = rand::rng();
        let archetype = &ARCHETYPES[rng.random_range(0..ARCHETYPES.len())];
        snapshots.write(RegionSnapshot(tiles_from_archetype(archetype, &mut rng)));
    }

    if keys.just_pressed(KeyCode::KeyG) {
        *generated_count += 1;
        let params = RegionGenParams {
            name: format!("Generated Region #{}", *generated_count),
            seed: *generated_count,
            ..default()
        };
        snapshots.write(RegionSnapshot(generate_region(&params)));
    }
}

use crate::region::ZoneCategory;

/// Height units per resident, calibrated so suburban populations stay
/// human-scale next to the commercial curve.
pub const RESIDENTIAL_HEIGHT_PER_CAPITA: f32 = 1.0 / 30.0;

/// Breakpoints of the commercial compression curve. Populations beyond
/// each cutoff earn strongly diminishing height so outlier tiles cannot
/// dwarf the scene.
pub const COMMERCIAL_CUTOFF_A: f32 = 2.0;
pub const COMMERCIAL_CUTOFF_B: f32 = 10.0;
pub const COMMERCIAL_CUTOFF_C: f32 = 100.0;

/// Map a tile population to the scalar driving building height.
///
/// Residential scales linearly. Commercial runs through a 4-segment
/// piecewise-linear curve, each segment continuous with the previous
/// endpoint. Every other category uses the raw population.
pub fn density(population: f32, zone: ZoneCategory) -> f32 {
    match zone {
        ZoneCategory::Residential => population * RESIDENTIAL_HEIGHT_PER_CAPITA,
        ZoneCategory::Commercial => commercial_density(population),
        _ => population,
    }
}

fn commercial_density(population: f32) -> f32 {
    let a = COMMERCIAL_CUTOFF_A;
    let b = COMMERCIAL_CUTOFF_B;
    let c = COMMERCIAL_CUTOFF_C;
    if population <= a {
        population
    } else if population <= b {
        a + (population - a) / 100.0
    } else if population <= c {
        a + b / 100.0 + (population - b) / 200.0
    } else {
        a + b / 100.0 + c / 200.0 + (population - c) / 1000.0
    }
}

use bevy::prelude::*;
use rand::Rng;

use crate::config::ZonePalette;
use crate::region::ZoneCategory;
use crate::rendering::materials::{
    MaterialSpec, resolve_base_material, resolve_building_material,
};

/// Side length of a tile's base plate
pub const TILE_DIAMETER: f32 = 3.0;
/// Spacing between neighboring base plates
pub const TILE_GAP: f32 = 1.0;
/// Inset of a building footprint from the base plate edge; the tower cap
/// of a split building doubles it, so it must stay below TILE_DIAMETER/4
pub const TILE_PADDING: f32 = 0.5;
/// Thickness of the base plate
pub const BASE_HEIGHT: f32 = 0.1;
/// Extra height added to every building volume so stacked volumes and the
/// base plate overlap instead of showing a seam
pub const SEAM_MARGIN: f32 = 0.1;
/// Commercial densities above this split into a podium + tower silhouette
pub const SPLIT_THRESHOLD: f32 = 5.0;

/// Map a grid coordinate to world space
pub fn grid_to_world(coordinate: i32) -> f32 {
    (TILE_DIAMETER + TILE_GAP) * coordinate as f32
}

/// Geometric spec for one renderable block. `center` is absolute world
/// space; produced fresh on every build and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDescriptor {
    pub size: Vec3,
    pub center: Vec3,
    pub material: MaterialSpec,
}

/// Builder output for one tile: the always-present base plate plus zero,
/// one, or two building volumes.
#[derive(Debug, Clone)]
pub struct TileVolumes {
    pub base: VolumeDescriptor,
    pub building: Vec<VolumeDescriptor>,
}

impl TileVolumes {
    pub fn primitive_count(&self) -> usize {
        1 + self.building.len()
    }
}

/// Decompose one tile into renderable volumes.
///
/// The base plate is always produced. A building appears only for a
/// positive density: a single block at full height, or for commercial
/// tiles past the split threshold a podium with a randomized height cut
/// and a narrower tower holding the remainder. The cut is re-sampled from
/// `rng` on every call; heights minus the seam margin always sum back to
/// the density.
pub fn build_volumes(
    coordinates: IVec2,
    zone: ZoneCategory,
    density: Option<f32>,
    palette: &ZonePalette,
    rng: &mut impl Rng,
) -> TileVolumes {
    let world_x = grid_to_world(coordinates.x);
    let world_z = grid_to_world(coordinates.y);
    let base_top = BASE_HEIGHT;

    let base = VolumeDescriptor {
        size: Vec3::new(TILE_DIAMETER, BASE_HEIGHT, TILE_DIAMETER),
        center: Vec3::new(world_x, BASE_HEIGHT / 2.0, world_z),
        material: resolve_base_material(zone, palette),
    };

    let mut building = Vec::new();
    if let Some(density) = density.filter(|d| *d > 0.0) {
        let material = resolve_building_material(zone);
        let footprint = TILE_DIAMETER - TILE_PADDING * 2.0;

        if zone == ZoneCategory::Commercial && density > SPLIT_THRESHOLD {
            let cut = (0.5 + rng.random::<f32>() / 2.0) * density;
            let cap_footprint = TILE_DIAMETER - TILE_PADDING * 4.0;

            building.push(VolumeDescriptor {
                size: Vec3::new(footprint, cut + SEAM_MARGIN, footprint),
                center: Vec3::new(world_x, base_top + cut / 2.0, world_z),
                material,
            });
            building.push(VolumeDescriptor {
                size: Vec3::new(cap_footprint, density - cut + SEAM_MARGIN, cap_footprint),
                center: Vec3::new(world_x, base_top + cut + (density - cut) / 2.0, world_z),
                material,
            });
        } else {
            building.push(VolumeDescriptor {
                size: Vec3::new(footprint, density + SEAM_MARGIN, footprint),
                center: Vec3::new(world_x, base_top + density / 2.0, world_z),
                material,
            });
        }
    }

    TileVolumes { base, building }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn volumes(
        zone: ZoneCategory,
        density: Option<f32>,
        seed: u64,
    ) -> TileVolumes {
        let palette = ZonePalette::default();
        let mut rng = StdRng::seed_from_u64(seed);
        build_volumes(IVec2::new(0, 0), zone, density, &palette, &mut rng)
    }

    #[test]
    fn test_base_plate_always_produced() {
        let out = volumes(ZoneCategory::Water, None, 1);
        assert_eq!(out.base.size, Vec3::new(TILE_DIAMETER, BASE_HEIGHT, TILE_DIAMETER));
        assert!(out.building.is_empty());
        assert_eq!(out.primitive_count(), 1);
    }

    #[test]
    fn test_zero_or_negative_density_means_no_building() {
        assert!(volumes(ZoneCategory::Residential, Some(0.0), 1).building.is_empty());
        assert!(volumes(ZoneCategory::Residential, Some(-2.0), 1).building.is_empty());
    }

    #[test]
    fn test_single_volume_below_split_threshold() {
        let out = volumes(ZoneCategory::Commercial, Some(2.28), 1);
        assert_eq!(out.building.len(), 1);
        let block = &out.building[0];
        assert!((block.size.y - (2.28 + SEAM_MARGIN)).abs() < 1e-5);
        assert!((block.size.x - (TILE_DIAMETER - 2.0 * TILE_PADDING)).abs() < 1e-6);
        assert!((block.center.y - (BASE_HEIGHT + 2.28 / 2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_split_requires_strictly_exceeding_threshold() {
        let at = volumes(ZoneCategory::Commercial, Some(SPLIT_THRESHOLD), 1);
        assert_eq!(at.building.len(), 1);
        let above = volumes(ZoneCategory::Commercial, Some(SPLIT_THRESHOLD + 0.01), 1);
        assert_eq!(above.building.len(), 2);
    }

    #[test]
    fn test_non_commercial_never_splits() {
        let out = volumes(ZoneCategory::Residential, Some(50.0), 1);
        assert_eq!(out.building.len(), 1);
    }

    #[test]
    fn test_split_heights_sum_to_density() {
        for seed in 0..32 {
            let density = 8.5;
            let out = volumes(ZoneCategory::Commercial, Some(density), seed);
            assert_eq!(out.building.len(), 2);
            let total: f32 = out
                .building
                .iter()
                .map(|v| v.size.y - SEAM_MARGIN)
                .sum();
            assert!((total - density).abs() < 1e-4, "seed {seed}: total {total}");
        }
    }

    #[test]
    fn test_split_cut_stays_within_sampled_range() {
        for seed in 0..32 {
            let density = 10.0;
            let out = volumes(ZoneCategory::Commercial, Some(density), seed);
            let podium = out.building[0].size.y - SEAM_MARGIN;
            assert!(podium >= density * 0.5 - 1e-4);
            assert!(podium <= density + 1e-4);
        }
    }

    #[test]
    fn test_split_volumes_stack_without_gap() {
        let out = volumes(ZoneCategory::Commercial, Some(9.0), 3);
        let podium = &out.building[0];
        let cap = &out.building[1];
        let podium_top = podium.center.y + podium.size.y / 2.0;
        let cap_bottom = cap.center.y - cap.size.y / 2.0;
        assert!(cap_bottom <= podium_top + 1e-5, "gap between podium and cap");
        assert!(
            (cap.size.x - (TILE_DIAMETER - 4.0 * TILE_PADDING)).abs() < 1e-6,
            "cap footprint should double the padding"
        );
    }

    #[test]
    fn test_cut_resampled_per_build() {
        let density = 20.0;
        let heights: Vec<f32> = (0..16)
            .map(|seed| volumes(ZoneCategory::Commercial, Some(density), seed).building[0].size.y)
            .collect();
        let first = heights[0];
        assert!(
            heights.iter().any(|h| (h - first).abs() > 1e-3),
            "podium height never varied across builds"
        );
    }

    #[test]
    fn test_world_mapping() {
        let palette = ZonePalette::default();
        let mut rng = StdRng::seed_from_u64(0);
        let out = build_volumes(
            IVec2::new(2, -1),
            ZoneCategory::Park,
            None,
            &palette,
            &mut rng,
        );
        assert_eq!(out.base.center.x, (TILE_DIAMETER + TILE_GAP) * 2.0);
        assert_eq!(out.base.center.z, -(TILE_DIAMETER + TILE_GAP));
    }
}

use bevy::app::AppExit;
use bevy::prelude::*;
use rand::Rng;

use crate::config::ZonePalette;
use crate::region::{RegionModel, RegionSnapshot};
use crate::rendering::density::density;
use crate::rendering::geometry::{VolumeDescriptor, build_volumes};
use crate::rendering::materials::{
    SharedMaterials, realize_material, setup_shared_materials,
};

/// Marker for every renderable spawned from a region snapshot
#[derive(Component)]
pub struct TilePrimitive;

/// Registry of everything the synchronizer has attached to the scene.
///
/// Every spawned entity and every asset created for it is recorded here
/// at creation time, so a destroy cycle never has to introspect the
/// scene graph to find its disposables. The registry owns the primitives
/// exclusively; shared materials are intentionally absent.
#[derive(Resource, Default)]
pub struct ScenePrimitives {
    entities: Vec<Entity>,
    meshes: Vec<Handle<Mesh>>,
    materials: Vec<Handle<StandardMaterial>>,
}

impl ScenePrimitives {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.meshes.is_empty() && self.materials.is_empty()
    }
}

pub struct SceneSyncPlugin;

impl Plugin for SceneSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScenePrimitives>()
            .add_systems(Startup, setup_shared_materials)
            .add_systems(Update, apply_region_snapshots)
            .add_systems(Last, release_scene_on_exit);
    }
}

/// Release every registered asset, then detach every registered entity.
///
/// Assets go first so nothing becomes unreachable while still resident
/// on the GPU side. Draining the registry makes a repeated call a no-op.
pub fn clear_scene(
    primitives: &mut ScenePrimitives,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    for handle in primitives.materials.drain(..) {
        materials.remove(handle.id());
    }
    for handle in primitives.meshes.drain(..) {
        meshes.remove(handle.id());
    }
    for entity in primitives.entities.drain(..) {
        commands.entity(entity).despawn();
    }
}

/// Build the full primitive set for one region snapshot.
///
/// Tiles are processed in sequence order; a malformed tile is sanitized
/// and never aborts the rest of the build. Split volumes of one tile
/// share a single freshly realized building material, matching the
/// one-material-per-tile behavior of the resolver contract.
pub fn populate_scene(
    region: &RegionModel,
    primitives: &mut ScenePrimitives,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    shared: &SharedMaterials,
    palette: &ZonePalette,
    rng: &mut impl Rng,
) {
    for tile in &region.tiles {
        let population = match tile.population {
            Some(value) if value < 0.0 => {
                warn!(
                    "tile ({}, {}) has negative population {value}, clamping to zero",
                    tile.coordinates.x, tile.coordinates.y
                );
                Some(0.0)
            }
            other => other,
        };
        let tile_density = population.map(|value| density(value, tile.zone));
        let volumes = build_volumes(tile.coordinates, tile.zone, tile_density, palette, rng);

        let (base_material, owned) = realize_material(&volumes.base.material, shared, materials);
        if owned {
            primitives.materials.push(base_material.clone());
        }
        spawn_volume(&volumes.base, base_material, primitives, commands, meshes);

        if let Some(first) = volumes.building.first() {
            let (building_material, owned) =
                realize_material(&first.material, shared, materials);
            if owned {
                primitives.materials.push(building_material.clone());
            }
            for volume in &volumes.building {
                spawn_volume(volume, building_material.clone(), primitives, commands, meshes);
            }
        }
    }
}

fn spawn_volume(
    volume: &VolumeDescriptor,
    material: Handle<StandardMaterial>,
    primitives: &mut ScenePrimitives,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
) {
    let mesh = meshes.add(Cuboid::new(volume.size.x, volume.size.y, volume.size.z));
    primitives.meshes.push(mesh.clone());

    let entity = commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(volume.center),
            TilePrimitive,
        ))
        .id();
    primitives.entities.push(entity);
}

/// React to delivered snapshots: tear the previous primitive set down
/// completely, then rebuild from the newest snapshot. Runs on the main
/// schedule, so it can never overlap a frame render or itself.
pub fn apply_region_snapshots(
    mut snapshots: EventReader<RegionSnapshot>,
    mut commands: Commands,
    mut primitives: ResMut<ScenePrimitives>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    shared: Res<SharedMaterials>,
    palette: Res<ZonePalette>,
) {
    let Some(RegionSnapshot(region)) = snapshots.read().last() else {
        return;
    };

    debug!(
        "rebuilding scene for '{}' ({} tiles)",
        region.name,
        region.tiles.len()
    );
    clear_scene(&mut primitives, &mut commands, &mut meshes, &mut materials);
    populate_scene(
        region,
        &mut primitives,
        &mut commands,
        &mut meshes,
        &mut materials,
        &shared,
        &palette,
        &mut rand::rng(),
    );
}

/// Teardown hook: when the app winds down, release the primitive set so
/// every geometry and material is freed before the world is dropped
fn release_scene_on_exit(
    mut exits: EventReader<AppExit>,
    mut commands: Commands,
    mut primitives: ResMut<ScenePrimitives>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if exits.is_empty() {
        return;
    }
    exits.clear();

    debug!("releasing {} scene primitives on exit", primitives.entity_count());
    clear_scene(&mut primitives, &mut commands, &mut meshes, &mut materials);
}

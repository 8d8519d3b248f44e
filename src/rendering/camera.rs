use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::config::ViewerConfig;
use crate::region::RegionSnapshot;
use crate::rendering::geometry::{TILE_DIAMETER, TILE_GAP};

/// Orbit state for the isometric view
#[derive(Component)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 45.0_f32.to_radians(),
            pitch: 35.0_f32.to_radians(),
            distance: 60.0,
            target: Vec3::ZERO,
        }
    }
}

/// Plugin for the orthographic isometric camera and its orbit controls
pub struct IsometricCameraPlugin;

impl Plugin for IsometricCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_isometric_camera).add_systems(
            Update,
            (
                orbit_camera_input,
                retarget_camera_on_snapshot,
                update_camera_transform,
            )
                .chain(),
        );
    }
}

fn setup_isometric_camera(mut commands: Commands, config: Res<ViewerConfig>) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: config.camera.viewport_height,
            },
            ..OrthographicProjection::default_3d()
        }),
        DistanceFog {
            color: Color::WHITE,
            falloff: FogFalloff::Linear {
                start: 0.0,
                end: 200.0,
            },
            ..default()
        },
        OrbitCamera {
            yaw: config.camera.yaw_degrees.to_radians(),
            pitch: config.camera.pitch_degrees.to_radians(),
            ..default()
        },
        Transform::default(),
    ));

    info!("isometric camera spawned");
}

fn orbit_camera_input(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<&mut OrbitCamera>,
) {
    const ORBIT_SPEED: f32 = 1.2;

    if let Ok(mut orbit) = query.single_mut() {
        let dt = time.delta_secs();

        if keys.pressed(KeyCode::KeyA) {
            orbit.yaw -= ORBIT_SPEED * dt;
        }
        if keys.pressed(KeyCode::KeyD) {
            orbit.yaw += ORBIT_SPEED * dt;
        }
        if keys.pressed(KeyCode::KeyW) {
            orbit.pitch = (orbit.pitch + ORBIT_SPEED * dt).min(1.4);
        }
        if keys.pressed(KeyCode::KeyS) {
            orbit.pitch = (orbit.pitch - ORBIT_SPEED * dt).max(0.2);
        }
    }
}

/// Re-center the orbit on the freshly delivered region's grid
fn retarget_camera_on_snapshot(
    mut snapshots: EventReader<RegionSnapshot>,
    mut query: Query<&mut OrbitCamera>,
) {
    let Some(RegionSnapshot(region)) = snapshots.read().last() else {
        return;
    };
    let center = region.grid_center() * (TILE_DIAMETER + TILE_GAP);
    for mut orbit in query.iter_mut() {
        orbit.target = Vec3::new(center.x, 0.0, center.y);
    }
}

fn update_camera_transform(mut query: Query<(&OrbitCamera, &mut Transform)>) {
    for (orbit, mut transform) in query.iter_mut() {
        *transform = orbit_transform(orbit);
    }
}

fn orbit_transform(orbit: &OrbitCamera) -> Transform {
    let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
    let offset = rotation * Vec3::Z * orbit.distance;
    Transform::from_translation(orbit.target + offset).looking_at(orbit.target, Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_transform_sits_above_target() {
        let orbit = OrbitCamera::default();
        let transform = orbit_transform(&orbit);
        assert!(transform.translation.y > 0.0);
        assert!(
            (transform.translation.distance(orbit.target) - orbit.distance).abs() < 1e-3
        );
    }

    #[test]
    fn test_orbit_transform_faces_target() {
        let orbit = OrbitCamera {
            target: Vec3::new(8.0, 0.0, 8.0),
            ..default()
        };
        let transform = orbit_transform(&orbit);
        let toward_target = (orbit.target - transform.translation).normalize();
        let facing = transform.forward();
        assert!(facing.dot(toward_target) > 0.999);
    }
}

use bevy::color::Srgba;
use bevy::prelude::*;
use bevy::window::WindowResolution;

use region_viewer::config::{ViewerConfig, ZonePalette};
use region_viewer::hud::HudPlugin;
use region_viewer::region::{DemoRegionPlugin, RegionSubscriptionPlugin};
use region_viewer::rendering::{IsometricCameraPlugin, SceneSyncPlugin};

/// Sky backdrop behind the fogged grid (#87CEEB)
const SKY_COLOR: Color = Color::Srgba(Srgba::new(0.529, 0.808, 0.922, 1.0));

fn main() {
    let config = ViewerConfig::load("assets/config/viewer.toml");
    let palette = ZonePalette::from_config(&config.zones);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: WindowResolution::new(config.window.width, config.window.height),
                title: config.window.title.clone(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(SKY_COLOR))
        .insert_resource(palette)
        .insert_resource(config)
        .add_plugins(RegionSubscriptionPlugin)
        .add_plugins(SceneSyncPlugin)
        .add_plugins(IsometricCameraPlugin)
        .add_plugins(HudPlugin)
        .add_plugins(DemoRegionPlugin)
        .add_systems(Startup, setup_lighting)
        .run();
}

/// Sun plus soft ambient fill for the tile grid
fn setup_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::YXZ, -0.6, -0.9, 0.0)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        ..default()
    });
}

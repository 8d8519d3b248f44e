use bevy::prelude::*;

use crate::config::ZonePalette;
use crate::region::RegionSnapshot;

/// Marker component for the region name display
#[derive(Component)]
pub struct RegionTitle;

/// Marker component for the zone color key
#[derive(Component)]
pub struct LegendPanel;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_region_title);
    }
}

/// Brighten or darken a color by a percentage, clamped per channel.
/// Negative percentages shade toward black.
pub fn shade_color(color: Color, percent: f32) -> Color {
    let factor = (100.0 + percent) / 100.0;
    let srgba = color.to_srgba();
    Color::srgb(
        (srgba.red * factor).clamp(0.0, 1.0),
        (srgba.green * factor).clamp(0.0, 1.0),
        (srgba.blue * factor).clamp(0.0, 1.0),
    )
}

fn spawn_hud(mut commands: Commands, palette: Res<ZonePalette>) {
    let panel_background = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7));

    // Region title (top left), filled in when the first snapshot lands
    commands.spawn((
        Text::new("Region Viewer"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        panel_background,
        RegionTitle,
    ));

    // Instructions panel (top right)
    commands
        .spawn((
            Text::new("Controls:\n"),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::srgb(1.0, 1.0, 0.5)),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(12.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            panel_background,
        ))
        .with_children(|parent| {
            let line_font = TextFont {
                font_size: 14.0,
                ..default()
            };
            parent.spawn((
                TextSpan::new("  R - Random region\n"),
                line_font.clone(),
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                TextSpan::new("  G - Generated region\n"),
                line_font.clone(),
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                TextSpan::new("  A/D - Orbit\n"),
                line_font.clone(),
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                TextSpan::new("  W/S - Tilt\n"),
                line_font,
                TextColor(Color::WHITE),
            ));
        });

    // Zone color key (bottom right), one row per category with a shaded
    // edge strip echoing the isometric cube faces
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(12.0),
                bottom: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            panel_background,
            LegendPanel,
        ))
        .with_children(|parent| {
            for (_, color, label) in palette.entries() {
                parent
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        column_gap: Val::Px(6.0),
                        ..default()
                    })
                    .with_children(|row| {
                        row.spawn((
                            Node {
                                width: Val::Px(14.0),
                                height: Val::Px(14.0),
                                ..default()
                            },
                            BackgroundColor(color),
                        ));
                        row.spawn((
                            Node {
                                width: Val::Px(5.0),
                                height: Val::Px(14.0),
                                ..default()
                            },
                            BackgroundColor(shade_color(color, -30.0)),
                        ));
                        row.spawn((
                            Text::new(label),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                        ));
                    });
            }
        });
}

fn update_region_title(
    mut snapshots: EventReader<RegionSnapshot>,
    mut query: Query<&mut Text, With<RegionTitle>>,
) {
    let Some(RegionSnapshot(region)) = snapshots.read().last() else {
        return;
    };
    if let Ok(mut text) = query.single_mut() {
        text.0 = region.name.clone();
    }
}

//! Orbit camera for inspecting the displayed model.
//!
//! Drag with the left mouse button to orbit, scroll to zoom. The camera
//! always looks at the origin, where the model is centered.

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

/// Plugin for orbit camera controls.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, (orbit_camera, zoom_camera, sync_camera_transform).chain());
    }
}

/// Settings for camera movement.
#[derive(Resource)]
pub struct CameraSettings {
    /// Radians of rotation per pixel of mouse movement.
    pub orbit_sensitivity: f32,
    /// Fraction of the distance gained or lost per scroll step.
    pub zoom_speed: f32,
    /// Closest allowed distance to the model.
    pub min_distance: f32,
    /// Farthest allowed distance from the model.
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            zoom_speed: 0.1,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

/// Orbit state for the camera entity.
#[derive(Component)]
pub struct OrbitCamera {
    /// Rotation around the vertical axis, in radians.
    pub yaw: f32,
    /// Elevation angle, in radians.
    pub pitch: f32,
    /// Distance from the origin.
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.35,
            distance: 4.0,
        }
    }
}

/// Rotate the camera while the left mouse button is held.
#[allow(clippy::needless_pass_by_value)]
fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: MessageReader<MouseMotion>,
    settings: Res<CameraSettings>,
    mut query: Query<&mut OrbitCamera>,
) {
    if !buttons.pressed(MouseButton::Left) {
        motion.clear();
        return;
    }

    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    for mut orbit in &mut query {
        orbit.yaw -= delta.x * settings.orbit_sensitivity;
        orbit.pitch = (orbit.pitch + delta.y * settings.orbit_sensitivity).clamp(-1.5, 1.5);
    }
}

/// Zoom with the scroll wheel.
#[allow(clippy::needless_pass_by_value)]
fn zoom_camera(
    mut wheel: MessageReader<MouseWheel>,
    settings: Res<CameraSettings>,
    mut query: Query<&mut OrbitCamera>,
) {
    let scroll: f32 = wheel.read().map(|w| w.y).sum();
    if scroll == 0.0 {
        return;
    }

    for mut orbit in &mut query {
        orbit.distance = (orbit.distance * (1.0 - scroll * settings.zoom_speed))
            .clamp(settings.min_distance, settings.max_distance);
    }
}

/// Place the camera on its orbit, looking at the origin.
fn sync_camera_transform(mut query: Query<(&OrbitCamera, &mut Transform)>) {
    for (orbit, mut transform) in &mut query {
        let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
        let position = rotation * Vec3::new(0.0, 0.0, orbit.distance);
        *transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

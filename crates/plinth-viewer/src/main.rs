//! Single-model 3D viewer.
//!
//! Displays one remote model, serving it from a persistent on-disk cache
//! when possible and downloading it otherwise. The load sequence itself
//! lives in the `plinth` crate; this binary supplies the renderer, the
//! status banner, and the display controls.

mod camera;
mod launch_params;
mod loader;
mod model;
mod ui;

use bevy::prelude::*;
use camera::{OrbitCamera, OrbitCameraPlugin};
use loader::LoadPlugin;
use ui::ViewUiPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((OrbitCameraPlugin, LoadPlugin))
            .add_systems(Startup, setup_scene);
    }
}

/// Set up the camera and lighting.
fn setup_scene(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.5, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        Projection::Perspective(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_4,
            ..Default::default()
        }),
        OrbitCamera::default(),
    ));

    // Key light; the brightness/contrast sliders rescale it at runtime.
    commands.spawn((
        DirectionalLight {
            illuminance: ui::KEY_ILLUMINANCE,
            shadows_enabled: true,
            ..Default::default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    tracing::info!("Scene setup complete - drag to orbit, scroll to zoom");
}

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let params = launch_params::parse();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "plinth-viewer".to_string(),
            resolution: (1280, 720).into(),
            ..Default::default()
        }),
        ..Default::default()
    }));

    app.add_plugins(bevy_tokio_tasks::TokioTasksPlugin::default());

    app.insert_resource(GlobalAmbientLight {
        brightness: ui::AMBIENT_BRIGHTNESS,
        ..Default::default()
    });

    // The control panel and banner are optional; loading works without them.
    if !params.no_ui {
        app.add_plugins(ViewUiPlugin);
    }

    app.insert_resource(params).add_plugins(AppPlugin).run();
}

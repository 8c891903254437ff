//! Display controls and the advisory banner.
//!
//! Hosts the brightness/contrast/scale sliders and a transient banner that
//! mirrors the load sequence's status. The whole plugin is optional; model
//! loading works without it.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use plinth::LoadPhase;

use crate::loader::StatusBoard;
use crate::model::{CurrentModel, ModelRoot};

/// Key light illuminance at brightness 1.0, contrast 1.0.
pub const KEY_ILLUMINANCE: f32 = 6_000.0;
/// Ambient fill brightness at brightness 1.0, contrast 1.0.
pub const AMBIENT_BRIGHTNESS: f32 = 300.0;
/// Seconds the banner stays up once the load sequence has finished.
const BANNER_DISMISS_SECS: f32 = 6.0;

/// Plugin for the viewer's control panel and banner.
pub struct ViewUiPlugin;

impl Plugin for ViewUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<ViewSettings>()
            .add_systems(EguiPrimaryContextPass, (control_panel, advisory_banner))
            .add_systems(Update, apply_view_settings);
    }
}

/// User-adjustable display settings.
#[derive(Resource)]
pub struct ViewSettings {
    /// Overall light level multiplier.
    pub brightness: f32,
    /// Key-to-fill ratio; higher values harden the shadows.
    pub contrast: f32,
    /// Model scale multiplier on top of the fitted size.
    pub scale: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            scale: 1.0,
        }
    }
}

/// Render the slider panel.
fn control_panel(mut contexts: EguiContexts, mut settings: ResMut<ViewSettings>) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Display")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.add(egui::Slider::new(&mut settings.brightness, 0.1..=3.0).text("Brightness"));
            ui.add(
                egui::Slider::new(&mut settings.contrast, 0.25..=4.0)
                    .logarithmic(true)
                    .text("Contrast"),
            );
            ui.add(
                egui::Slider::new(&mut settings.scale, 0.1..=5.0)
                    .logarithmic(true)
                    .text("Scale"),
            );
        });

    Ok(())
}

/// Render the transient status banner.
#[allow(clippy::needless_pass_by_value)]
fn advisory_banner(
    mut contexts: EguiContexts,
    time: Res<Time>,
    board: Res<StatusBoard>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let Some(timed) = &board.latest else {
        return Ok(());
    };

    // Terminal states dismiss themselves after a fixed delay.
    let terminal = matches!(timed.status.phase, LoadPhase::Ready | LoadPhase::Failed);
    if terminal && time.elapsed_secs() - timed.at > BANNER_DISMISS_SECS {
        return Ok(());
    }

    egui::Window::new("status")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, [0.0, 12.0])
        .show(ctx, |ui| {
            let text = egui::RichText::new(&timed.status.message);
            if timed.status.phase == LoadPhase::Failed {
                ui.label(text.color(egui::Color32::LIGHT_RED));
            } else {
                ui.label(text);
            }
        });

    Ok(())
}

/// Apply the sliders to the lights and the displayed model.
#[allow(clippy::needless_pass_by_value)]
fn apply_view_settings(
    settings: Res<ViewSettings>,
    current: Res<CurrentModel>,
    mut ambient: ResMut<GlobalAmbientLight>,
    mut lights: Query<&mut DirectionalLight>,
    mut roots: Query<&mut Transform, With<ModelRoot>>,
) {
    let key = KEY_ILLUMINANCE * settings.brightness * settings.contrast;
    for mut light in &mut lights {
        if (light.illuminance - key).abs() > f32::EPSILON {
            light.illuminance = key;
        }
    }

    let fill = AMBIENT_BRIGHTNESS * settings.brightness / settings.contrast;
    if (ambient.brightness - fill).abs() > f32::EPSILON {
        ambient.brightness = fill;
    }

    let base = current.base;
    let desired = Transform {
        translation: base.translation * settings.scale,
        rotation: base.rotation,
        scale: base.scale * settings.scale,
    };
    for mut transform in &mut roots {
        transform.set_if_neq(desired);
    }
}

//! Background loading of the model.
//!
//! Runs the plinth load sequence once on a Tokio background task and
//! bridges its collaborators into the Bevy world over channels: parsed
//! models and status updates are drained by systems on the main schedule.

use async_channel::{Receiver, Sender};
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use plinth::{DiskStore, HttpFetcher, LoadOrchestrator, LoadStatus, ModelRenderer, StatusSink};

use crate::launch_params::LaunchParams;
use crate::model::{self, CurrentModel, PreparedModel};

/// Plugin that starts the load sequence and applies its results.
pub struct LoadPlugin;

impl Plugin for LoadPlugin {
    fn build(&self, app: &mut App) {
        let (model_tx, model_rx) = async_channel::unbounded();
        let (status_tx, status_rx) = async_channel::unbounded();

        app.insert_resource(LoadChannels {
            model_tx,
            model_rx,
            status_tx,
            status_rx,
        })
        .init_resource::<CurrentModel>()
        .init_resource::<StatusBoard>()
        .add_systems(Startup, start_load)
        .add_systems(Update, (update_status_board, apply_loaded_model));
    }
}

/// Channels between the background load task and the render world.
#[derive(Resource)]
struct LoadChannels {
    model_tx: Sender<PreparedModel>,
    model_rx: Receiver<PreparedModel>,
    status_tx: Sender<LoadStatus>,
    status_rx: Receiver<LoadStatus>,
}

/// Most recent advisory status, stamped with its arrival time.
#[derive(Resource, Default)]
pub struct StatusBoard {
    /// The latest status, if any has arrived yet.
    pub latest: Option<TimedStatus>,
}

/// A status update and when it arrived.
pub struct TimedStatus {
    /// The status itself.
    pub status: LoadStatus,
    /// Seconds since startup when the status arrived.
    pub at: f32,
}

/// Renderer that parses payloads and ships them to the render world.
struct ChannelRenderer {
    model_tx: Sender<PreparedModel>,
}

impl ModelRenderer for ChannelRenderer {
    fn render_model(&mut self, payload: &[u8]) -> plinth::Result<()> {
        let prepared = model::parse_glb(payload)?;
        // A closed channel means the app is shutting down; dropping the
        // model is fine then.
        let _ = self.model_tx.try_send(prepared);
        Ok(())
    }
}

/// Sink forwarding status updates to the render world.
struct ChannelSink {
    status_tx: Sender<LoadStatus>,
}

impl StatusSink for ChannelSink {
    fn status(&mut self, status: LoadStatus) {
        let _ = self.status_tx.try_send(status);
    }
}

/// Start the one load sequence for this session.
#[allow(clippy::needless_pass_by_value)]
fn start_load(
    runtime: ResMut<TokioTasksRuntime>,
    channels: Res<LoadChannels>,
    params: Res<LaunchParams>,
) {
    let orchestrator = LoadOrchestrator::new(
        DiskStore::new(params.cache_dir.clone()),
        HttpFetcher::new(),
        params.model_url.clone(),
    );
    let mut renderer = ChannelRenderer {
        model_tx: channels.model_tx.clone(),
    };
    let mut sink = ChannelSink {
        status_tx: channels.status_tx.clone(),
    };

    runtime.spawn_background_task(move |_ctx| async move {
        match orchestrator.load(&mut renderer, &mut sink).await {
            Ok(source) => tracing::info!("model displayed ({source:?})"),
            Err(e) => tracing::error!("giving up on loading the model: {e}"),
        }
    });

    tracing::info!(url = %params.model_url, "started model load");
}

/// Drain status updates into the status board.
#[allow(clippy::needless_pass_by_value)]
fn update_status_board(
    channels: Res<LoadChannels>,
    time: Res<Time>,
    mut board: ResMut<StatusBoard>,
) {
    while let Ok(status) = channels.status_rx.try_recv() {
        tracing::info!("{status}");
        board.latest = Some(TimedStatus {
            status,
            at: time.elapsed_secs(),
        });
    }
}

/// Drain parsed models and swap the displayed one.
#[allow(clippy::needless_pass_by_value)]
fn apply_loaded_model(
    mut commands: Commands,
    channels: Res<LoadChannels>,
    mut current: ResMut<CurrentModel>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    while let Ok(prepared) = channels.model_rx.try_recv() {
        model::swap_displayed_model(
            &mut commands,
            &mut current,
            &mut meshes,
            &mut materials,
            &prepared,
        );
    }
}

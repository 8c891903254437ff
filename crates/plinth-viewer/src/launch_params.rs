//! Launch parameter parsing for the viewer.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

/// Default URL of the model asset.
const DEFAULT_MODEL_URL: &str = "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Assets/main/Models/DamagedHelmet/glTF-Binary/DamagedHelmet.glb";
/// Default store root for the model cache.
const DEFAULT_CACHE_DIR: &str = "plinth-cache";

/// Launch parameters for the viewer.
#[derive(Resource, Debug)]
pub struct LaunchParams {
    /// URL of the model to display.
    pub model_url: String,
    /// Root directory of the persistent model cache.
    pub cache_dir: PathBuf,
    /// Run without the control panel and banner.
    pub no_ui: bool,
}

#[derive(Parser)]
#[command(about = "Single-model 3D viewer with a persistent download cache")]
struct CliArgs {
    /// URL of the model to display.
    #[arg(long, default_value = DEFAULT_MODEL_URL)]
    url: String,

    /// Root directory of the persistent model cache.
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Run without the control panel and banner.
    #[arg(long)]
    no_ui: bool,
}

/// Parse launch parameters from the command line.
pub fn parse() -> LaunchParams {
    let args = CliArgs::parse();
    LaunchParams {
        model_url: args.url,
        cache_dir: args.cache_dir,
        no_ui: args.no_ui,
    }
}

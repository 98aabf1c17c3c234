use std::path::PathBuf;

use anyhow::Result;
use car_configurator::{
    app::{Showroom, ShowroomFlow},
    command::Command,
    config::Config,
    context::Context,
    flow,
    vehicle::VehicleState,
};
use clap::Parser;
use futures::{StreamExt, stream};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(
    name = "car-configurator",
    version,
    about = "Drive a glTF car in a showroom: wheels, lights, doors and paint, one command per line on stdin"
)]
struct Opts {
    /// JSON configuration file; every field is optional
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory all asset paths are resolved against
    #[arg(long)]
    asset_dir: Option<PathBuf>,

    /// glTF model, relative to the asset directory
    #[arg(long)]
    model: Option<String>,

    /// Directory of the six environment map faces, relative to the asset directory
    #[arg(long)]
    env_map_dir: Option<String>,

    /// Frames per second of the update loop
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Frames between two status lines (0 disables them)
    #[arg(long)]
    status_every: Option<u64>,
}

impl Opts {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        match self.asset_dir {
            Some(dir) => config.assets.asset_dir = dir,
            None if self.config.is_none() => {
                if let Some(bundled) = bundled_asset_dir() {
                    config.assets.asset_dir = bundled;
                }
            }
            None => {}
        }
        if let Some(model) = self.model {
            config.assets.model = model;
        }
        if let Some(dir) = self.env_map_dir {
            config.assets.env_map_dir = dir;
        }
        if let Some(rate) = self.frame_rate {
            config.frame.frame_rate = rate;
        }
        if self.max_frames.is_some() {
            config.frame.max_frames = self.max_frames;
        }
        if let Some(every) = self.status_every {
            config.frame.status_every = every;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Assets copied next to the build output, used when `./assets` is missing.
fn bundled_asset_dir() -> Option<PathBuf> {
    let local = PathBuf::from("assets");
    if local.is_dir() {
        return None;
    }
    option_env!("BUNDLED_ASSET_DIR")
        .map(PathBuf::from)
        .filter(|dir| dir.is_dir())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Opts::parse().into_config()?;
    info!(
        "Starting showroom at {} fps with assets from {}",
        config.frame.frame_rate,
        config.assets.asset_dir.display()
    );

    let lines = BufReader::new(tokio::io::stdin()).lines();
    let commands = stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read stdin: {e}");
                None
            }
        }
    })
    .filter_map(|line| async move {
        if line.trim().is_empty() {
            return None;
        }
        match line.parse::<Command>() {
            Ok(command) => Some(command),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    });

    let mut state = Showroom::new(VehicleState::new(&config.vehicle));
    let mut ctx = Context::new(config);
    flow::run(&mut ShowroomFlow, &mut state, &mut ctx, commands).await
}

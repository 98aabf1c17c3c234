//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Command line flags are applied on top by the binary.

use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    data_structures::texture::FACE_COUNT,
    error::{Error, Result},
};

/// Tuning of the vehicle's actuators. Rates are per frame, not per second.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VehicleConfig {
    pub speed: f64,
    pub steer: f64,
    pub light_reaction: f64,
    pub max_brightness: f64,
    pub door_open_speed: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            speed: 0.2,
            steer: 0.0,
            light_reaction: 0.1,
            max_brightness: 0.8,
            door_open_speed: 0.02,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    pub asset_dir: PathBuf,
    pub model: String,
    pub env_map_dir: String,
    pub env_map_faces: [String; FACE_COUNT],
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            model: "models/model.gltf".to_string(),
            env_map_dir: "images/env/1".to_string(),
            env_map_faces: ["posx", "negx", "posy", "negy", "posz", "negz"]
                .map(|face| format!("{face}.jpg")),
        }
    }
}

/// Frame rates the update loop can schedule; outside this range the frame
/// interval either overflows or rounds to zero.
pub const FRAME_RATE_RANGE: RangeInclusive<f64> = 0.001..=1000.0;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second of the update loop.
    pub frame_rate: f64,
    /// Stop after this many frames; runs until `quit` when unset.
    pub max_frames: Option<u64>,
    /// Frames between two status log lines, 0 disables them.
    pub status_every: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_frames: None,
            status_every: 120,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub vehicle: VehicleConfig,
    pub assets: AssetConfig,
    pub frame: FrameConfig,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let v = &self.vehicle;
        let checks = [
            (v.light_reaction >= 0.0, "vehicle.light_reaction must not be negative"),
            (v.max_brightness > 0.0, "vehicle.max_brightness must be positive"),
            (v.door_open_speed >= 0.0, "vehicle.door_open_speed must not be negative"),
            (v.speed.is_finite() && v.steer.is_finite(), "vehicle.speed and vehicle.steer must be finite"),
            (
                FRAME_RATE_RANGE.contains(&self.frame.frame_rate),
                "frame.frame_rate must be between 0.001 and 1000",
            ),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => Err(Error::Config(message.to_string())),
            None => Ok(()),
        }
    }
}

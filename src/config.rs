use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::chunk::ChunkDims;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineSettings {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub graphics: GraphicsSettings,
}

/// Everything the streaming and meshing core is parameterized on. None of
/// these are compile-time constants; tweak and restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Horizontal chunk extent (x and z), in blocks.
    pub chunk_size: i32,
    /// Vertical chunk extent, in blocks.
    pub chunk_height: i32,
    pub sea_level: i32,
    /// Streaming radius around the camera, in chunks (Chebyshev distance).
    pub render_distance: i32,
    /// Upper bound on chunks generated by one `apply_updates` call.
    pub max_chunks_per_frame: usize,
    /// World seed; absent rolls a fresh one at startup.
    pub seed: Option<u32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            chunk_height: 256,
            sea_level: 64,
            render_distance: 10,
            max_chunks_per_frame: 4,
            seed: None,
        }
    }
}

impl WorldConfig {
    pub fn chunk_dims(&self) -> ChunkDims {
        ChunkDims {
            size: self.chunk_size,
            height: self.chunk_height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    pub fov: f32,
    pub vsync: bool,
    pub mouse_sensitivity: f32,
    pub move_speed: f32,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            fov: 45.0,
            vsync: true,
            mouse_sensitivity: 0.1,
            move_speed: 16.0,
        }
    }
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> EngineSettings {
    match std::fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("settings file is unreadable ({e}), falling back to defaults");
                EngineSettings::default()
            }
        },
        Err(_) => {
            info!("no settings file found, using defaults");
            EngineSettings::default()
        }
    }
}

pub fn save_settings<P: AsRef<Path>>(path: P, settings: &EngineSettings) {
    let json = match serde_json::to_string_pretty(settings) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to serialize settings: {e}");
            return;
        }
    };
    if let Err(e) = std::fs::write(&path, json) {
        warn!("failed to write settings: {e}");
    }
}

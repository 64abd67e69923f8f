use crate::ram::MapBounds;
use crate::statics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Startup settings persisted next to the executable's working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub default_x_start: i64,
    pub default_x_end: i64,
    pub default_y_start: i64,
    pub default_y_end: i64,
    pub tile_size: u32,
    pub textures_dir: PathBuf,

    #[serde(skip)]
    from_disk: bool,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            default_x_start: -1,
            default_x_end: 1,
            default_y_start: -2,
            default_y_end: 2,
            tile_size: statics::DEFAULT_TILE_SIZE,
            textures_dir: PathBuf::from(statics::DEFAULT_TEXTURES_DIR),
            from_disk: false,
        }
    }
}

impl ConfigData {
    /// Reads `path` if it exists; otherwise returns defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            tracing::info!(?path, "no config file found, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        let mut config: ConfigData =
            json5::from_str(&text).with_context(|| format!("parsing {path:?}"))?;
        config.from_disk = true;
        tracing::info!(?path, "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = json5::to_string(self).context("serializing config")?;
        fs::write(path, text).with_context(|| format!("writing {path:?}"))?;
        tracing::info!(?path, "config saved");
        Ok(())
    }

    pub fn from_disk(&self) -> bool {
        self.from_disk
    }

    /// Bounds for a fresh map. Swapped pairs are put back in order.
    pub fn default_bounds(&self) -> MapBounds {
        if self.default_x_start > self.default_x_end || self.default_y_start > self.default_y_end {
            tracing::warn!(config = ?self, "default bounds are inverted; normalizing");
        }
        MapBounds::new(
            self.default_x_start.min(self.default_x_end),
            self.default_x_start.max(self.default_x_end),
            self.default_y_start.min(self.default_y_end),
            self.default_y_start.max(self.default_y_end),
        )
    }
}

use crate::error::{Result, SaveError, ValidationError};
use crate::ram::{MapBounds, RamData};
use crate::statics;
use crate::symbol::SymbolData;
use crate::tile::TileData;
use crate::value::MapValue;
use flate2::{Compression, GzBuilder, read::GzDecoder};
use indexmap::IndexMap;
use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Json5,
    GzipJson5,
}

impl SaveFormat {
    /// Format used when writing to `path`.
    pub fn for_path(path: &Path) -> Self {
        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            SaveFormat::GzipJson5
        } else {
            SaveFormat::Json5
        }
    }
}

/// The persisted projection of [`RamData`]: enabled tiles, bounds and the
/// symbols that carry text.
#[derive(Debug, Clone, Default)]
pub struct MapSaveData {
    pub tiles: Vec<TileData>,
    pub bounds: MapBounds,
    pub symbols: IndexMap<char, SymbolData>,
}

const BOUND_KEYS: [&str; 4] = [
    statics::MAP_X_START,
    statics::MAP_X_END,
    statics::MAP_Y_START,
    statics::MAP_Y_END,
];

fn wrong_type(field: &str, expected: &'static str) -> ValidationError {
    ValidationError::WrongType {
        field: field.to_string(),
        expected,
    }
}

impl MapSaveData {
    /// Checks the document shape and bound ordering. Missing fields count as
    /// their defaults.
    pub fn validate(value: &MapValue) -> std::result::Result<(), ValidationError> {
        let obj = value.as_object().ok_or(ValidationError::NotAnObject {
            found: value.type_name(),
        })?;

        if let Some(tiles) = obj.get(statics::MAP_TILES) {
            let items = tiles
                .as_array()
                .ok_or_else(|| wrong_type(statics::MAP_TILES, "a list of tile records"))?;
            if items.iter().any(|t| t.as_object().is_none()) {
                return Err(wrong_type(statics::MAP_TILES, "a list of tile records"));
            }
        }

        if let Some(symbols) = obj.get(statics::MAP_SYMBOLS) {
            let entries = symbols
                .as_object()
                .ok_or_else(|| wrong_type(statics::MAP_SYMBOLS, "a mapping of symbol records"))?;
            if entries.values().any(|s| s.as_object().is_none()) {
                return Err(wrong_type(
                    statics::MAP_SYMBOLS,
                    "a mapping of symbol records",
                ));
            }
        }

        let mut bounds = [0_i64; 4];
        for (slot, key) in bounds.iter_mut().zip(BOUND_KEYS) {
            if let Some(raw) = obj.get(key) {
                *slot = raw.as_i64().ok_or_else(|| wrong_type(key, "an integer"))?;
            }
        }

        let [x_start, x_end, y_start, y_end] = bounds;
        if x_start > x_end {
            return Err(ValidationError::InvertedBounds {
                axis: "x",
                start: x_start,
                end: x_end,
            });
        }
        if y_start > y_end {
            return Err(ValidationError::InvertedBounds {
                axis: "y",
                start: y_start,
                end: y_end,
            });
        }
        Ok(())
    }

    pub fn decode(value: &MapValue) -> Result<Self> {
        if let Err(e) = Self::validate(value) {
            tracing::warn!(error = %e, "rejecting map document");
            return Err(e.into());
        }

        let bound = |key: &str| value.get(key).and_then(MapValue::as_i64).unwrap_or(0);
        let bounds = MapBounds::new(
            bound(statics::MAP_X_START),
            bound(statics::MAP_X_END),
            bound(statics::MAP_Y_START),
            bound(statics::MAP_Y_END),
        );

        let tiles = value
            .get(statics::MAP_TILES)
            .and_then(MapValue::as_array)
            .unwrap_or_default()
            .iter()
            .map(TileData::decode)
            .collect::<Result<Vec<_>>>()?;

        let mut symbols = IndexMap::new();
        if let Some(entries) = value.get(statics::MAP_SYMBOLS).and_then(MapValue::as_object) {
            for (key, record) in entries {
                let symbol = SymbolData::decode(key, record)?;
                symbols.insert(symbol.letter, symbol);
            }
        }

        Ok(Self {
            tiles,
            bounds,
            symbols,
        })
    }

    pub fn encode(&self) -> Result<MapValue> {
        let mut map = IndexMap::new();
        map.insert(
            statics::MAP_X_START.to_string(),
            MapValue::from(self.bounds.x_start),
        );
        map.insert(
            statics::MAP_X_END.to_string(),
            MapValue::from(self.bounds.x_end),
        );
        map.insert(
            statics::MAP_Y_START.to_string(),
            MapValue::from(self.bounds.y_start),
        );
        map.insert(
            statics::MAP_Y_END.to_string(),
            MapValue::from(self.bounds.y_end),
        );
        map.insert(
            statics::MAP_TILES.to_string(),
            MapValue::Array(self.tiles.iter().map(TileData::encode).collect()),
        );

        let mut symbols = IndexMap::new();
        for (letter, symbol) in &self.symbols {
            symbols.insert(letter.to_string(), symbol.encode()?);
        }
        map.insert(statics::MAP_SYMBOLS.to_string(), MapValue::Object(symbols));

        Ok(MapValue::Object(map))
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(self.encode()?.to_json5_pretty())
    }

    pub fn parse_text(text: &str) -> Result<Self> {
        let value = MapValue::parse_json5(text).map_err(|e| SaveError::Parse(format!("{e:#}")))?;
        Self::decode(&value)
    }

    pub fn to_bytes(&self, format: SaveFormat) -> Result<Vec<u8>> {
        let text = self.to_text()?;
        match format {
            SaveFormat::Json5 => Ok(text.into_bytes()),
            SaveFormat::GzipJson5 => {
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder
                    .write_all(text.as_bytes())
                    .map_err(SaveError::Gzip)?;
                encoder.finish().map_err(SaveError::Gzip)
            }
        }
    }

    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let text_bytes = match detect_format(path, bytes) {
            SaveFormat::Json5 => bytes.to_vec(),
            SaveFormat::GzipJson5 => {
                let mut decoder = GzDecoder::new(bytes);
                let mut out = Vec::new();
                decoder
                    .read_to_end(&mut out)
                    .map_err(SaveError::Gzip)?;
                out
            }
        };
        let text = std::str::from_utf8(&text_bytes)?;
        Self::parse_text(text)
    }
}

fn detect_format(path: &Path, bytes: &[u8]) -> SaveFormat {
    if SaveFormat::for_path(path) == SaveFormat::GzipJson5 {
        return SaveFormat::GzipJson5;
    }
    // Gzip magic: 1F 8B
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return SaveFormat::GzipJson5;
    }
    SaveFormat::Json5
}

/// Moves maps between [`RamData`] and files. Holds no state of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveManager;

impl SaveManager {
    /// Builds the payload for the current map.
    ///
    /// Bounds start at zero and each coordinate only pushes the side it falls
    /// outside of, so a lone tile at (3, 3) yields `0..=3` on both axes.
    pub fn collect(ram: &RamData) -> Result<MapSaveData> {
        let mut payload = MapSaveData::default();

        for tile in ram.tiles.iter().filter(|t| t.enabled) {
            let b = &mut payload.bounds;
            if tile.x < b.x_start {
                b.x_start = tile.x;
            } else if tile.x > b.x_end {
                b.x_end = tile.x;
            }
            if tile.y < b.y_start {
                b.y_start = tile.y;
            } else if tile.y > b.y_end {
                b.y_end = tile.y;
            }
            payload.tiles.push(tile.clone());
        }

        for (letter, symbol) in &ram.symbols {
            if !symbol.get_value()?.is_empty() {
                payload.symbols.insert(*letter, symbol.clone());
            }
        }

        Ok(payload)
    }

    pub fn export(ram: &mut RamData, path: &Path) -> Result<MapSaveData> {
        let payload = Self::collect(ram)?;
        let bytes = payload.to_bytes(SaveFormat::for_path(path))?;
        fs::write(path, &bytes).map_err(|e| SaveError::io(path, e))?;

        remember_location(ram, path);
        tracing::info!(
            ?path,
            tiles = payload.tiles.len(),
            symbols = payload.symbols.len(),
            "map exported"
        );
        Ok(payload)
    }

    pub fn load_payload(path: &Path) -> Result<MapSaveData> {
        let bytes = fs::read(path).map_err(|e| SaveError::io(path, e))?;
        MapSaveData::from_bytes(path, &bytes)
    }

    /// Replaces tiles, bounds and symbols, then rebuilds the coordinate index.
    pub fn apply(ram: &mut RamData, payload: MapSaveData) {
        ram.tiles = payload.tiles;
        ram.bounds = payload.bounds;
        ram.symbols = payload.symbols;
        ram.rebuild_lookup();
    }

    /// Loads `path` into `ram`. On error `ram` is left as it was.
    pub fn import(ram: &mut RamData, path: &Path) -> Result<()> {
        let payload = match Self::load_payload(path) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(?path, error = %e, "map import failed");
                return Err(e);
            }
        };
        let (tiles, symbols) = (payload.tiles.len(), payload.symbols.len());
        Self::apply(ram, payload);

        remember_location(ram, path);
        tracing::info!(?path, tiles, symbols, "map imported");
        Ok(())
    }
}

fn remember_location(ram: &mut RamData, path: &Path) {
    ram.save_folder = path.parent().map(PathBuf::from);
    ram.save_file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
}

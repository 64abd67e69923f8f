use crate::config::ConfigData;
use crate::statics;
use crate::symbol::{SYMBOL_LETTERS, SymbolData};
use crate::texture::TextureCatalog;
use crate::tile::{TileData, coord_key};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Inclusive grid rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapBounds {
    pub x_start: i64,
    pub x_end: i64,
    pub y_start: i64,
    pub y_end: i64,
}

impl MapBounds {
    pub fn new(x_start: i64, x_end: i64, y_start: i64, y_end: i64) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Column count, saturating at `i64::MAX`.
    pub fn width(&self) -> i64 {
        self.x_end.saturating_sub(self.x_start).saturating_add(1)
    }

    pub fn height(&self) -> i64 {
        self.y_end.saturating_sub(self.y_start).saturating_add(1)
    }
}

/// Which edge of the map grows by one row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandDirection {
    Top,
    Bottom,
    Left,
    Right,
}

/// The live editing state. One instance per session, owned by the application
/// root and handed to the save manager and the GUI by reference.
#[derive(Debug, Default)]
pub struct RamData {
    pub tiles: Vec<TileData>,
    pub symbols: IndexMap<char, SymbolData>,
    pub textures: TextureCatalog,
    pub bounds: MapBounds,
    /// `"x:y"` -> index into `tiles`.
    pub tile_lookup: HashMap<String, usize>,
    pub held_letters: BTreeSet<char>,
    pub selected_texture: String,
    pub save_folder: Option<PathBuf>,
    pub save_file_name: Option<String>,
}

impl RamData {
    pub fn new() -> Self {
        Self {
            selected_texture: statics::NO_TEXTURE_NAME.to_string(),
            ..Default::default()
        }
    }

    /// Drops every tile and fills `bounds` with fresh ones.
    pub fn initialize_grid(&mut self, bounds: MapBounds) {
        self.tiles.clear();
        self.tile_lookup.clear();
        self.bounds = bounds;
        for x in bounds.x_start..=bounds.x_end {
            for y in bounds.y_start..=bounds.y_end {
                self.push_tile(TileData::new(x, y));
            }
        }
        tracing::debug!(?bounds, tiles = self.tiles.len(), "grid initialized");
    }

    pub fn reset_layout(&mut self, config: &ConfigData) {
        self.initialize_grid(config.default_bounds());
    }

    /// Grows the map by one row or column. A bound already at the `i64` limit
    /// stays put.
    pub fn expand(&mut self, direction: ExpandDirection) {
        let before = self.bounds;
        let b = &mut self.bounds;
        match direction {
            ExpandDirection::Top => b.y_start = b.y_start.saturating_sub(1),
            ExpandDirection::Bottom => b.y_end = b.y_end.saturating_add(1),
            ExpandDirection::Left => b.x_start = b.x_start.saturating_sub(1),
            ExpandDirection::Right => b.x_end = b.x_end.saturating_add(1),
        }
        let b = *b;
        if b == before {
            tracing::warn!(?direction, bounds = ?b, "map cannot grow past the coordinate limit");
            return;
        }

        let edge: Vec<(i64, i64)> = match direction {
            ExpandDirection::Top => (b.x_start..=b.x_end).map(|x| (x, b.y_start)).collect(),
            ExpandDirection::Bottom => (b.x_start..=b.x_end).map(|x| (x, b.y_end)).collect(),
            ExpandDirection::Left => (b.y_start..=b.y_end).map(|y| (b.x_start, y)).collect(),
            ExpandDirection::Right => (b.y_start..=b.y_end).map(|y| (b.x_end, y)).collect(),
        };
        for (x, y) in edge {
            self.tile_index_or_insert(x, y);
        }
    }

    pub fn tile_index(&self, x: i64, y: i64) -> Option<usize> {
        self.tile_lookup.get(&coord_key(x, y)).copied()
    }

    /// Returns the tile shown at `(x, y)`, creating it on first display.
    pub fn tile_index_or_insert(&mut self, x: i64, y: i64) -> usize {
        match self.tile_index(x, y) {
            Some(idx) => idx,
            None => self.push_tile(TileData::new(x, y)),
        }
    }

    fn push_tile(&mut self, tile: TileData) -> usize {
        let idx = self.tiles.len();
        self.tile_lookup.insert(tile.coord_key(), idx);
        self.tiles.push(tile);
        idx
    }

    /// Later tiles win when two share a coordinate.
    pub fn rebuild_lookup(&mut self) {
        self.tile_lookup = self
            .tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| (tile.coord_key(), idx))
            .collect();
    }

    /// Makes sure all 26 letters have an entry, keeping existing ones.
    pub fn initialize_symbols(&mut self) {
        let mut symbols = IndexMap::with_capacity(26);
        for letter in SYMBOL_LETTERS {
            let entry = self
                .symbols
                .shift_remove(&letter)
                .unwrap_or_else(|| SymbolData::new(letter));
            symbols.insert(letter, entry);
        }
        self.symbols = symbols;
    }

    pub fn set_textures(&mut self, catalog: TextureCatalog) {
        self.textures = catalog;
        if self.textures.get(&self.selected_texture).is_none() {
            self.selected_texture = statics::NO_TEXTURE_NAME.to_string();
        }
    }

    pub fn toggle_tile(&mut self, idx: usize) {
        if let Some(tile) = self.tiles.get_mut(idx) {
            let enabled = !tile.enabled;
            tile.set_enabled(enabled);
        }
    }

    /// Applies the held letters to an enabled tile.
    pub fn paint_tags(&mut self, idx: usize) {
        if self.held_letters.is_empty() {
            return;
        }
        if let Some(tile) = self.tiles.get_mut(idx)
            && tile.enabled
        {
            tile.toggle_tags(&self.held_letters);
        }
    }

    pub fn paint_texture(&mut self, idx: usize) {
        if let Some(tile) = self.tiles.get_mut(idx) {
            tile.texture = self.selected_texture.clone();
        }
    }

    /// Returns false for anything that is not an ASCII letter.
    pub fn hold_letter(&mut self, letter: char) -> bool {
        if !letter.is_ascii_alphabetic() {
            return false;
        }
        self.held_letters.insert(letter.to_ascii_uppercase());
        true
    }

    pub fn release_letter(&mut self, letter: char) {
        self.held_letters.remove(&letter.to_ascii_uppercase());
    }

    pub fn save_path(&self) -> Option<PathBuf> {
        let folder = self.save_folder.as_ref()?;
        let name = self.save_file_name.as_ref()?;
        Some(folder.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::{ExpandDirection, MapBounds, RamData};
    use crate::config::ConfigData;
    use crate::statics;
    use crate::symbol::SymbolData;
    use crate::texture::TextureCatalog;
    use crate::tile::TileData;

    #[test]
    fn initialize_grid_fills_rectangle() {
        let mut ram = RamData::new();
        let bounds = MapBounds::new(-1, 1, -2, 2);
        ram.initialize_grid(bounds);

        assert_eq!(ram.tiles.len(), 15);
        assert_eq!(ram.tile_lookup.len(), 15);
        let idx = ram.tile_index(-1, 2).unwrap();
        assert_eq!((ram.tiles[idx].x, ram.tiles[idx].y), (-1, 2));
        assert!(ram.tiles.iter().all(|t| !t.enabled));
    }

    #[test]
    fn reset_layout_uses_config_defaults() {
        let mut ram = RamData::new();
        ram.initialize_grid(MapBounds::new(0, 5, 0, 5));
        ram.reset_layout(&ConfigData::default());
        assert_eq!(ram.bounds, MapBounds::new(-1, 1, -2, 2));
        assert_eq!(ram.tiles.len(), 15);
    }

    #[test]
    fn expand_adds_one_edge() {
        let mut ram = RamData::new();
        ram.initialize_grid(MapBounds::new(0, 1, 0, 2));

        ram.expand(ExpandDirection::Top);
        assert_eq!(ram.bounds.y_start, -1);
        assert_eq!(ram.tiles.len(), 6 + 2);

        ram.expand(ExpandDirection::Right);
        assert_eq!(ram.bounds.x_end, 2);
        assert_eq!(ram.tiles.len(), 8 + 4);

        ram.expand(ExpandDirection::Left);
        ram.expand(ExpandDirection::Bottom);
        assert_eq!(ram.bounds, MapBounds::new(-1, 2, -1, 3));
        assert_eq!(ram.tiles.len() as i64, ram.bounds.width() * ram.bounds.height());
        assert!(ram.tile_index(-1, 3).is_some());
    }

    #[test]
    fn expand_stops_at_coordinate_limit() {
        let mut ram = RamData::new();
        ram.bounds = MapBounds::new(i64::MAX - 1, i64::MAX, 0, 0);

        ram.expand(ExpandDirection::Right);
        assert_eq!(ram.bounds.x_end, i64::MAX);
        assert!(ram.tiles.is_empty());

        ram.expand(ExpandDirection::Bottom);
        assert_eq!(ram.bounds.y_end, 1);
        assert_eq!(ram.tiles.len(), 2);
    }

    #[test]
    fn extreme_bounds_do_not_overflow_size() {
        let bounds = MapBounds::new(i64::MIN, i64::MAX, 0, 0);
        assert_eq!(bounds.width(), i64::MAX);
        assert_eq!(bounds.height(), 1);
    }

    #[test]
    fn lazily_inserted_tiles_are_reused() {
        let mut ram = RamData::new();
        let a = ram.tile_index_or_insert(7, 7);
        let b = ram.tile_index_or_insert(7, 7);
        assert_eq!(a, b);
        assert_eq!(ram.tiles.len(), 1);
    }

    #[test]
    fn rebuild_lookup_prefers_last_duplicate() {
        let mut ram = RamData::new();
        ram.tiles = vec![TileData::new(3, 3), TileData::new(1, 0), TileData::new(3, 3)];
        ram.rebuild_lookup();
        assert_eq!(ram.tile_lookup.len(), 2);
        assert_eq!(ram.tile_index(3, 3), Some(2));
    }

    #[test]
    fn toggling_off_clears_tags() {
        let mut ram = RamData::new();
        let idx = ram.tile_index_or_insert(0, 0);
        ram.toggle_tile(idx);
        assert!(ram.hold_letter('a'));
        assert!(!ram.hold_letter('1'));
        ram.paint_tags(idx);
        assert_eq!(ram.tiles[idx].tags.iter().collect::<String>(), "A");

        ram.toggle_tile(idx);
        assert!(!ram.tiles[idx].enabled);
        assert!(ram.tiles[idx].tags.is_empty());

        // Disabled tiles do not take tags.
        ram.paint_tags(idx);
        assert!(ram.tiles[idx].tags.is_empty());
    }

    #[test]
    fn paint_texture_uses_selection() {
        let mut ram = RamData::new();
        let idx = ram.tile_index_or_insert(2, -2);
        ram.selected_texture = "lava".to_string();
        ram.paint_texture(idx);
        assert_eq!(ram.tiles[idx].texture, "lava");
    }

    #[test]
    fn unknown_selection_falls_back_after_catalog_change() {
        let mut ram = RamData::new();
        ram.selected_texture = "lava".to_string();
        ram.set_textures(TextureCatalog::default());
        assert_eq!(ram.selected_texture, statics::NO_TEXTURE_NAME);
        assert!(ram.textures.get(statics::NO_TEXTURE_NAME).is_some());
    }

    #[test]
    fn initialize_symbols_keeps_existing_entries() {
        let mut ram = RamData::new();
        let mut loaded = SymbolData::new('M');
        loaded.default_value = "monster".to_string();
        ram.symbols.insert('M', loaded);

        ram.initialize_symbols();
        assert_eq!(ram.symbols.len(), 26);
        assert_eq!(ram.symbols.keys().next(), Some(&'A'));
        assert_eq!(ram.symbols[&'M'].default_value, "monster");
    }

    #[test]
    fn save_path_needs_folder_and_name() {
        let mut ram = RamData::new();
        assert!(ram.save_path().is_none());
        ram.save_folder = Some("maps".into());
        ram.save_file_name = Some("keep.json".into());
        assert_eq!(ram.save_path(), Some("maps/keep.json".into()));
    }
}

use crate::error::{Result, SaveError};
use crate::statics;
use crate::value::{MapValue, typed_field};
use indexmap::IndexMap;
use std::collections::BTreeSet;

const RECORD: &str = "tile";

/// Lookup key for a grid coordinate, e.g. `"-1:3"`.
pub fn coord_key(x: i64, y: i64) -> String {
    format!("{x}:{y}")
}

/// One cell of the map grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileData {
    pub x: i64,
    pub y: i64,
    pub enabled: bool,
    pub tags: BTreeSet<char>,
    /// Empty or `statics::NO_TEXTURE_NAME` means unpainted.
    pub texture: String,
}

/// A tile record as it appears in a save file. Every field is optional;
/// [`TileData::from_record`] supplies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileRecord {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub enabled: Option<bool>,
    pub tags: Option<BTreeSet<char>>,
    pub texture: Option<String>,
}

impl TileRecord {
    pub fn from_value(value: &MapValue) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| SaveError::InvalidField {
            record: RECORD,
            field: statics::MAP_TILES.to_string(),
            expected: "a list of objects",
        })?;

        let tags = match obj.get(statics::TILE_TAGS) {
            None => None,
            Some(raw) => Some(decode_tags(raw)?),
        };

        Ok(Self {
            x: typed_field(RECORD, obj, statics::TILE_X, "an integer", MapValue::as_i64)?,
            y: typed_field(RECORD, obj, statics::TILE_Y, "an integer", MapValue::as_i64)?,
            enabled: typed_field(
                RECORD,
                obj,
                statics::TILE_ENABLED,
                "a bool",
                MapValue::as_bool,
            )?,
            tags,
            texture: typed_field(RECORD, obj, statics::TILE_TEXTURE, "a string", |v| {
                v.as_str().map(str::to_owned)
            })?,
        })
    }
}

fn decode_tags(raw: &MapValue) -> Result<BTreeSet<char>> {
    let invalid = || SaveError::InvalidField {
        record: RECORD,
        field: statics::TILE_TAGS.to_string(),
        expected: "a list of single letters",
    };

    let items = raw.as_array().ok_or_else(invalid)?;
    let mut tags = BTreeSet::new();
    for item in items {
        let s = item.as_str().ok_or_else(invalid)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                tags.insert(c.to_ascii_uppercase());
            }
            _ => return Err(invalid()),
        }
    }
    Ok(tags)
}

impl TileData {
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            enabled: false,
            tags: BTreeSet::new(),
            texture: String::new(),
        }
    }

    pub fn coord_key(&self) -> String {
        coord_key(self.x, self.y)
    }

    /// Disabling a tile drops its tags. The texture is kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.tags.clear();
        }
    }

    /// Flips each letter independently: present letters are removed, absent
    /// ones are added.
    pub fn toggle_tags<'a>(&mut self, letters: impl IntoIterator<Item = &'a char>) {
        for letter in letters {
            if !self.tags.remove(letter) {
                self.tags.insert(*letter);
            }
        }
    }

    pub fn has_texture(&self) -> bool {
        !self.texture.is_empty() && self.texture != statics::NO_TEXTURE_NAME
    }

    /// Button text: coordinates on the first line, tags on the second.
    pub fn label(&self) -> String {
        let tags: String = self.tags.iter().collect();
        format!("{}:{}\n{}", self.x, self.y, tags)
    }

    /// Missing `enabled` decodes as `true`, unlike [`TileData::new`].
    pub fn from_record(record: TileRecord) -> Self {
        Self {
            x: record.x.unwrap_or(0),
            y: record.y.unwrap_or(0),
            enabled: record.enabled.unwrap_or(true),
            tags: record.tags.unwrap_or_default(),
            texture: record.texture.unwrap_or_default(),
        }
    }

    pub fn decode(value: &MapValue) -> Result<Self> {
        TileRecord::from_value(value).map(Self::from_record)
    }

    pub fn encode(&self) -> MapValue {
        let mut map = IndexMap::new();
        map.insert(statics::TILE_X.to_string(), MapValue::from(self.x));
        map.insert(statics::TILE_Y.to_string(), MapValue::from(self.y));
        map.insert(
            statics::TILE_ENABLED.to_string(),
            MapValue::from(self.enabled),
        );
        map.insert(
            statics::TILE_TAGS.to_string(),
            MapValue::Array(
                self.tags
                    .iter()
                    .map(|c| MapValue::String(c.to_string()))
                    .collect(),
            ),
        );
        map.insert(
            statics::TILE_TEXTURE.to_string(),
            MapValue::from(self.texture.as_str()),
        );
        MapValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::{TileData, TileRecord, coord_key};
    use crate::error::SaveError;
    use crate::value::MapValue;
    use std::collections::BTreeSet;

    fn letters(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    #[test]
    fn new_tile_is_disabled_and_blank() {
        let tile = TileData::new(-2, 5);
        assert!(!tile.enabled);
        assert!(tile.tags.is_empty());
        assert_eq!(tile.texture, "");
        assert_eq!(tile.coord_key(), "-2:5");
    }

    #[test]
    fn toggle_tags_is_per_letter_xor() {
        let mut tile = TileData::new(0, 0);
        tile.enabled = true;
        tile.tags = letters("AB");

        tile.toggle_tags(&letters("BC"));
        assert_eq!(tile.tags, letters("AC"));
    }

    #[test]
    fn toggle_tags_twice_is_identity() {
        let mut tile = TileData::new(0, 0);
        tile.tags = letters("AQ");
        let original = tile.tags.clone();

        for held in ["A", "QZ", "ABCXYZ"] {
            tile.toggle_tags(&letters(held));
            tile.toggle_tags(&letters(held));
            assert_eq!(tile.tags, original, "held {held}");
        }
    }

    #[test]
    fn disabling_clears_tags_but_keeps_texture() {
        let mut tile = TileData::new(1, 1);
        tile.set_enabled(true);
        tile.tags = letters("DE");
        tile.texture = "grass".to_string();

        tile.set_enabled(false);
        assert!(tile.tags.is_empty());
        assert_eq!(tile.texture, "grass");
    }

    #[test]
    fn decode_defaults_missing_fields() {
        let tile = TileData::decode(&MapValue::parse_json5("{}").unwrap()).unwrap();
        assert_eq!(tile.x, 0);
        assert_eq!(tile.y, 0);
        assert!(tile.enabled, "missing `enabled` decodes as true");
        assert!(tile.tags.is_empty());
        assert_eq!(tile.texture, "");
    }

    #[test]
    fn decode_rejects_wrong_field_types() {
        for text in [
            "{ x: 'one' }",
            "{ y: 1.5 }",
            "{ enabled: 1 }",
            "{ tags: 'A' }",
            "{ tags: ['AB'] }",
            "{ texture: 3 }",
        ] {
            let value = MapValue::parse_json5(text).unwrap();
            assert!(
                matches!(
                    TileRecord::from_value(&value),
                    Err(SaveError::InvalidField { .. })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn encode_then_decode_preserves_tile() {
        let mut tile = TileData::new(-3, 7);
        tile.enabled = true;
        tile.tags = letters("ZAM");
        tile.texture = "stone floor".to_string();

        let back = TileData::decode(&tile.encode()).unwrap();
        assert_eq!(back, tile);
    }

    #[test]
    fn decode_normalizes_lowercase_tags() {
        let value = MapValue::parse_json5("{ tags: ['a', 'B', 'a'] }").unwrap();
        let tile = TileData::decode(&value).unwrap();
        assert_eq!(tile.tags, letters("AB"));
    }

    #[test]
    fn label_lists_coordinates_and_tags() {
        let mut tile = TileData::new(4, -1);
        tile.tags = letters("CA");
        assert_eq!(tile.label(), "4:-1\nAC");
        assert_eq!(coord_key(4, -1), "4:-1");
    }
}

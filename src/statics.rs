// Central place for UI strings, file-format keys and other non-localized constants.
// Keep these out of gui.rs and save.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Simple Game Mapper";

pub const EN_BTN_NEW: &str = "New";
pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_SAVE_AS: &str = "Save As...";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_EXPAND_TOP: &str = "+ Top";
pub const EN_BTN_EXPAND_BOTTOM: &str = "+ Bottom";
pub const EN_BTN_EXPAND_LEFT: &str = "+ Left";
pub const EN_BTN_EXPAND_RIGHT: &str = "+ Right";

pub const EN_HEADING_TEXTURES: &str = "Textures";
pub const EN_HEADING_SYMBOLS: &str = "Symbols";
pub const EN_HEADING_HELD: &str = "Held letters";

pub const EN_COL_LETTER: &str = "Letter";
pub const EN_COL_MEANING: &str = "Meaning";

pub const EN_HINT_MEANING: &str = "meaning";
pub const EN_HELD_NONE: &str = "(none)";
pub const EN_HELP_TILES: &str =
    "Click: toggle tile. Hold letters + click: toggle tags. Right click: paint texture.";

pub const EN_FILTER_MAP: &str = "Game Map";
pub const EN_DEFAULT_FILE_NAME: &str = "map.json";

// Save file keys (MAP_ prefix).
pub const MAP_X_START: &str = "x_start";
pub const MAP_X_END: &str = "x_end";
pub const MAP_Y_START: &str = "y_start";
pub const MAP_Y_END: &str = "y_end";
pub const MAP_TILES: &str = "tiles";
pub const MAP_SYMBOLS: &str = "symbols";

pub const TILE_X: &str = "x";
pub const TILE_Y: &str = "y";
pub const TILE_ENABLED: &str = "enabled";
pub const TILE_TAGS: &str = "tags";
pub const TILE_TEXTURE: &str = "texture";

pub const SYMBOL_VALUE: &str = "value";

// Textures.
pub const NO_TEXTURE_NAME: &str = "None";
pub const NO_TEXTURE_PATH: &str = "none";
pub const TEXTURE_CLASS_PREFIX: &str = "texture_";

// Config defaults.
pub const CONFIG_FILE_NAME: &str = "map_config.json5";
pub const DEFAULT_TEXTURES_DIR: &str = "textures";
pub const DEFAULT_TILE_SIZE: u32 = 40;

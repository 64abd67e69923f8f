//! Core library for the Simple Game Mapper.
//! Holds the in-memory map model (tiles, symbol legend, texture catalog) and the
//! validating save/load path between that model and JSON5 map files.

pub mod config;
pub mod error;
mod gui;
pub mod ram;
mod save;
pub mod statics;
pub mod symbol;
pub mod texture;
pub mod tile;
mod value;

pub use config::ConfigData;
pub use error::{SaveError, ValidationError};
pub use gui::run_gui;
pub use ram::{ExpandDirection, MapBounds, RamData};
pub use save::{MapSaveData, SaveFormat, SaveManager};
pub use symbol::{SymbolData, SymbolRecord, SymbolSource};
pub use texture::{TextureCatalog, TextureData};
pub use tile::{TileData, TileRecord};
pub use value::{MapNumber, MapValue};

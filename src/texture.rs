use crate::statics;
use indexmap::IndexMap;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// A named paint style backed by an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub name: String,
    /// Style identifier: prefix plus the name with whitespace removed.
    pub class_name: String,
    /// Absolute image path, or `statics::NO_TEXTURE_PATH`.
    pub path: PathBuf,
    pub css: String,
}

impl TextureData {
    pub fn new(name: &str, path: PathBuf) -> Self {
        let class_name = class_name_for(name);
        let css = format!(
            ".{class_name} {{ background-image: url(\"{}\"); background-size: cover; }}",
            path.display()
        );
        Self {
            name: name.to_string(),
            class_name,
            path,
            css,
        }
    }

    pub fn none() -> Self {
        let class_name = class_name_for(statics::NO_TEXTURE_NAME);
        let css = format!(".{class_name} {{}}");
        Self {
            name: statics::NO_TEXTURE_NAME.to_string(),
            class_name,
            path: PathBuf::from(statics::NO_TEXTURE_PATH),
            css,
        }
    }

    pub fn is_none(&self) -> bool {
        self.name == statics::NO_TEXTURE_NAME
    }
}

fn class_name_for(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{}{stripped}", statics::TEXTURE_CLASS_PREFIX)
}

/// The texture registry, built once at startup.
#[derive(Debug, Clone)]
pub struct TextureCatalog {
    pub textures: IndexMap<String, TextureData>,
}

impl Default for TextureCatalog {
    /// A catalog holding only the no-texture entry.
    fn default() -> Self {
        let none = TextureData::none();
        let mut textures = IndexMap::new();
        textures.insert(none.name.clone(), none);
        Self { textures }
    }
}

impl TextureCatalog {
    /// Registers every regular file in `dir`, creating the directory if needed.
    /// Iteration order follows the filesystem; use [`TextureCatalog::sorted_names`]
    /// for a stable listing.
    pub fn bootstrap(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let Self { mut textures } = Self::default();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(?path, "skipping texture with a non UTF-8 name");
                continue;
            };
            if name == statics::NO_TEXTURE_NAME {
                tracing::warn!(?path, "texture name is reserved; skipping");
                continue;
            }
            let absolute = fs::canonicalize(&path)?;
            let texture = TextureData::new(name, absolute);
            textures.insert(texture.name.clone(), texture);
        }

        tracing::debug!(count = textures.len(), ?dir, "texture catalog built");
        Ok(Self { textures })
    }

    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.textures.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get(&self, name: &str) -> Option<&TextureData> {
        self.textures.get(name)
    }
}

use std::collections::HashMap;
use std::path::Path;

/// Intrinsic dimensions of a loaded image asset.
///
/// A texture here is metadata only: the visual layer resolves the path to an
/// actual drawable, the core just needs dimensions to size sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureInfo {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl TextureInfo {
    /// Sprite scale that fits this texture into a circle of the given
    /// diameter, multiplied by an extra visual scale factor.
    pub fn scale_for_diameter(&self, diameter: f32, scale: f32) -> f32 {
        let max_dimension = self.width.max(self.height).max(1) as f32;
        (diameter / max_dimension) * scale
    }
}

/// Manages cached texture metadata keyed by asset path.
pub struct TextureStore {
    textures: HashMap<String, TextureInfo>,
}

impl TextureStore {
    /// Create a new store with no cached textures.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Load a texture's intrinsic dimensions, caching by path.
    ///
    /// Decode failure is not an error: a missing or unreadable asset yields a
    /// 1x1 placeholder so scene setup always completes. The failure is logged.
    pub fn load(&mut self, path: &str) -> TextureInfo {
        if let Some(info) = self.textures.get(path) {
            return info.clone();
        }

        let info = match image::image_dimensions(Path::new(path)) {
            Ok((width, height)) => TextureInfo {
                path: path.to_string(),
                width,
                height,
            },
            Err(err) => {
                log::warn!("Failed to read texture {path}: {err}. Using placeholder size.");
                TextureInfo {
                    path: path.to_string(),
                    width: 1,
                    height: 1,
                }
            }
        };

        self.textures.insert(path.to_string(), info.clone());
        info
    }

    /// Load a batch of textures, returning them in input order.
    pub fn load_all(&mut self, paths: &[&str]) -> Vec<TextureInfo> {
        paths.iter().map(|p| self.load(p)).collect()
    }

    /// Get a cached texture by path, if it exists.
    pub fn get(&self, path: &str) -> Option<&TextureInfo> {
        self.textures.get(path)
    }

    /// Check if a texture is already cached.
    pub fn contains(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    /// Clear all cached textures.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::new()
    }
}

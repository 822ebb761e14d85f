use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::ColorConfig, extract::palette_from_pixels, palette::Palette, sampler::PixelBuffer,
    Result,
};

/// Identity of a cover image, usually its path or URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageKey(pub String);

impl ImageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl From<&str> for ImageKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Palettes computed per cover image, owned by the rendering side. Nothing is
/// shared between instances.
#[derive(Debug, Default)]
pub struct SchemeCache {
    schemes: HashMap<ImageKey, Palette>,
    active: Option<ImageKey>,
}

impl SchemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ImageKey) -> Option<&Palette> {
        self.schemes.get(key)
    }

    pub fn insert(&mut self, key: ImageKey, palette: Palette) {
        self.schemes.insert(key, palette);
    }

    /// Returns the cached palette for `key`, computing it from `pixels` on a
    /// miss.
    pub fn get_or_compute(
        &mut self,
        key: &ImageKey,
        pixels: &PixelBuffer,
        config: &ColorConfig,
    ) -> Result<Palette> {
        if let Some(palette) = self.schemes.get(key) {
            return Ok(*palette);
        }
        let palette = palette_from_pixels(pixels, config)?;
        self.schemes.insert(key.clone(), palette);
        Ok(palette)
    }

    pub fn invalidate(&mut self, key: &ImageKey) -> Option<Palette> {
        self.schemes.remove(key)
    }

    /// Records which image is on screen. Switching to a different image drops
    /// the previous image's entry.
    pub fn set_active(&mut self, key: ImageKey) {
        if let Some(previous) = self.active.take() {
            if previous != key {
                self.schemes.remove(&previous);
            }
        }
        self.active = Some(key);
    }

    pub fn active(&self) -> Option<&ImageKey> {
        self.active.as_ref()
    }

    pub fn clear(&mut self) {
        self.schemes.clear();
        self.active = None;
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

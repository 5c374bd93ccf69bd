//! Canvas/Texture hosts.
//!
//! The engine never owns pixel buffers. It asks a [`TextureHost`] for a blank
//! surface, draws on it, and hands it back under a key. Two hosts ship with
//! the crate: [`MemoryHost`] keeps RGBA images (and can write them out as
//! PNG), [`RecordingHost`] keeps the raw draw calls.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;

use crate::output::{save_png, OutputError};
use crate::surface::{PixelSurface, RecordingSurface, Surface};

/// The rendering surface and texture table the engine draws into.
pub trait TextureHost {
    type Surface: Surface;

    /// False once the host's rendering context is gone.
    fn is_available(&self) -> bool {
        true
    }

    fn texture_exists(&self, key: &str) -> bool;

    /// A blank, fully transparent surface.
    fn create_surface(&mut self, width: u32, height: u32) -> Self::Surface;

    /// Store a finished surface under `key`, replacing any previous texture.
    fn register_texture(&mut self, key: &str, surface: Self::Surface);

    /// Drop a texture, returning whether it existed.
    fn remove_texture(&mut self, key: &str) -> bool;

    /// Every registered key, sorted.
    fn texture_keys(&self) -> Vec<String>;
}

/// In-memory host holding RGBA images.
#[derive(Debug, Default)]
pub struct MemoryHost {
    textures: HashMap<String, RgbaImage>,
    closed: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(&self, key: &str) -> Option<&RgbaImage> {
        self.textures.get(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Tear down the rendering context; the host stops accepting work.
    pub fn close(&mut self) {
        self.closed = true;
        self.textures.clear();
    }

    /// Write one texture to a PNG file, scaled by an integer factor.
    ///
    /// Returns `Ok(false)` when no texture is registered under `key`.
    pub fn export_png(&self, key: &str, path: &Path, scale: u8) -> Result<bool, OutputError> {
        match self.textures.get(key) {
            Some(image) => {
                let scaled = crate::output::scale_image(image.clone(), scale);
                save_png(&scaled, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl TextureHost for MemoryHost {
    type Surface = PixelSurface;

    fn is_available(&self) -> bool {
        !self.closed
    }

    fn texture_exists(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    fn create_surface(&mut self, width: u32, height: u32) -> PixelSurface {
        PixelSurface::new(width, height)
    }

    fn register_texture(&mut self, key: &str, surface: PixelSurface) {
        self.textures.insert(key.to_string(), surface.into_image());
    }

    fn remove_texture(&mut self, key: &str) -> bool {
        self.textures.remove(key).is_some()
    }

    fn texture_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.textures.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Host that stores draw-call recordings instead of pixels.
#[derive(Debug, Default)]
pub struct RecordingHost {
    recordings: HashMap<String, RecordingSurface>,
    closed: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording(&self, key: &str) -> Option<&RecordingSurface> {
        self.recordings.get(key)
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.recordings.clear();
    }
}

impl TextureHost for RecordingHost {
    type Surface = RecordingSurface;

    fn is_available(&self) -> bool {
        !self.closed
    }

    fn texture_exists(&self, key: &str) -> bool {
        self.recordings.contains_key(key)
    }

    fn create_surface(&mut self, width: u32, height: u32) -> RecordingSurface {
        RecordingSurface::new(width, height)
    }

    fn register_texture(&mut self, key: &str, surface: RecordingSurface) {
        self.recordings.insert(key.to_string(), surface);
    }

    fn remove_texture(&mut self, key: &str) -> bool {
        self.recordings.remove(key).is_some()
    }

    fn texture_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.recordings.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Paint;

    #[test]
    fn test_memory_host_register_and_lookup() {
        let mut host = MemoryHost::new();
        let mut surface = host.create_surface(3, 2);
        surface.fill_rect(0.0, 0.0, 3.0, 2.0, Paint::solid(0x112233));
        host.register_texture("tile_grass", surface);

        assert!(host.texture_exists("tile_grass"));
        assert_eq!(host.texture("tile_grass").map(|i| i.dimensions()), Some((3, 2)));
        assert_eq!(host.texture_keys(), vec!["tile_grass".to_string()]);
    }

    #[test]
    fn test_memory_host_close() {
        let mut host = MemoryHost::new();
        let surface = host.create_surface(1, 1);
        host.register_texture("a_b", surface);
        host.close();

        assert!(!host.is_available());
        assert!(host.is_empty());
    }

    #[test]
    fn test_memory_host_remove() {
        let mut host = MemoryHost::new();
        let surface = host.create_surface(1, 1);
        host.register_texture("a_b", surface);
        assert!(host.remove_texture("a_b"));
        assert!(!host.remove_texture("a_b"));
    }

    #[test]
    fn test_export_png_missing_key() {
        let host = MemoryHost::new();
        let path = std::env::temp_dir().join("mockart_missing_export.png");
        assert!(!host.export_png("nope", &path, 1).unwrap());
    }

    #[test]
    fn test_recording_host_keeps_calls() {
        let mut host = RecordingHost::new();
        let mut surface = host.create_surface(4, 4);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Paint::solid(0));
        host.register_texture("ui_panel", surface);

        assert_eq!(host.recording("ui_panel").map(|r| r.calls().len()), Some(1));
    }
}

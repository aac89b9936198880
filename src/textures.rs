//! Decoded images for image-shaped bursts.
//!
//! Image fireworks reconstruct a picture's silhouette as an expanding cloud
//! of particles. Decoding happens here, outside the simulation tick: load the
//! images up front through an [`ImageLibrary`] and attach the resulting
//! `Arc<BurstImage>` to the launch. The burst generator only reads pixels.
//!
//! # Supported Formats
//!
//! - PNG (recommended, needs an alpha channel for useful silhouettes)
//! - JPEG

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec4;

use crate::error::{FireworkError, Result};

/// RGBA8 raster ready for burst sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstImage {
    /// Raw RGBA pixel data (width * height * 4 bytes), rows top to bottom.
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl BurstImage {
    /// Create an image from raw RGBA data.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // 2x1: opaque red, fully transparent
    /// let img = BurstImage::from_rgba(vec![255, 0, 0, 255, 0, 0, 0, 0], 2, 1)?;
    /// ```
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FireworkError::EmptyImage);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FireworkError::InvalidArgument(format!(
                "RGBA data size mismatch: expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Decode an image file into RGBA.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| FireworkError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)` as normalized RGBA. `(0, 0)` is the top-left corner.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[i..i + 4];
        Some(Vec4::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        ))
    }

    /// Iterate `(x, y, rgba)` over every pixel, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Vec4)> + '_ {
        let width = self.width;
        self.data.chunks_exact(4).enumerate().map(move |(i, px)| {
            let x = i as u32 % width;
            let y = i as u32 / width;
            let rgba = Vec4::new(
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
                px[3] as f32 / 255.0,
            );
            (x, y, rgba)
        })
    }

    /// Number of pixels with alpha at or above `threshold`.
    pub fn opaque_count(&self, threshold: f32) -> usize {
        self.pixels().filter(|(_, _, c)| c.w >= threshold).count()
    }
}

/// Cache of decoded burst images keyed by source path.
///
/// # Example
///
/// ```ignore
/// let mut images = ImageLibrary::new();
/// let logo = images.load("assets/firework_images/word.png")?;
/// sim.launch(LaunchParams::new(pad, ShapeKind::Image).with_image(logo))?;
/// ```
#[derive(Debug, Default, Clone)]
pub struct ImageLibrary {
    images: HashMap<PathBuf, Arc<BurstImage>>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path`, or return the cached image if it was loaded before.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<BurstImage>> {
        let path = path.as_ref();
        if let Some(image) = self.images.get(path) {
            return Ok(Arc::clone(image));
        }

        let image = Arc::new(BurstImage::from_file(path)?);
        log::info!(
            "Loaded burst image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.images.insert(path.to_path_buf(), Arc::clone(&image));
        Ok(image)
    }

    /// Register an already decoded image under `key`.
    pub fn insert<P: Into<PathBuf>>(&mut self, key: P, image: BurstImage) -> Arc<BurstImage> {
        let image = Arc::new(image);
        self.images.insert(key.into(), Arc::clone(&image));
        image
    }

    pub fn get<P: AsRef<Path>>(&self, key: P) -> Option<Arc<BurstImage>> {
        self.images.get(key.as_ref()).cloned()
    }

    /// All cached images, in no particular order.
    pub fn images(&self) -> impl Iterator<Item = &Arc<BurstImage>> {
        self.images.values()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> BurstImage {
        // 2x2: opaque white, transparent, transparent, opaque red
        BurstImage::from_rgba(
            vec![
                255, 255, 255, 255, //
                0, 0, 0, 0, //
                0, 0, 0, 0, //
                255, 0, 0, 255,
            ],
            2,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_from_rgba_size_mismatch() {
        let err = BurstImage::from_rgba(vec![0; 3], 1, 1).unwrap_err();
        assert!(matches!(err, FireworkError::InvalidArgument(_)));
        let err = BurstImage::from_rgba(Vec::new(), 0, 4).unwrap_err();
        assert!(matches!(err, FireworkError::EmptyImage));
    }

    #[test]
    fn test_pixel_lookup() {
        let img = checker();
        assert_eq!(img.pixel(0, 0), Some(Vec4::ONE));
        assert_eq!(img.pixel(1, 1), Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.opaque_count(0.1), 2);
    }

    #[test]
    fn test_pixels_iterates_row_major() {
        let coords: Vec<(u32, u32)> = checker().pixels().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_missing_file() {
        let mut lib = ImageLibrary::new();
        let err = lib.load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, FireworkError::ImageLoad { .. }));
        assert!(lib.is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let mut lib = ImageLibrary::new();
        let img = lib.insert("checker", checker());
        assert_eq!(lib.len(), 1);
        assert!(Arc::ptr_eq(&img, &lib.get("checker").unwrap()));
    }
}

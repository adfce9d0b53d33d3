//! Shared pixel store filled by the parallel renderer.
//!
//! Each cell can be written exactly once. Workers write disjoint
//! chunks concurrently through `&Image`; the scheduler reads the
//! finished grid back after every worker has joined.

use crate::Color;
use std::sync::OnceLock;
use thiserror::Error;

/// Contract violations when writing into an [`Image`].
///
/// Either one means the chunk partition handed to the workers is wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("pixel ({x}, {y}) is outside of the {width}x{height} image")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("pixel ({x}, {y}) was written twice")]
    AlreadyWritten { x: u32, y: u32 },
}

/// A bounded `width x height` grid of finished pixel colors.
#[derive(Debug)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<OnceLock<Color>>,
}

impl Image {
    /// Create an image with every pixel unwritten.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Store the color for pixel (x, y).
    pub fn set(&self, x: u32, y: u32, color: Color) -> Result<(), ImageError> {
        let index = self.index(x, y).ok_or(ImageError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.pixels[index]
            .set(color)
            .map_err(|_| ImageError::AlreadyWritten { x, y })
    }

    /// Get the pixel at (x, y), or `None` if it was never written or lies
    /// outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).and_then(|i| self.pixels[i].get().copied())
    }

    /// Number of pixels written so far.
    pub fn written(&self) -> usize {
        self.pixels.iter().filter(|p| p.get().is_some()).count()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

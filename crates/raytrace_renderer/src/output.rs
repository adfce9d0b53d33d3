//! Destinations for finished pixels.
//!
//! Both render modes push quantized pixels in raster order into a
//! [`PixelSink`]: the ASCII `P3` stream, or a PNG file via `image`.

use std::io::{self, Write};
use std::path::PathBuf;

use image::{Rgb, RgbImage};

/// Receives an image one pixel at a time, in raster order.
pub trait PixelSink {
    /// Called once before the first pixel.
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()>;

    /// Write the next pixel.
    fn write_pixel(&mut self, rgb: [u8; 3]) -> io::Result<()>;

    /// Called once after the last pixel.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Plain text PPM (`P3`) writer: a three line header, then one
/// `r g b` line per pixel.
pub struct PpmWriter<W: Write> {
    writer: W,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PixelSink for PpmWriter<W> {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        writeln!(self.writer, "P3")?;
        writeln!(self.writer, "{} {}", width, height)?;
        writeln!(self.writer, "255")
    }

    fn write_pixel(&mut self, rgb: [u8; 3]) -> io::Result<()> {
        writeln!(self.writer, "{} {} {}", rgb[0], rgb[1], rgb[2])
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Collects pixels into an RGB buffer and saves it as PNG on finish.
pub struct PngWriter {
    path: PathBuf,
    buffer: RgbImage,
    next: u32,
}

impl PngWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer: RgbImage::new(0, 0),
            next: 0,
        }
    }
}

impl PixelSink for PngWriter {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        self.buffer = RgbImage::new(width, height);
        self.next = 0;
        Ok(())
    }

    fn write_pixel(&mut self, rgb: [u8; 3]) -> io::Result<()> {
        let width = self.buffer.width().max(1);
        let (x, y) = (self.next % width, self.next / width);
        if y >= self.buffer.height() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("pixel {} written past the end of the image", self.next),
            ));
        }
        self.buffer.put_pixel(x, y, Rgb(rgb));
        self.next += 1;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        log::info!("Saving PNG to {}", self.path.display());
        self.buffer
            .save(&self.path)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

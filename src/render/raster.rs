//! Decoded raster images
//!
//! [`RasterImage`] is the renderer's output: an in-memory RGBA8 bitmap ready
//! for display. PNG bytes from the layout engine are decoded with the `png`
//! crate and normalized to 8-bit RGBA whatever color type Graphviz picked.

use super::errors::RenderError;

/// RGBA8 bitmap, row-major, no row padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap raw RGBA8 pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::Decode {
                message: format!(
                    "{}x{} image needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    pixels.len()
                ),
            });
        }
        Ok(RasterImage {
            width,
            height,
            pixels,
        })
    }

    /// Decode a PNG into RGBA8
    pub fn decode_png(bytes: &[u8]) -> Result<Self, RenderError> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        let pixels = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            png::ColorType::Indexed => {
                return Err(RenderError::Decode {
                    message: "palette image was not expanded".to_string(),
                })
            }
        };

        Self::from_rgba(info.width, info.height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get one pixel as `[r, g, b, a]`
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Get one pixel composited over an opaque background
    pub fn pixel_over(&self, x: u32, y: u32, background: [u8; 3]) -> [u8; 3] {
        let [r, g, b, a] = self.pixel(x, y);
        let blend = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * a as u32 + bg as u32 * (255 - a as u32)) / 255) as u8
        };
        [
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ]
    }

    /// Downscale to fit within `max_width` x `max_height`, keeping the aspect
    /// ratio. Images that already fit are returned unchanged.
    pub fn fit_within(&self, max_width: u32, max_height: u32) -> RasterImage {
        if self.width == 0 || self.height == 0 || max_width == 0 || max_height == 0 {
            return RasterImage {
                width: 0,
                height: 0,
                pixels: Vec::new(),
            };
        }
        let scale = (self.width as f64 / max_width as f64).max(self.height as f64 / max_height as f64);
        if scale <= 1.0 {
            return self.clone();
        }

        let width = ((self.width as f64 / scale) as u32).clamp(1, max_width);
        let height = ((self.height as f64 / scale) as u32).clamp(1, max_height);
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);

        for oy in 0..height {
            let (y0, y1) = source_span(oy, scale, self.height);
            for ox in 0..width {
                let (x0, x1) = source_span(ox, scale, self.width);
                // Box filter over the source block
                let mut sum = [0u32; 4];
                for y in y0..y1 {
                    for x in x0..x1 {
                        let p = self.pixel(x, y);
                        for (acc, channel) in sum.iter_mut().zip(p) {
                            *acc += channel as u32;
                        }
                    }
                }
                let count = (x1 - x0) * (y1 - y0);
                pixels.extend(sum.iter().map(|acc| (acc / count) as u8));
            }
        }

        RasterImage {
            width,
            height,
            pixels,
        }
    }
}

/// Source pixel range covered by output pixel `index`
fn source_span(index: u32, scale: f64, limit: u32) -> (u32, u32) {
    let start = ((index as f64 * scale) as u32).min(limit - 1);
    let end = (((index + 1) as f64 * scale) as u32).clamp(start + 1, limit);
    (start, end)
}

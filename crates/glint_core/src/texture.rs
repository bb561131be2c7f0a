//! Textures sampled by surfaces.
//!
//! A texture maps a hit's (u, v) coordinates and world-space point to a
//! color. Image textures are decoded once and shared between surfaces.

use std::path::Path;
use std::sync::Arc;

use glint_math::{Color, Vec3};

use crate::error::{SceneError, SceneResult};
use crate::perlin::Perlin;

/// Color source for a surface.
#[derive(Clone, Debug)]
pub enum Texture {
    /// One color everywhere.
    Solid(Color),
    /// Decoded image, sampled bilinearly at (u, v).
    Image(Arc<ImageTexture>),
    /// Perlin noise modulating a base color, sampled at the hit point.
    Noise(NoiseTexture),
}

impl Texture {
    /// Sample the texture for a hit at texture coordinates (u, v) and point `p`.
    pub fn sample(&self, u: f64, v: f64, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Image(image) => image.sample(u, v),
            Texture::Noise(noise) => noise.sample(p),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

impl From<Arc<ImageTexture>> for Texture {
    fn from(image: Arc<ImageTexture>) -> Self {
        Texture::Image(image)
    }
}

impl From<ImageTexture> for Texture {
    fn from(image: ImageTexture) -> Self {
        Texture::Image(Arc::new(image))
    }
}

impl From<NoiseTexture> for Texture {
    fn from(noise: NoiseTexture) -> Self {
        Texture::Noise(noise)
    }
}

/// A decoded image with pixel data.
///
/// Pixels are stored as RGB in the 0-1 range, row-major, top row first.
/// Values are kept as encoded in the file; no color space conversion is
/// applied, matching the renderer's default of writing without gamma.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    width: u32,

    /// Texture height in pixels
    height: u32,

    pixels: Vec<Color>,

    /// Original file path (for debugging)
    path: String,
}

impl ImageTexture {
    /// Create a texture from pixel data. The pixel count must match the size.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Color>,
        path: impl Into<String>,
    ) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidTexture(format!(
                "texture size must be non-zero, got {width}x{height}"
            )));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(SceneError::InvalidTexture(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width as usize * height as usize,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
            path: path.into(),
        })
    }

    /// Decode an image file (any format the `image` crate supports).
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();

        let pixels = img
            .pixels()
            .map(|p| {
                Color::new(
                    p[0] as f64 / 255.0,
                    p[1] as f64 / 255.0,
                    p[2] as f64 / 255.0,
                )
            })
            .collect();

        let texture = Self::new(width, height, pixels, path.display().to_string())?;

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            texture.path,
            texture.width,
            texture.height,
            texture.size_bytes() as f64 / 1024.0
        );

        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// UV coordinates wrap into [0, 1), with (0, 0) at bottom-left.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        // Flip V for image coordinates
        let x = u * (self.width as f64 - 1.0);
        let y = (1.0 - v) * (self.height as f64 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);

        top.lerp(bottom, fy)
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Color {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied().unwrap_or(Color::ZERO)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Color>()
    }
}

/// Perlin noise scaled color.
#[derive(Clone, Debug)]
pub struct NoiseTexture {
    perlin: Arc<Perlin>,
    color: Color,
}

impl NoiseTexture {
    pub fn new(perlin: Arc<Perlin>, color: Color) -> Self {
        Self { perlin, color }
    }

    pub fn sample(&self, p: Vec3) -> Color {
        self.color * self.perlin.noise(p)
    }
}

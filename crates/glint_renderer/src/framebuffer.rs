//! Output image storage and PPM serialization.
//!
//! Workers write into a `SharedFramebuffer` of packed atomics; once the
//! pool has finished it is converted into a plain `Framebuffer`.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::{Pod, Zeroable};
use glint_math::{Color, Vec3Ext};

use crate::error::{RenderError, RenderResult};

/// One 8-bit RGB pixel.
#[repr(transparent)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);

    /// Convert a color to bytes: `floor(256 * clamp(c, 0, 0.999))` per channel,
    /// optionally after gamma 2.
    pub fn from_color(color: Color, gamma_correct: bool) -> Self {
        let color = if gamma_correct {
            Color::new(
                linear_to_gamma(color.x),
                linear_to_gamma(color.y),
                linear_to_gamma(color.z),
            )
        } else {
            color
        };

        // NaN survives the clamp and casts to 0
        let scaled = color.clip(0.999) * 256.0;
        Rgb([scaled.x as u8, scaled.y as u8, scaled.z as u8])
    }

    /// Pack into the low 24 bits as 0xRRGGBB.
    pub fn to_packed(self) -> u32 {
        let [r, g, b] = self.0;
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Unpack from 0xRRGGBB; the high byte is ignored.
    pub fn from_packed(packed: u32) -> Self {
        Rgb([(packed >> 16) as u8, (packed >> 8) as u8, packed as u8])
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Allocate `len` elements up front, reporting failure instead of aborting.
fn try_alloc<T>(len: usize, width: u32, height: u32) -> RenderResult<Vec<T>> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| RenderError::FramebufferAlloc { width, height })?;
    Ok(pixels)
}

/// A finished image: row-major RGB, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    /// A black image.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let len = width as usize * height as usize;
        let mut pixels = try_alloc(len, width, height)?;
        pixels.resize(len, Rgb::BLACK);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Raw RGB bytes, three per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, rgb: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = rgb;
        }
    }

    /// Binary PPM (P6).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(self.as_bytes())?;
        out.flush()
    }

    /// ASCII PPM (P3), one image row per line.
    pub fn write_ppm_ascii<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            let line = row
                .iter()
                .map(|Rgb([r, g, b])| format!("{r} {g} {b}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    /// Write `<stem>.ppm` (binary) and `<stem>.txt.ppm` (ASCII).
    pub fn save(&self, stem: impl AsRef<Path>) -> RenderResult<(PathBuf, PathBuf)> {
        let stem = stem.as_ref();
        let binary = with_suffix(stem, ".ppm");
        let ascii = with_suffix(stem, ".txt.ppm");

        self.write_ppm(BufWriter::new(File::create(&binary)?))?;
        self.write_ppm_ascii(BufWriter::new(File::create(&ascii)?))?;

        log::info!("Saved {} and {}", binary.display(), ascii.display());
        Ok((binary, ascii))
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Packed value of a pixel nobody has written yet. Real pixels only use
/// the low 24 bits.
const UNWRITTEN: u32 = u32::MAX;

/// Lock-free framebuffer written concurrently by render workers.
///
/// Each pixel is a single atomic; a write is one swap, which also reveals
/// whether the pixel had been written before.
#[derive(Debug)]
pub struct SharedFramebuffer {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl SharedFramebuffer {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let len = width as usize * height as usize;
        let mut pixels = try_alloc(len, width, height)?;
        pixels.extend((0..len).map(|_| AtomicU32::new(UNWRITTEN)));
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Store a pixel by row-major index. Returns false if it was already written.
    pub fn write(&self, index: usize, rgb: Rgb) -> bool {
        self.pixels[index].swap(rgb.to_packed(), Ordering::Relaxed) == UNWRITTEN
    }

    /// Unwritten pixels become black; their count is returned alongside.
    pub fn into_framebuffer(self) -> RenderResult<(Framebuffer, usize)> {
        let mut framebuffer = Framebuffer::new(self.width, self.height)?;
        let mut unwritten = 0;
        for (dst, src) in framebuffer.pixels.iter_mut().zip(self.pixels) {
            match src.into_inner() {
                UNWRITTEN => unwritten += 1,
                packed => *dst = Rgb::from_packed(packed),
            }
        }
        Ok((framebuffer, unwritten))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_bytes() {
        assert_eq!(Rgb::from_color(Color::new(1.0, 0.5, 0.25), false), Rgb([255, 128, 64]));
        assert_eq!(Rgb::from_color(Color::ZERO, false), Rgb::BLACK);

        // Clamped on both ends
        assert_eq!(Rgb::from_color(Color::new(7.0, -3.0, 0.999), false), Rgb([255, 0, 255]));

        // NaN never panics
        assert_eq!(Rgb::from_color(Color::new(f64::NAN, 0.0, 0.0), false), Rgb::BLACK);
    }

    #[test]
    fn test_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
        assert_eq!(Rgb::from_color(Color::splat(0.25), true), Rgb([128, 128, 128]));
    }

    #[test]
    fn test_packed() {
        let rgb = Rgb([0x12, 0x34, 0x56]);
        assert_eq!(rgb.to_packed(), 0x123456);
        assert_eq!(Rgb::from_packed(0x123456), rgb);
        assert_ne!(Rgb([255, 255, 255]).to_packed(), UNWRITTEN);
    }

    #[test]
    fn test_framebuffer_get_set() {
        let mut fb = Framebuffer::new(4, 3).unwrap();
        fb.set(3, 2, Rgb([1, 2, 3]));
        assert_eq!(fb.get(3, 2), Some(Rgb([1, 2, 3])));
        assert_eq!(fb.get(0, 0), Some(Rgb::BLACK));
        assert_eq!(fb.get(4, 0), None);

        // Row-major, top-left origin
        assert_eq!(&fb.as_bytes()[fb.as_bytes().len() - 3..], &[1, 2, 3]);
    }

    #[test]
    fn test_ppm_binary() {
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.set(0, 0, Rgb([255, 0, 10]));

        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();
        assert_eq!(out, b"P6\n2 1\n255\n\xff\x00\x0a\x00\x00\x00".to_vec());
    }

    #[test]
    fn test_ppm_ascii() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.set(1, 0, Rgb([1, 2, 3]));

        let mut out = Vec::new();
        fb.write_ppm_ascii(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 2\n255\n0 0 0 1 2 3\n0 0 0 0 0 0\n");
    }

    #[test]
    fn test_save_writes_both_files() {
        let stem = std::env::temp_dir().join(format!("glint_fb_{}", std::process::id()));
        let fb = Framebuffer::new(3, 2).unwrap();
        let (binary, ascii) = fb.save(&stem).unwrap();

        assert!(binary.to_string_lossy().ends_with(".ppm"));
        assert!(ascii.to_string_lossy().ends_with(".txt.ppm"));
        assert_eq!(std::fs::read(&binary).unwrap().len(), "P6\n3 2\n255\n".len() + 18);
        assert!(std::fs::read_to_string(&ascii).unwrap().starts_with("P3\n3 2\n255\n"));

        std::fs::remove_file(binary).ok();
        std::fs::remove_file(ascii).ok();
    }

    #[test]
    fn test_shared_first_write_detection() {
        let shared = SharedFramebuffer::new(2, 2).unwrap();
        assert!(shared.write(1, Rgb([9, 9, 9])));
        assert!(!shared.write(1, Rgb([8, 8, 8])));
        assert!(shared.write(3, Rgb::BLACK));

        let (fb, unwritten) = shared.into_framebuffer().unwrap();
        assert_eq!(unwritten, 2);
        assert_eq!(fb.get(1, 0), Some(Rgb([8, 8, 8])));
    }

    #[test]
    fn test_huge_framebuffer_fails_cleanly() {
        assert!(matches!(
            Framebuffer::new(u32::MAX, u32::MAX),
            Err(RenderError::FramebufferAlloc { .. })
        ));
    }
}

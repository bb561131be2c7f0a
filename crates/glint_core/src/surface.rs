//! Surface description carried by every primitive.
//!
//! A surface is one of a closed set of kinds. The scattering rules for each
//! kind live in the renderer; this module only validates and stores the
//! parameters.

use std::fmt;
use std::str::FromStr;

use glint_math::{Color, Vec3};

use crate::error::{SceneError, SceneResult};
use crate::texture::Texture;

/// How light interacts with a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Mirror reflection, optionally fuzzed.
    Specular,
    /// Lambertian reflection.
    Diffuse,
    /// Refractive (glass, water).
    Dielectric,
    /// Light source.
    Emissive,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Specular,
        SurfaceKind::Diffuse,
        SurfaceKind::Dielectric,
        SurfaceKind::Emissive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceKind::Specular => "specular",
            SurfaceKind::Diffuse => "diffuse",
            SurfaceKind::Dielectric => "dielectric",
            SurfaceKind::Emissive => "emissive",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceKind {
    type Err = SceneError;

    /// Parse a surface tag. Unknown tags are rejected, never defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SurfaceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SceneError::InvalidSurfaceKind(s.to_string()))
    }
}

impl TryFrom<u8> for SurfaceKind {
    type Error = SceneError;

    /// Numeric tags in declaration order: 0 = specular ... 3 = emissive.
    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        SurfaceKind::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| SceneError::InvalidSurfaceKind(tag.to_string()))
    }
}

/// Surface parameters of a primitive. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Surface {
    kind: SurfaceKind,
    /// Only meaningful for dielectrics.
    refractive_index: f64,
    /// Only meaningful for specular surfaces. 0 = perfect mirror.
    fuzz: f64,
    /// Base color (diffuse reflectance or emitted radiance).
    texture: Texture,
}

impl Surface {
    /// Create a surface, validating the parameters that matter for `kind`.
    pub fn new(
        kind: SurfaceKind,
        texture: Texture,
        refractive_index: f64,
        fuzz: f64,
    ) -> SceneResult<Self> {
        if kind == SurfaceKind::Dielectric && !(refractive_index.is_finite() && refractive_index > 0.0) {
            return Err(SceneError::InvalidSurface(format!(
                "refractive index must be positive, got {refractive_index}"
            )));
        }
        if kind == SurfaceKind::Specular && !(0.0..=1.0).contains(&fuzz) {
            return Err(SceneError::InvalidSurface(format!(
                "fuzz must be within [0, 1], got {fuzz}"
            )));
        }

        Ok(Self {
            kind,
            refractive_index,
            fuzz,
            texture,
        })
    }

    /// Lambertian surface with the given reflectance.
    pub fn diffuse(texture: impl Into<Texture>) -> Self {
        Self {
            kind: SurfaceKind::Diffuse,
            refractive_index: 1.0,
            fuzz: 0.0,
            texture: texture.into(),
        }
    }

    /// Perfect mirror.
    pub fn mirror() -> Self {
        Self {
            kind: SurfaceKind::Specular,
            refractive_index: 1.0,
            fuzz: 0.0,
            texture: Texture::Solid(Color::ONE),
        }
    }

    /// Fuzzy mirror; `fuzz` must be within [0, 1].
    pub fn specular(fuzz: f64) -> SceneResult<Self> {
        Self::new(SurfaceKind::Specular, Texture::Solid(Color::ONE), 1.0, fuzz)
    }

    /// Refractive surface (1.5 = glass, 1.33 = water).
    pub fn dielectric(refractive_index: f64) -> SceneResult<Self> {
        Self::new(SurfaceKind::Dielectric, Texture::Solid(Color::ONE), refractive_index, 0.0)
    }

    /// Light source emitting `radiance`.
    pub fn emissive(radiance: impl Into<Texture>) -> Self {
        Self {
            kind: SurfaceKind::Emissive,
            refractive_index: 1.0,
            fuzz: 0.0,
            texture: radiance.into(),
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Surface color at a hit, from texture coordinates and the hit point.
    pub fn color_at(&self, u: f64, v: f64, p: Vec3) -> Color {
        self.texture.sample(u, v, p)
    }
}

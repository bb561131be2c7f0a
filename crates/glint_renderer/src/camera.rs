//! Camera for ray generation.
//!
//! The camera's origin is the center of the image plane. Rays start at a
//! pinhole `focal_length` behind the plane and pass through a jittered point
//! inside the pixel's cell. The plane is one world unit tall and as wide as
//! the image's aspect ratio.

use glint_core::{SceneError, SceneResult};
use glint_math::{gen_f64, Ray, Vec3, Vec3Ext, NEAR_ZERO};
use rand::RngCore;

/// Camera placement. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    front: Vec3,
    top: Vec3,
    right: Vec3,
    focal_length: f64,
    /// Lens diameter; 0 is a perfect pinhole.
    aperture: f64,
}

impl Camera {
    /// Build a camera looking along `front` with `top` as up.
    ///
    /// The basis is orthonormalized: `right = normalize(front x top)` and
    /// `top` is recomputed from `right` and `front`.
    pub fn new(origin: Vec3, front: Vec3, top: Vec3, focal_length: f64) -> SceneResult<Self> {
        if !(origin.is_finite() && front.is_finite() && top.is_finite()) {
            return Err(SceneError::InvalidCamera("non-finite placement".to_string()));
        }
        if !(focal_length.is_finite() && focal_length > 0.0) {
            return Err(SceneError::InvalidCamera(format!(
                "focal length must be positive, got {focal_length}"
            )));
        }

        let right = front.cross(top);
        if front.near_zero() || right.length_squared() < NEAR_ZERO {
            return Err(SceneError::InvalidCamera(format!(
                "front {front} and top {top} do not span a plane"
            )));
        }

        let front = front.normalize();
        let right = right.normalize();
        let top = right.cross(front);

        Ok(Self {
            origin,
            front,
            top,
            right,
            focal_length,
            aperture: 0.0,
        })
    }

    /// Set the lens diameter for depth of field.
    pub fn with_aperture(mut self, aperture: f64) -> Self {
        self.aperture = aperture.max(0.0);
        self
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn top(&self) -> Vec3 {
        self.top
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Lay the image plane out for a `width` x `height` pixel grid.
    pub fn viewport(&self, width: u32, height: u32) -> Viewport {
        let aspect = width as f64 / height as f64;

        // Rows run downward, so the height vector is -top
        let plane_u = self.right * aspect;
        let plane_v = -self.top;

        Viewport {
            top_left: self.origin - plane_u * 0.5 - plane_v * 0.5,
            pixel_delta_u: plane_u / width as f64,
            pixel_delta_v: plane_v / height as f64,
            pinhole: self.origin - self.front * self.focal_length,
            lens_u: self.right * (self.aperture * 0.5),
            lens_v: self.top * (self.aperture * 0.5),
        }
    }
}

/// Camera resolved against an image size; generates primary rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    top_left: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    pinhole: Vec3,
    lens_u: Vec3,
    lens_v: Vec3,
}

impl Viewport {
    /// A ray through a random point in pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let jx = gen_f64(rng);
        let jy = gen_f64(rng);
        let sample = self.top_left
            + (x as f64 + jx) * self.pixel_delta_u
            + (y as f64 + jy) * self.pixel_delta_v;

        let pinhole = if self.lens_u == Vec3::ZERO {
            self.pinhole
        } else {
            let p = Vec3::random_in_unit_disk(rng);
            self.pinhole + p.x * self.lens_u + p.y * self.lens_v
        };

        Ray::new(pinhole, sample - pinhole)
    }
}

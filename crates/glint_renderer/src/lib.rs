//! Glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a closed set of primitives (spheres,
//! triangles, quads, spherical volumes and mesh instances), accelerated by a
//! BVH and rendered by a fixed pool of worker threads.

mod bvh;
mod camera;
mod config;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod model;
mod primitive;
mod quad;
mod renderer;
mod scene;
mod sphere;
mod triangle;
mod volume;

pub use bvh::{Bvh, BvhNode};
pub use camera::{Camera, Viewport};
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use framebuffer::{linear_to_gamma, Framebuffer, Rgb, SharedFramebuffer};
pub use hittable::{HitRecord, Hittable, T_MIN};
pub use material::{scatter, Collision};
pub use model::Model;
pub use primitive::Primitive;
pub use quad::Quad;
pub use renderer::{render, render_pixel, trace_path, RenderOutput, RenderStats, Renderer};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use volume::SphereVolume;

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Color, Interval, ModelTransform, Ray, Vec3};

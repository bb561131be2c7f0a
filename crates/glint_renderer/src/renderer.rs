//! Core path tracing renderer.
//!
//! A fixed pool of workers claims pixels one at a time from a shared atomic
//! cursor in row-major order. Each claimed pixel is traced with its own
//! samples and written straight into the shared framebuffer, so no two
//! workers ever touch the same pixel and nothing is locked.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use glint_math::{Color, Ray, Vec3Ext};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::bvh::Bvh;
use crate::camera::Viewport;
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::framebuffer::{Framebuffer, Rgb, SharedFramebuffer};
use crate::material::Collision;
use crate::scene::Scene;

/// Counters gathered over one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Pixels written by a worker.
    pub pixels_written: usize,
    /// Writes to a pixel that had already been written (always 0 unless the
    /// claim protocol is broken).
    pub duplicate_writes: usize,
    /// Pixels never written, left black. Non-zero only after a stop request.
    pub unwritten: usize,
    /// True if the render was stopped before every pixel was claimed.
    pub stopped: bool,
    pub elapsed: Duration,
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub framebuffer: Framebuffer,
    pub stats: RenderStats,
}

/// Renders scenes with a fixed configuration.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    stop: Arc<AtomicBool>,
}

impl Renderer {
    /// Create a renderer; the configuration is validated up front.
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Flag that stops the workers before their next pixel claim when set.
    /// It is cleared when `render` returns, so the renderer can be reused.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Render `scene` with every configured worker.
    pub fn render(&self, scene: &Scene) -> RenderResult<RenderOutput> {
        let config = &self.config;
        config.validate()?;

        let shared = SharedFramebuffer::new(config.width, config.height)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("glint-worker-{i}"))
            .build()?;

        let bvh = Bvh::new(scene.primitives());
        let viewport = scene.camera().viewport(config.width, config.height);
        let base_seed = config.seed.unwrap_or_else(clock_seed);

        let total = shared.len();
        let cursor = AtomicUsize::new(0);
        let written = AtomicUsize::new(0);
        let duplicates = AtomicUsize::new(0);

        log::info!(
            "Rendering {}x{} ({} spp, {} bounces) on {} threads, {} primitives",
            config.width,
            config.height,
            config.samples_per_pixel,
            config.max_bounces,
            config.threads,
            scene.len()
        );
        let start = Instant::now();

        std::thread::scope(|s| {
            let (done_tx, done_rx) = mpsc::channel::<()>();
            let interval = Duration::from_millis(config.progress_interval_ms);
            let written = &written;

            // Progress reporter; exits as soon as the sender is dropped
            s.spawn(move || {
                while let Err(mpsc::RecvTimeoutError::Timeout) = done_rx.recv_timeout(interval) {
                    let done = written.load(Ordering::Relaxed);
                    log::info!(
                        "Progress: {}/{} pixels ({:.1}%)",
                        done,
                        total,
                        100.0 * done as f64 / total as f64
                    );
                }
            });

            pool.broadcast(|ctx| {
                let mut rng = StdRng::seed_from_u64(worker_seed(base_seed, ctx.index()));
                let mut claimed = 0usize;

                while !self.stop.load(Ordering::Relaxed) {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    if index >= total {
                        break;
                    }

                    let x = (index % config.width as usize) as u32;
                    let y = (index / config.width as usize) as u32;
                    let color = render_pixel(&viewport, &bvh, x, y, config, &mut rng);

                    if shared.write(index, Rgb::from_color(color, config.gamma_correct)) {
                        written.fetch_add(1, Ordering::Relaxed);
                    } else {
                        duplicates.fetch_add(1, Ordering::Relaxed);
                        log::error!("Pixel ({x}, {y}) written twice");
                    }
                    claimed += 1;
                }

                log::debug!("Worker {} finished after {} pixels", ctx.index(), claimed);
            });

            drop(done_tx);
        });

        let elapsed = start.elapsed();
        let (framebuffer, unwritten) = shared.into_framebuffer()?;
        let stats = RenderStats {
            pixels_written: written.into_inner(),
            duplicate_writes: duplicates.into_inner(),
            unwritten,
            stopped: self.stop.swap(false, Ordering::Relaxed),
            elapsed,
        };

        if stats.unwritten > 0 {
            log::warn!("Render stopped early: {} pixels left black", stats.unwritten);
        }
        log::info!(
            "Rendered {} pixels in {:.2}s",
            stats.pixels_written,
            elapsed.as_secs_f64()
        );

        Ok(RenderOutput { framebuffer, stats })
    }
}

/// Render `scene` once with `config`.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<RenderOutput> {
    Renderer::new(config.clone())?.render(scene)
}

/// Average of `samples_per_pixel` jittered paths through pixel (x, y).
pub fn render_pixel(
    viewport: &Viewport,
    bvh: &Bvh,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = viewport.get_ray(x, y, rng);
        pixel_color += trace_path(ray, bvh, config.max_bounces, rng);
    }

    pixel_color / config.samples_per_pixel as f64
}

/// Follow one path for at most `max_bounces` segments.
///
/// Only an absorbing surface contributes light. Misses, exhausted budgets,
/// paths whose carried color has gone black and invalid scattered rays all
/// give black.
pub fn trace_path(mut ray: Ray, bvh: &Bvh, max_bounces: u32, rng: &mut dyn RngCore) -> Color {
    for _ in 0..max_bounces {
        if !ray.is_valid() {
            return Color::ZERO;
        }

        match bvh.intersect(&ray, rng) {
            Collision::Missed => return Color::ZERO,
            Collision::Absorbed { attenuation, .. } => {
                ray.attenuate(attenuation);
                return ray.color;
            }
            Collision::Reflected {
                scattered,
                attenuation,
                ..
            } => {
                ray = scattered;
                ray.attenuate(attenuation);
                if ray.color.near_zero() {
                    return Color::ZERO;
                }
            }
        }
    }

    Color::ZERO
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Distinct, well-spread seed per worker.
fn worker_seed(base: u64, worker: usize) -> u64 {
    base ^ (worker as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

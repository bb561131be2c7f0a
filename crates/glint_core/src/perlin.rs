//! Gradient (Perlin) noise.

use glint_math::{Vec3, Vec3Ext};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Lattice gradient noise over 3D space.
///
/// Gradients are random unit vectors; the lattice cell of a point is hashed
/// through three independently shuffled permutation tables.
#[derive(Debug, Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
    frequency: f64,
}

impl Perlin {
    pub const POINT_COUNT: usize = 256;
    pub const DEFAULT_FREQUENCY: f64 = 0.2;

    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..Self::POINT_COUNT)
            .map(|_| Vec3::random_unit(rng))
            .collect();

        Self {
            gradients,
            perm_x: Self::permutation(rng),
            perm_y: Self::permutation(rng),
            perm_z: Self::permutation(rng),
            frequency: Self::DEFAULT_FREQUENCY,
        }
    }

    /// Scale applied to points before lookup. Higher values give finer noise.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Noise value at `p`, in [0, 1].
    pub fn noise(&self, p: Vec3) -> f64 {
        let p = p * self.frequency;
        let cell = p.floor();
        let f = p - cell;

        let i = cell.x as i64;
        let j = cell.y as i64;
        let k = cell.z as i64;

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let hash = self.perm_x[Self::wrap(i + di as i64)]
                        ^ self.perm_y[Self::wrap(j + dj as i64)]
                        ^ self.perm_z[Self::wrap(k + dk as i64)];
                    *corner = self.gradients[hash];
                }
            }
        }

        let value = Self::interpolate(&corners, f);
        (0.5 * (1.0 + value)).clamp(0.0, 1.0)
    }

    fn wrap(i: i64) -> usize {
        (i & (Self::POINT_COUNT as i64 - 1)) as usize
    }

    fn permutation(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..Self::POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Hermite-smoothed trilinear blend of the corner gradient contributions.
    fn interpolate(corners: &[[[Vec3; 2]; 2]; 2], f: Vec3) -> f64 {
        let smooth = f * f * (Vec3::splat(3.0) - 2.0 * f);

        let mut accum = 0.0;
        for (i, plane) in corners.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, gradient) in row.iter().enumerate() {
                    let (fi, fj, fk) = (i as f64, j as f64, k as f64);
                    let weight = Vec3::new(f.x - fi, f.y - fj, f.z - fk);
                    accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                        * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                        * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                        * gradient.dot(weight);
                }
            }
        }
        accum
    }
}

use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for the BVH.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Padding added to every side of a primitive's box so that flat shapes
    /// (quads, axis-aligned triangles) never produce zero-thickness boxes.
    pub const PADDING: f64 = 0.001;

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points (any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Tight box around a set of points. Empty input gives `Aabb::EMPTY`.
    pub fn enclosing<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut min = Vec3::splat(f64::INFINITY);
        let mut max = Vec3::splat(f64::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Grow every axis by `Aabb::PADDING` on both sides.
    pub fn padded(&self) -> Self {
        Self {
            x: self.x.pad(Self::PADDING),
            y: self.y.pad(Self::PADDING),
            z: self.z.pad(Self::PADDING),
        }
    }

    /// Axis-wise union of two boxes.
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&self.x, &other.x),
            y: Interval::surrounding(&self.y, &other.y),
            z: Interval::surrounding(&self.z, &other.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test. Returns the time at which the ray enters the box.
    ///
    /// The entry time is negative when the ray starts inside the box. Boxes
    /// entirely behind the origin never intersect. A zero direction component
    /// constrains nothing on that axis as long as the origin lies within the
    /// slab (this includes an origin lying exactly on one of its planes);
    /// otherwise the ray runs parallel outside the slab and misses.
    pub fn intersects(&self, r: &Ray) -> Option<f64> {
        let mut max_of_mins = f64::NEG_INFINITY;
        let mut min_of_maxs = f64::INFINITY;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            if slab.min > slab.max {
                return None;
            }
            let origin = r.origin[axis];
            let dir = r.direction[axis];

            if dir == 0.0 {
                if !slab.contains(origin) {
                    return None;
                }
                continue;
            }

            let t0 = (slab.min - origin) / dir;
            let t1 = (slab.max - origin) / dir;
            max_of_mins = max_of_mins.max(t0.min(t1));
            min_of_maxs = min_of_maxs.min(t0.max(t1));
        }

        if max_of_mins < min_of_maxs && min_of_maxs > 0.0 {
            Some(max_of_mins)
        } else {
            None
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties go to the earlier axis so builds are reproducible.
    pub fn largest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size && x_size >= z_size {
            0
        } else if y_size >= z_size {
            1
        } else {
            2
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// True if `p` lies inside or on the box.
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// The identity for `merge`: contains nothing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

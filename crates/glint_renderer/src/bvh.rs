//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat arena and refer to their children by index. Leaves
//! hold exactly one primitive. The tree borrows the scene's primitives and is
//! read-only once built, so workers share it without locking.

use glint_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::hittable::{forward, HitRecord, Hittable};
use crate::material::Collision;
use crate::primitive::Primitive;

/// BVH node - either a branch with two children or a leaf with one primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node; children are arena indices.
    Branch { left: usize, right: usize, bbox: Aabb },
    /// Index into the primitive slice.
    Leaf { primitive: usize, bbox: Aabb },
}

impl BvhNode {
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }
}

/// Median-split BVH over a borrowed slice of primitives.
#[derive(Debug)]
pub struct Bvh<'a> {
    primitives: &'a [Primitive],
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl<'a> Bvh<'a> {
    /// Build the hierarchy. An empty slice gives a BVH that never hits.
    pub fn new(primitives: &'a [Primitive]) -> Self {
        let mut bvh = Self {
            primitives,
            nodes: Vec::with_capacity(primitives.len().saturating_mul(2)),
            root: None,
        };

        if !primitives.is_empty() {
            let mut handles: Vec<usize> = (0..primitives.len()).collect();
            let root = bvh.build(&mut handles);
            bvh.root = Some(root);
        }

        log::debug!(
            "Built BVH: {} primitives, {} nodes, depth {}",
            primitives.len(),
            bvh.nodes.len(),
            bvh.depth()
        );

        bvh
    }

    /// Recursive construction over a range of primitive handles.
    ///
    /// Ranges longer than two are stably sorted by box minimum along the
    /// largest axis of their union, then split at the midpoint.
    fn build(&mut self, handles: &mut [usize]) -> usize {
        let bbox = handles
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| acc.merge(&self.primitives[i].bounding_box()));

        if let [primitive] = *handles {
            return self.push(BvhNode::Leaf { primitive, bbox });
        }

        if handles.len() > 2 {
            let axis = bbox.largest_axis();
            let primitives = self.primitives;
            handles.sort_by(|&a, &b| {
                let a_min = primitives[a].bounding_box().axis_interval(axis).min;
                let b_min = primitives[b].bounding_box().axis_interval(axis).min;
                a_min.total_cmp(&b_min)
            });
        }

        let mid = handles.len() / 2;
        let (left_handles, right_handles) = handles.split_at_mut(mid);
        let left = self.build(left_handles);
        let right = self.build(right_handles);

        self.push(BvhNode::Branch { left, right, bbox })
    }

    fn push(&mut self, node: BvhNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn primitives(&self) -> &'a [Primitive] {
        self.primitives
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Box around the whole scene.
    pub fn bounding_box(&self) -> Aabb {
        self.root.map_or(Aabb::EMPTY, |root| self.nodes[root].bbox())
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[BvhNode], node: usize) -> usize {
            match nodes[node] {
                BvhNode::Leaf { .. } => 1,
                BvhNode::Branch { left, right, .. } => {
                    1 + depth_of(nodes, left).max(depth_of(nodes, right))
                }
            }
        }
        self.root.map_or(0, |root| depth_of(&self.nodes, root))
    }

    /// Nearest hit along the ray: the primitive index and its hit record.
    ///
    /// The nearer child is visited first; a child whose box is entered
    /// after the best hit so far is skipped.
    pub fn nearest_hit(&self, ray: &Ray, rng: &mut dyn RngCore) -> Option<(usize, HitRecord)> {
        let root = self.root?;
        self.nodes[root].bbox().intersects(ray)?;

        let mut best = None;
        self.visit(root, ray, rng, &mut best);
        best
    }

    fn visit(
        &self,
        node: usize,
        ray: &Ray,
        rng: &mut dyn RngCore,
        best: &mut Option<(usize, HitRecord)>,
    ) {
        match self.nodes[node] {
            BvhNode::Leaf { primitive, .. } => {
                let limit = best.map_or(f64::INFINITY, |(_, rec)| rec.t);
                let ray_t = Interval::new(forward().min, limit);
                if let Some(rec) = self.primitives[primitive].hit(ray, ray_t, rng) {
                    *best = Some((primitive, rec));
                }
            }
            BvhNode::Branch { left, right, .. } => {
                let left_entry = self.nodes[left].bbox().intersects(ray);
                let right_entry = self.nodes[right].bbox().intersects(ray);

                let mut order = [(left, left_entry), (right, right_entry)];
                if let (Some(l), Some(r)) = (left_entry, right_entry) {
                    if r < l {
                        order.swap(0, 1);
                    }
                }

                for (child, entry) in order {
                    let Some(entry) = entry else { continue };
                    if best.is_some_and(|(_, rec)| entry > rec.t) {
                        continue;
                    }
                    self.visit(child, ray, rng, best);
                }
            }
        }
    }

    /// Trace one ray segment through the scene.
    pub fn intersect(&self, ray: &Ray, rng: &mut dyn RngCore) -> Collision {
        match self.nearest_hit(ray, rng) {
            Some((primitive, rec)) => self.primitives[primitive].scatter(ray, &rec, rng),
            None => Collision::Missed,
        }
    }
}

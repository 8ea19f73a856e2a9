use std::fmt::{Debug, Display, Formatter, Result};

use crate::ray::Ray;
use math::float::min_max;
use math::hcm::{Point3, Vec3};

/// Axis-aligned 3D bounding box.
/// - Build one from 2 `Point3`s, or start from `BBox::empty()` and `union()` points/boxes in;
/// - Query the `midpoint()`, `diag()`onal, surface `area()` or the `longest_axis()`;
/// - Check if it `encloses()` another box or `intersect()`s with a `Ray`.
///
/// The empty box is the identity of `union`: its min is +inf and max is -inf on every axis, so
/// any union with it returns the other operand and its intersection test always misses.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    min: Point3,
    max: Point3,
}

impl BBox {
    pub fn empty() -> BBox {
        BBox {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(-f32::INFINITY, -f32::INFINITY, -f32::INFINITY),
        }
    }

    pub fn new(p0: Point3, p1: Point3) -> BBox {
        let (xmin, xmax) = min_max(p0.x, p1.x);
        let (ymin, ymax) = min_max(p0.y, p1.y);
        let (zmin, zmax) = min_max(p0.z, p1.z);
        BBox {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }

    /// Grows the box to cover point `p`. A zero-extent box around a single point is valid.
    pub fn union(self, p: Point3) -> BBox {
        let mut result = self;
        for i in 0..3 {
            result.min[i] = self.min[i].min(p[i]);
            result.max[i] = self.max[i].max(p[i]);
        }
        result
    }

    pub fn midpoint(self) -> Point3 {
        (self.max - self.min) * 0.5 + self.min
    }

    pub fn diag(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the axis along which the box is widest.
    pub fn longest_axis(&self) -> usize {
        self.diag().max_dimension()
    }

    pub fn min(&self) -> Point3 {
        self.min
    }
    pub fn max(&self) -> Point3 {
        self.max
    }

    /// Computes the surface area of the bounding box. An empty box has zero area.
    pub fn area(&self) -> f32 {
        let Vec3 { x, y, z } = self.diag();
        if x.is_sign_positive() && y.is_sign_positive() && z.is_sign_positive() {
            (x * y + y * z + z * x) * 2.0
        } else {
            0.0
        }
    }

    /// Ray-box slab test against the ray's live extent `[0, t_max]`. Returns true if any part of
    /// the extent overlaps the box, which is exactly the condition under which the box may hold a
    /// hit closer than the best one found so far.
    pub fn intersect(&self, r: &Ray) -> bool {
        let (mut t_enter, mut t_exit) = (0.0f32, r.t_max);
        for axis in 0..3 {
            let inv_dir = 1.0 / r.dir[axis];
            let t0 = (self.min[axis] - r.origin[axis]) * inv_dir;
            let t1 = (self.max[axis] - r.origin[axis]) * inv_dir;
            let (t0, t1) = min_max(t0, t1);
            // Shrinks [t_enter, t_exit] by intersecting it with [t0, t1].
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_exit < t_enter {
                return false;
            }
        }
        true
    }

    pub fn encloses(&self, other: Self) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.min[axis] && self.max[axis] >= other.max[axis])
    }

    pub fn contains(&self, p: Point3) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && self.max[axis] >= p[axis])
    }
}

impl Display for BBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "box[{} -> {}]", self.min, self.max)
    }
}

pub fn union(b0: BBox, b1: BBox) -> BBox {
    b0.union(b1.min).union(b1.max)
}

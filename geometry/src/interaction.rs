use crate::ray::Ray;
use math::hcm::{Point3, Vec3};
use std::fmt::{Display, Formatter, Result};

/// Offset applied along the surface normal when spawning secondary rays, so that the new ray does
/// not re-intersect the surface it starts from.
const SPAWN_OFFSET: f32 = 1e-3;

/// Geometric information of a ray-surface intersection, or of a point sampled on a surface:
///  - `pos`: position of the point;
///  - `ray_t`: t-value of the intersecting ray (0 for sampled points);
///  - `uv`: shape-specific surface parameterization of the point;
///  - `normal`: unit surface normal;
///  - `wo`: unit direction towards the ray origin (zero for sampled points).
///
/// A failed intersection query is `None` at the query's return type, so an `Interaction` that
/// exists always carries meaningful fields.
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    pub pos: Point3,
    pub ray_t: f32,
    pub uv: (f32, f32),
    pub normal: Vec3,
    pub wo: Vec3,
}

impl Interaction {
    pub fn new(pos: Point3, ray_t: f32, uv: (f32, f32), normal: Vec3, wo: Vec3) -> Interaction {
        Interaction {
            pos,
            ray_t,
            uv,
            normal,
            wo,
        }
    }

    /// Builds an `Interaction` that doesn't come from a ray: a point sampled from a surface.
    pub fn rayless(pos: Point3, uv: (f32, f32), normal: Vec3) -> Interaction {
        Interaction {
            pos,
            ray_t: 0.0,
            uv,
            normal,
            wo: Vec3::ZERO,
        }
    }

    /// Spawns a ray from this point in direction `dir`, offset to the side of the surface that
    /// `dir` points into.
    pub fn spawn_ray(&self, dir: Vec3) -> Ray {
        let out_normal = dir.dot(self.normal).signum() * self.normal;
        Ray::new(self.pos + out_normal * SPAWN_OFFSET, dir)
    }
}

impl Display for Interaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let (u, v) = self.uv;
        write!(
            f,
            "pos = {}, t = {:.2}, uv = ({:.2}, {:.2}), normal = {}",
            self.pos, self.ray_t, u, v, self.normal
        )
    }
}

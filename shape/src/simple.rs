use geometry::bvh::BBox;
use geometry::ray::Ray;
use math::float::{self, Inside};
use math::hcm::{point3, vec3, Point3, Vec3};
use std::f32::consts::PI;

use crate::Shape;
use geometry::Interaction;

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32) -> Sphere {
        Sphere { center, radius }
    }
    pub fn from_raw(center: (f32, f32, f32), radius: f32) -> Sphere {
        let (x, y, z) = center;
        let has_nan = x.is_nan() || y.is_nan() || z.is_nan() || radius.is_nan();
        assert!(!has_nan);
        Self::new(Point3::new(x, y, z), radius)
    }
    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// A parallelogram defined by one corner and two edge vectors. Covers axis-aligned quads (the
/// usual walls and panel lights) as well as any slanted ones.
#[derive(Debug, Clone, Copy)]
pub struct ParallelQuad {
    pub origin: Point3,
    pub side_u: Vec3,
    pub side_v: Vec3,
}

impl ParallelQuad {
    pub fn new(origin: Point3, side_u: Vec3, side_v: Vec3) -> Self {
        assert!(!side_u.cross(side_v).is_zero());
        Self {
            origin,
            side_u,
            side_v,
        }
    }
    pub fn new_xy(x_range: (f32, f32), y_range: (f32, f32), z: f32) -> Self {
        let (x0, x1) = x_range;
        let (y0, y1) = y_range;
        Self::new(
            point3(x0, y0, z),
            vec3(x1 - x0, 0.0, 0.0),
            vec3(0.0, y1 - y0, 0.0),
        )
    }
    pub fn new_xz(x_range: (f32, f32), y: f32, z_range: (f32, f32)) -> Self {
        let (x0, x1) = x_range;
        let (z0, z1) = z_range;
        Self::new(
            point3(x0, y, z0),
            vec3(x1 - x0, 0.0, 0.0),
            vec3(0.0, 0.0, z1 - z0),
        )
    }
    pub fn new_yz(x: f32, y_range: (f32, f32), z_range: (f32, f32)) -> Self {
        let (y0, y1) = y_range;
        let (z0, z1) = z_range;
        Self::new(
            point3(x, y0, z0),
            vec3(0.0, 0.0, z1 - z0),
            vec3(0.0, y1 - y0, 0.0),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IsolatedTriangle {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
}

impl IsolatedTriangle {
    pub fn new(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self { p0, p1, p2 }
    }
}

// Implementation of the `Shape` trait for the shape implementations.
// ------------------------------------------------------------------------------------------------

impl Shape for Sphere {
    fn summary(&self) -> String {
        format!("Sphere{{ {}, radius = {} }}", self.center, self.radius)
    }
    fn bbox(&self) -> BBox {
        let half_diagonal = Vec3::new(1.0, 1.0, 1.0) * self.radius;
        BBox::new(self.center - half_diagonal, self.center + half_diagonal)
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        // r = o + td
        // sphere: (p-c)(p-c) = radius^2
        // (td + o - c)^2 = radius^2
        // t^2 d^2 + 2t d*(o-c) + (o-c)^2 - radius^2 = 0
        // Solved with the numerically careful quadratic from PBRT: q carries the sign of b so
        // the two roots are computed without catastrophic cancellation.
        let f = r.origin - self.center; // vector connecting the sphere center to ray origin.
        let a = r.dir.norm_squared();
        let b_prime = -f.dot(r.dir);
        let delta = self.radius * self.radius - (f + b_prime / a * r.dir).norm_squared();
        if delta < 0.0 {
            return None;
        }
        let c = f.norm_squared() - self.radius * self.radius;
        let q = b_prime + b_prime.signum() * (delta * a).sqrt();
        let (t_low, t_high) = float::min_max(c / q, q / a);
        // Keeps only the roots that are within [0, r.t_max).
        let ray_t = r.truncated_t(t_low).or_else(|| r.truncated_t(t_high))?;

        let normal = (r.position_at(ray_t) - self.center).hat();
        // Snaps the hit position onto the sphere, slightly outward, so that a secondary ray
        // spawned from it cannot start inside the surface.
        let pos = self.center + normal * self.radius * 1.00001;

        // Computes UV coordinate of the pos on the sphere.
        let theta = normal.y.acos();
        let phi = normal.z.atan2(normal.x) + PI;
        let uv = (phi / (2.0 * PI), theta / PI);

        Some(Interaction::new(pos, ray_t, uv, normal, -r.dir))
    }
    fn occludes(&self, r: &Ray) -> bool {
        let f = r.origin - self.center;
        let a = r.dir.norm_squared();
        let b_prime = -f.dot(r.dir);
        let delta = self.radius * self.radius - (f + b_prime / a * r.dir).norm_squared();
        if delta < 0.0 {
            return false;
        }
        let c = f.norm_squared() - self.radius * self.radius;
        let q = b_prime + b_prime.signum() * (delta * a).sqrt();
        r.truncated_t(c / q).or_else(|| r.truncated_t(q / a)).is_some()
    }

    fn area(&self) -> f32 {
        self.radius * self.radius * 4.0 * PI
    }

    fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        let (u, v) = rnd2;
        let theta = 2.0 * PI * u;
        let z = 2.0 * v - 1.0;
        let planar_radius = (1.0 - z * z).max(0.0).sqrt();
        let dir = Vec3::new(planar_radius * theta.cos(), planar_radius * theta.sin(), z);
        Interaction::rayless(self.center + self.radius * dir, rnd2, dir)
    }
}

impl Shape for ParallelQuad {
    fn summary(&self) -> String {
        format!(
            "Parallelogram({:.3} + u{:.3} + v{:.3})",
            self.origin, self.side_u, self.side_v
        )
    }
    fn bbox(&self) -> BBox {
        let bu = BBox::new(self.origin, self.origin + self.side_u);
        let bv = BBox::new(
            self.origin + self.side_v,
            self.origin + self.side_u + self.side_v,
        );
        geometry::bvh::union(bu, bv)
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        let normal = self.side_u.cross(self.side_v).facing(r.dir);
        // Let p be the point on the plane containing the quad, then
        // (p - origin) dot normal = 0
        // With p = r.o + r.d * t, (r.o + t * r.d - self.origin) dot normal = 0
        // (r.o - self.origin) dot normal + t * r.d dot normal = 0
        let t = (self.origin - r.origin).dot(normal) / r.dir.dot(normal);
        let t = r.truncated_t(t)?;
        let coarse_hit = r.position_at(t);
        // p - o = au + bv = d. With n = a x b,
        // d x b = u (a x b)  =>  u = (d x b) . n / |n|^2   (signed, so the mirrored
        // a x d = v (a x b)  =>  v = (a x d) . n / |n|^2    quadrants don't false-positive)
        let (a, b, d) = (self.side_u, self.side_v, coarse_hit - self.origin);
        let n = a.cross(b);
        let u = d.cross(b).dot(n) / n.norm_squared();
        let v = a.cross(d).dot(n) / n.norm_squared();
        (u.inside((0.0, 1.0)) && v.inside((0.0, 1.0))).then(|| {
            let accurate_hit = self.origin + u * a + v * b;
            Interaction::new(accurate_hit, t, (u, v), normal.hat(), -r.dir)
        })
    }
    fn occludes(&self, r: &Ray) -> bool {
        let normal = self.side_u.cross(self.side_v);
        let t = (self.origin - r.origin).dot(normal) / r.dir.dot(normal);
        let t = match r.truncated_t(t) {
            None => return false,
            Some(t) => t,
        };
        let coarse_hit = r.position_at(t);
        let (a, b, d) = (self.side_u, self.side_v, coarse_hit - self.origin);
        let n = a.cross(b);
        let u = d.cross(b).dot(n) / n.norm_squared();
        let v = a.cross(d).dot(n) / n.norm_squared();
        u.inside((0.0, 1.0)) && v.inside((0.0, 1.0))
    }

    fn area(&self) -> f32 {
        self.side_u.cross(self.side_v).norm()
    }

    fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        let (u, v) = rnd2;
        let position = self.origin + u * self.side_u + v * self.side_v;
        let normal = self.side_u.cross(self.side_v).hat();
        Interaction::rayless(position, rnd2, normal)
    }
}

impl Shape for IsolatedTriangle {
    fn summary(&self) -> String {
        format!("Triangle boxed by {}", self.bbox())
    }
    fn bbox(&self) -> BBox {
        BBox::new(self.p0, self.p1).union(self.p2)
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        intersect_triangle(self.p0, self.p1, self.p2, r)
    }
    fn occludes(&self, r: &Ray) -> bool {
        intersect_triangle_pred(self.p0, self.p1, self.p2, r)
    }

    fn area(&self) -> f32 {
        (self.p0 - self.p1).cross(self.p2 - self.p1).norm() * 0.5
    }

    fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        let (u, v) = uniform_triangle_barycentric(rnd2);
        let position = self.p0 + (self.p1 - self.p0) * u + (self.p2 - self.p0) * v;
        let normal = (self.p0 - self.p1).cross(self.p2 - self.p1).hat();
        Interaction::rayless(position, (u, v), normal)
    }
}

/// Folds a uniform [0, 1)^2 variable into barycentric coordinates distributed uniformly over a
/// triangle, by mirroring samples that land beyond the diagonal back inside.
pub(crate) fn uniform_triangle_barycentric((u, v): (f32, f32)) -> (f32, f32) {
    if u + v > 1.0 {
        (1.0 - v, 1.0 - u)
    } else {
        (u, v)
    }
}

#[rustfmt::skip]
/// Computes ray-triangle intersection.  The `uv` property of the resulting `Interaction` (if any)
/// is computed such that `p = p0 + u*(p1-p0) + v*(p2-p0)` where `p` is the point of intersection.
pub fn intersect_triangle(p0: Point3, p1: Point3, p2: Point3, r: &Ray) -> Option<Interaction> {
    let normal = (p0 - p1).cross(p2 - p1);
    if normal.is_zero() {
        // Degenerate triangle: still indexed, but no ray hits it.
        return None;
    }
    let normal = normal.hat();
    let normal = normal.dot(-r.dir).signum() * normal;
    // The equation for the plane of the triangle would be:
    // (p - p0).dot(normal) = 0. Plugging in the ray equation $p = o + td$, we have
    // (o + td - p0).dot(normal) = 0  =>  t*dot(d, normal) = dot(p0-o, normal)
    let t = normal.dot(p0 - r.origin) / normal.dot(r.dir);
    let t = r.truncated_t(t)?;
    let p = r.position_at(t);
    // Computes the barycentric coordinates of p with regard to the triangle.
    let b2 = (p - p0).cross(p - p1).dot(normal);
    let b0 = (p - p1).cross(p - p2).dot(normal);
    let b1 = (p - p2).cross(p - p0).dot(normal);
    if b0.is_nan() || b1.is_nan() || b2.is_nan() {
        return None;
    }
    let (b0, b1, b2) = match (b0 > 0.0, b1 > 0.0, b2 > 0.0) {
        (true, true, true) | (false, false, false) => {
            let total_area = b0 + b1 + b2;
            (b0 / total_area, b1 / total_area, b2 / total_area)
        }
        _ => return None,
    };
    let hit_pos = float::barycentric_lerp((p0, p1, p2), (b0, b1, b2));
    if hit_pos.has_nan() {
        return None;
    }
    // Now an intersection is truly found.
    // hit_pos = p0 * b0 +            p1 * b1 + p2 * b2
    //         = p0 * (1 - b1 - b2) + p1 * b1 + p2 * b2
    //         = p0 + (p1 - p0) * b1 + (p2 - p0) * b2
    Some(Interaction::new(hit_pos, t, (b1, b2), normal, -r.dir))
}

pub fn intersect_triangle_pred(p0: Point3, p1: Point3, p2: Point3, r: &Ray) -> bool {
    let normal = (p0 - p1).cross(p2 - p1);
    if normal.is_zero() {
        return false;
    }
    let normal = normal.hat();
    let t = normal.dot(p0 - r.origin) / normal.dot(r.dir);
    if let Some(t) = r.truncated_t(t) {
        let p = r.position_at(t);
        let b0 = (p - p0).cross(p - p1).dot(normal);
        let b1 = (p - p1).cross(p - p2).dot(normal);
        let b2 = (p - p2).cross(p - p0).dot(normal);
        if b0.is_nan() || b1.is_nan() || b2.is_nan() {
            return false;
        }
        matches!(
            (b0 > 0.0, b1 > 0.0, b2 > 0.0),
            (true, true, true) | (false, false, false)
        )
    } else {
        false
    }
}

use crate::simple::{intersect_triangle, intersect_triangle_pred, uniform_triangle_barycentric};
use crate::Shape;
use accel::Bvh;
use geometry::bvh::BBox;
use geometry::ray::Ray;
use geometry::Interaction;
use math::float::barycentric_lerp;
use math::hcm::{Point3, Vec3};

#[derive(Debug)]
struct Triangle {
    indices: (usize, usize, usize),
    bbox: BBox,
}

/// An indexed triangle mesh organized under its own bounding-volume hierarchy, so that a mesh of
/// many triangles costs one arena slot in the scene but still answers intersection queries in
/// logarithmic time.
pub struct TriangleMesh {
    positions: Vec<Point3>,
    normals: Vec<Vec3>,
    uvs: Vec<(f32, f32)>,
    triangles: Vec<Triangle>,

    // Members that are filled in during the building step.
    bvh: Bvh,
    /// Prefix sums of triangle areas; drives the uniform-by-area surface sampling.
    cumulative_areas: Vec<f32>,
}

impl TriangleMesh {
    /// Builds a mesh from structure-of-arrays data. `normals` and `uvs` may be empty, in which
    /// case face normals and barycentric uv's are used.
    pub fn from_soa(
        positions: Vec<Point3>,
        normals: Vec<Vec3>,
        uvs: Vec<(f32, f32)>,
        indices: Vec<(usize, usize, usize)>,
    ) -> Self {
        assert!(normals.is_empty() || normals.len() == positions.len());
        assert!(uvs.is_empty() || uvs.len() == positions.len());
        let triangles = indices
            .into_iter()
            .map(|(i, j, k)| Triangle {
                indices: (i, j, k),
                bbox: BBox::new(positions[i], positions[j]).union(positions[k]),
            })
            .collect::<Vec<_>>();

        let bvh = Bvh::build(triangles.len(), |i| triangles[i].bbox);

        let mut running_sum = 0.0;
        let cumulative_areas = triangles
            .iter()
            .map(|t| {
                let (i, j, k) = t.indices;
                running_sum +=
                    (positions[i] - positions[j]).cross(positions[k] - positions[j]).norm() * 0.5;
                running_sum
            })
            .collect();

        Self {
            positions,
            normals,
            uvs,
            triangles,
            bvh,
            cumulative_areas,
        }
    }

    /// Builds the 12-triangle surface of an axis-aligned box spanning `p0` to `p1`.
    pub fn cuboid(p0: Point3, p1: Point3) -> Self {
        let (lo, hi) = (
            Point3::new(p0.x.min(p1.x), p0.y.min(p1.y), p0.z.min(p1.z)),
            Point3::new(p0.x.max(p1.x), p0.y.max(p1.y), p0.z.max(p1.z)),
        );
        // Corner i has bit 0 -> x, bit 1 -> y, bit 2 -> z taken from `hi`.
        let corners = (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .collect::<Vec<_>>();
        #[rustfmt::skip]
        let quads: [(usize, usize, usize, usize); 6] = [
            (0, 2, 3, 1), // z = lo
            (4, 5, 7, 6), // z = hi
            (0, 1, 5, 4), // y = lo
            (2, 6, 7, 3), // y = hi
            (0, 4, 6, 2), // x = lo
            (1, 3, 7, 5), // x = hi
        ];
        let mut indices = Vec::with_capacity(12);
        for (a, b, c, d) in quads.iter() {
            indices.push((*a, *b, *c));
            indices.push((*a, *c, *d));
        }
        Self::from_soa(corners, vec![], vec![], indices)
    }

    fn intersect_triangle(&self, tri: &Triangle, r: &Ray) -> Option<Interaction> {
        let (i, j, k) = tri.indices;
        let (p0, p1, p2) = (self.positions[i], self.positions[j], self.positions[k]);
        let hit = intersect_triangle(p0, p1, p2, r)?;

        if self.normals.is_empty() && self.uvs.is_empty() {
            return Some(hit);
        }
        let (b1, b2) = hit.uv;
        let b0 = 1.0 - b1 - b2;
        // Interpolates the normal vector using the barycentric coordinates.
        let normal = if self.normals.is_empty() {
            hit.normal
        } else {
            let (n0, n1, n2) = (self.normals[i], self.normals[j], self.normals[k]);
            barycentric_lerp((n0, n1, n2), (b0, b1, b2))
                .try_hat()
                .unwrap_or(hit.normal)
                .facing(r.dir)
        };
        let uv = if self.uvs.is_empty() {
            hit.uv
        } else {
            (
                barycentric_lerp((self.uvs[i].0, self.uvs[j].0, self.uvs[k].0), (b0, b1, b2)),
                barycentric_lerp((self.uvs[i].1, self.uvs[j].1, self.uvs[k].1), (b0, b1, b2)),
            )
        };
        Some(Interaction::new(hit.pos, hit.ray_t, uv, normal, hit.wo))
    }

    fn triangle_corners(&self, tri: &Triangle) -> (Point3, Point3, Point3) {
        let (i, j, k) = tri.indices;
        (self.positions[i], self.positions[j], self.positions[k])
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Shape for TriangleMesh {
    fn summary(&self) -> String {
        format!(
            "TriangleMesh{{{} triangles, {} vertices, bbox = {}, bvh height = {}}}",
            self.triangles.len(),
            self.positions.len(),
            self.bbox(),
            self.bvh.height()
        )
    }
    fn bbox(&self) -> BBox {
        self.bvh.bbox()
    }
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        self.bvh.intersect(r, |i, ray| {
            self.intersect_triangle(&self.triangles[i], ray)
                .map(|isect| (isect.ray_t, isect))
        })
    }
    fn occludes(&self, r: &Ray) -> bool {
        self.bvh.occludes(r, |i, ray| {
            let (p0, p1, p2) = self.triangle_corners(&self.triangles[i]);
            intersect_triangle_pred(p0, p1, p2, ray)
        })
    }

    fn area(&self) -> f32 {
        *self.cumulative_areas.last().unwrap_or(&0.0)
    }

    fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        let total_area = self.area();
        assert!(total_area > 0.0, "sampling a mesh with no area");
        let target = rnd2.0 * total_area;
        let chosen = self
            .cumulative_areas
            .partition_point(|cumulative| *cumulative < target)
            .min(self.triangles.len() - 1);
        // Rescales the residual of the first random number so both coordinates remain uniform
        // within the chosen triangle.
        let below = if chosen == 0 {
            0.0
        } else {
            self.cumulative_areas[chosen - 1]
        };
        let bin_width = self.cumulative_areas[chosen] - below;
        let u_rescaled = if bin_width > 0.0 {
            ((target - below) / bin_width).min(1.0 - f32::EPSILON)
        } else {
            0.0
        };

        let tri = &self.triangles[chosen];
        let (p0, p1, p2) = self.triangle_corners(tri);
        let (u, v) = uniform_triangle_barycentric((u_rescaled, rnd2.1));
        let position = p0 + (p1 - p0) * u + (p2 - p0) * v;
        let normal = (p0 - p1).cross(p2 - p1).hat();
        Interaction::rayless(position, (u, v), normal)
    }
}

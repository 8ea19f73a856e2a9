mod blas;
mod simple;

use geometry::bvh::BBox;
use geometry::interaction::Interaction;
use geometry::ray::Ray;

pub use blas::*;
pub use simple::*;

/// Represents the characteristics of a renderable surface: it has a bounding box, interacts with
/// rays, and can produce uniformly distributed points on itself (the basis of area-light
/// sampling).
/// - See `simple.rs` for analytic shapes: `Sphere`, `ParallelQuad`, and `IsolatedTriangle`.
/// - See `blas.rs` for the aggregated `TriangleMesh`.
pub trait Shape: Send + Sync {
    fn summary(&self) -> String;
    fn bbox(&self) -> BBox;
    fn intersect(&self, r: &Ray) -> Option<Interaction>;
    fn occludes(&self, r: &Ray) -> bool;

    /// Total surface area of the shape.
    fn area(&self) -> f32;

    /// Consumes a 2D uniform [0, 1) random variable and produces a point on the shape surface,
    /// with a sampling distribution uniform with respect to surface area: the per-area density of
    /// any returned point is `1 / area()`.
    fn sample(&self, rnd2: (f32, f32)) -> Interaction;
}

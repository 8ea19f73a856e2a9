/// Defines useful functions for common math operations, tools and constants:
/// - Simple interpolation and barycentric interpolation on not only primitive types,
/// - Macros to check if two math quantities are less than / greater than (or equal to) each other.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 3D points and vectors, 3x3 matrices.
/// - Function `make_coord_system()` to build an orthogonal base from a `Vec3`.
/// - Function `reflect()` to compute the mirrored direction at a surface.
pub mod hcm;

/// Provides `Prob` struct representing a probability mass or probability density.
pub mod prob;

pub use float::Float;

/// Computes the linear interpolation between `a` and `b`: (0, 1) -> (a, b).
///
/// This function also works if `a` and `b` are not "Scalable" by themselves - as long as `a-b` can
/// be scaled by a `f32`, and the difference can be added to either `a` or `b` to get back `T` then
/// `lerp` can be used.
/// - Although `Point3` can't be scaled, the difference type `Vec3` can, and point + vector is
///   a point, so `lerp` can be used on 2 points.
pub fn lerp<T, U>(a: T, b: T, t: f32) -> T
where
    T: Copy + std::ops::Sub<T, Output = U>,
    U: Copy + std::ops::Mul<f32, Output = U> + std::ops::Add<T, Output = T>,
{
    (b - a) * t + a
}

/// Computes the barycentric interpolation given 3 attribute values and 3 barycentric coordinates.
/// The attribute can be of various types. If types can be `lerp`ed, then there's a great chance
/// that they can be `barycentric_lerp`ed.
pub fn barycentric_lerp<T, U>(values: (T, T, T), bc_coeffs: (f32, f32, f32)) -> T
where
    T: Copy + std::ops::Sub<T, Output = U>,
    U: Copy
        + std::ops::Mul<f32, Output = U>
        + std::ops::Add<T, Output = T>
        + std::ops::Add<U, Output = U>,
{
    let (a, b, c) = values;
    let (bc0, bc1, _) = bc_coeffs;
    //   bc0 * a + bc1 * b + (1 - bc0 - bc1) * c
    // = bc0 * (a-c) + bc1 * (b-c) + c
    (a - c) * bc0 + (b - c) * bc1 + c
}

pub trait Float: Sized {
    /// Absolute distance between `self` and `other` on the real axis.
    fn dist_to(self, other: Self) -> Self;
    /// Computes `1 / x` if x is nonzero; returns 0 otherwise. Useful for dividing by a
    /// probability that may have degenerated to zero.
    fn weak_recip(self) -> Self;
    /// Computes `x / y` if y is nonzero; returns `None` if y is zero.
    fn try_divide(self, divisor: Self) -> Option<Self>;
}

impl Float for f32 {
    /// ```
    /// use math::float::Float;
    /// assert_eq!(3.0f32.dist_to(1.5), 1.5);
    /// assert_eq!(1.5f32.dist_to(3.0), 1.5);
    /// ```
    fn dist_to(self, other: f32) -> f32 {
        (self - other).abs()
    }

    /// ```
    /// use math::float::Float;
    /// assert_eq!(4.0f32.weak_recip(), 0.25);
    /// assert_eq!(0.0f32.weak_recip(), 0.0);
    /// ```
    fn weak_recip(self) -> f32 {
        if self == 0.0 { 0.0 } else { self.recip() }
    }

    /// ```
    /// use math::float::Float;
    /// assert_eq!(1.0f32.try_divide(0.0), None);
    /// assert_eq!(1.0f32.try_divide(2.5), Some(0.4));
    /// assert_eq!(0.0f32.try_divide(2.5), Some(0.0));
    /// ```
    fn try_divide(self, divisor: f32) -> Option<f32> {
        if divisor == 0.0 {
            None
        } else {
            Some(self / divisor)
        }
    }
}

/// Divides the given `interval` evenly into `count` pieces and returns the midpoint of each piece
/// together with the spacing between adjacent midpoints.
pub fn linspace(interval: (f32, f32), count: i32) -> (Vec<f32>, f32) {
    let (a, b) = interval;
    (
        (0..count)
            .map(|i| (i as f32 + 0.5) / count as f32 * (b - a) + a)
            .collect::<Vec<_>>(),
        (b - a) / count as f32,
    )
}

pub fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a < b { (a, b) } else { (b, a) }
}

pub trait Inside
where
    Self: std::cmp::PartialOrd + Sized + Copy,
{
    fn inside(self, interval: (Self, Self)) -> bool {
        let (left, right) = interval;
        left <= self && self <= right
    }
}

impl Inside for f32 {}

#[macro_export]
macro_rules! assert_le {
    ($left:expr, $right:expr) => {
        if $left > $right {
            panic!(
                "Assertion failed: {} <= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_lt {
    ($left:expr, $right:expr) => {
        if $left >= $right {
            panic!(
                "Assertion failed: {} < {} (values: {} vs. {})",
                stringify!($left),
                stringify! {$right},
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_gt {
    ($left:expr, $right:expr) => {
        if $left <= $right {
            panic!(
                "Assertion failed: {} > {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_ge {
    ($left:expr, $right:expr) => {
        if $left < $right {
            panic!(
                "Assertion failed: {} >= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

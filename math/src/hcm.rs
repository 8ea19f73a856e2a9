use std::{
    fmt,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub},
};

pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn point3(x: f32, y: f32, z: f32) -> Point3 {
    Point3::new(x, y, z)
}

/// Represents a 3D vector. Each component is a `f32` number.
/// Components can be accessed using `v.x` `v.y` `v.z`,
/// or indices `v[i]` where i is 0, 1, or 2.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "({:.p$}, {:.p$}, {:.p$})",
            self.x,
            self.y,
            self.z,
            p = precision
        )
    }
}
impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "[{:.p$}, {:.p$}, {:.p$}]",
            self.x,
            self.y,
            self.z,
            p = precision
        )
    }
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }
    pub fn as_triple(self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }
    pub const X: Vec3 = Self::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Self::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Self::new(0.0, 0.0, 1.0);
    pub const ZERO: Vec3 = Self::new(0.0, 0.0, 0.0);

    pub fn dot(self, v: Vec3) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
    pub fn cross(self, v: Vec3) -> Vec3 {
        // x1 y1 z1
        // x2 y2 z2
        // i  j  k
        Vec3::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    pub fn norm_squared(self) -> f32 {
        self.dot(self)
    }
    pub fn norm(self) -> f32 {
        f32::sqrt(self.norm_squared())
    }
    pub fn is_zero(self) -> bool {
        self.norm_squared() == 0.0
    }

    /// Returns a normalized (unit-length) `self` vector.
    /// Panics if the vector length is zero, NaN or infinite.
    pub fn hat(self) -> Vec3 {
        let norm2 = self.norm_squared();
        assert!(norm2 != 0.0 && norm2.is_finite());
        let inv_sqrt = 1.0 / self.norm();
        self * inv_sqrt
    }
    pub fn try_hat(self) -> Option<Self> {
        let inv_length = 1.0 / self.norm();
        (inv_length.is_finite() && inv_length != 0.0).then(|| inv_length * self)
    }

    /// Chooses from `self` or `-self`, whichever faces a surface having given `normal`.
    pub fn facing(self, normal: Self) -> Self {
        if self.dot(normal).is_sign_negative() {
            self
        } else {
            -self
        }
    }

    // Returns the index to the element with minimum magnitude.
    pub fn abs_min_dimension(self) -> usize {
        let abs = [self.x.abs(), self.y.abs(), self.z.abs()];
        let res = if abs[0] < abs[1] { 0 } else { 1 };
        if abs[res] < abs[2] { res } else { 2 }
    }

    pub fn max_dimension(self) -> usize {
        let res = if self.x > self.y { 0 } else { 1 };
        if self[2] > self[res] {
            2
        } else {
            res
        }
    }

    pub fn has_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}
impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl Add<Point3> for Vec3 {
    type Output = Point3;
    fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}
impl Index<usize> for Vec3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("invalid index"),
        }
    }
}
impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("invalid index"),
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}
impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}
impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, s: f32) -> Vec3 {
        Vec3::new(self.x / s, self.y / s, self.z / s)
    }
}

// Implementation of Points
impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Point3 {
        Point3 { x, y, z }
    }
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);
    pub fn as_triple(self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }

    pub fn distance_to(self, p: Self) -> f32 {
        (self - p).norm()
    }
    pub fn squared_distance_to(self, p: Self) -> f32 {
        (self - p).norm_squared()
    }
    pub fn has_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Point3;
    fn add(self, v: Vec3) -> Point3 {
        Point3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, from: Point3) -> Vec3 {
        Vec3::new(self.x - from.x, self.y - from.y, self.z - from.z)
    }
}
impl Sub<Vec3> for Point3 {
    type Output = Point3;
    fn sub(self, t: Vec3) -> Point3 {
        Point3::new(self.x - t.x, self.y - t.y, self.z - t.z)
    }
}
impl Index<usize> for Point3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("invalid index"),
        }
    }
}
impl IndexMut<usize> for Point3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("invalid index"),
        }
    }
}

// Explicit conversion between Vec3 and Point3.
// -------------------------------------------------------------------------------------------------
impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// ------------------------------------------------------------------------------------------------
/// Mat3: implements m * v, m - m, m^T
#[derive(Debug, Clone, Copy)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Mat3 {
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO; 3],
    };
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };
    pub fn from_cols(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { cols: [v0, v1, v2] }
    }
    pub fn transpose(&self) -> Self {
        let mut mat = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                mat.cols[i][j] = self.cols[j][i];
            }
        }
        mat
    }
    pub fn frobenius_norm_squared(&self) -> f32 {
        (0..3).map(|i| self.cols[i].norm_squared()).sum()
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        self.cols[0] * v[0] + self.cols[1] * v[1] + self.cols[2] * v[2]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;
    fn mul(self, m: Self) -> Mat3 {
        Mat3::from_cols(self * m.cols[0], self * m.cols[1], self * m.cols[2])
    }
}

impl Sub for Mat3 {
    type Output = Mat3;
    fn sub(self, rhs: Mat3) -> Self::Output {
        Self::from_cols(
            self.cols[0] - rhs.cols[0],
            self.cols[1] - rhs.cols[1],
            self.cols[2] - rhs.cols[2],
        )
    }
}

// Mod-level functions

pub fn normalize(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z).hat()
}

/// Computes a pair of unit-vectors that forms an orthonormal matrix with `v`.
/// ```
/// use math::hcm::{Vec3, Mat3, make_coord_system};
/// let v0 = Vec3::new(0.3, 0.4, -0.6).hat();
/// let (v1, v2) = make_coord_system(v0);
///
/// let basis = Mat3::from_cols(v0, v1, v2);
/// // basis * basis^T should be identity.
/// let diff_to_eye = basis * basis.transpose() - Mat3::IDENTITY;
/// assert!(diff_to_eye.frobenius_norm_squared() < f32::EPSILON);
/// ```
pub fn make_coord_system(v: Vec3) -> (Vec3, Vec3) {
    let i0 = v.abs_min_dimension();
    let (i1, i2) = ((i0 + 1) % 3, (i0 + 2) % 3);
    let mut v1 = Vec3::ZERO;
    // v = [x, y, z] -> [x, 0, z], v1 = [-z, 0, x]
    v1[i1] = v[i2];
    v1[i2] = -v[i1];
    assert!(v1.dot(v).abs() < f32::EPSILON);
    let v2 = v.cross(v1);
    (v1.hat(), v2.hat())
}

/// Mirrors `wi` across `normal`. Both `wi` and the result are on the same side of the surface as
/// `normal`; `normal` needs not be unit-length.
pub fn reflect(normal: Vec3, wi: Vec3) -> Vec3 {
    let perp = wi.dot(normal) * normal / normal.norm_squared();
    let parallel = wi - perp;
    wi - 2.0 * parallel
}

#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        if ($left - $right).norm_squared() > 1e-4 {
            panic!(
                "Assertion failed: Close({}, {}) values: {} vs. {}, dist = {}",
                stringify!($left),
                stringify!(right),
                $left,
                $right,
                ($left - $right).norm()
            )
        }
    };
}

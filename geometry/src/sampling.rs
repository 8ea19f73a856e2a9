use math::hcm::Vec3;

/// Maps a 2D uniform [0, 1) random variable onto the unit disk, preserving relative areas.
/// Returns the (x, y) coordinates of the mapped point.
pub fn concentric_sample_disk(uv: (f32, f32)) -> (f32, f32) {
    let x = uv.0 * 2.0 - 1.0;
    let y = uv.1 * 2.0 - 1.0;

    if x == 0.0 && y == 0.0 {
        return (0.0, 0.0);
    }
    let r = if x.abs() > y.abs() { x } else { y }.abs();
    let hypot = x.hypot(y);
    let (cos_theta, sin_theta) = (x / hypot, y / hypot);
    (r * cos_theta, r * sin_theta)
}

/// Draws a direction on the +Z hemisphere with density proportional to cos(theta), by lifting a
/// concentric disk sample onto the hemisphere.
pub fn cos_sample_hemisphere(uv: (f32, f32)) -> Vec3 {
    let (x, y) = concentric_sample_disk(uv);
    let z = (1.0 - x * x - y * y).max(0.0).sqrt();
    Vec3::new(x, y, z)
}

/// Density of `cos_sample_hemisphere` at a local direction (+Z is the surface normal).
pub fn cos_hemisphere_pdf(w_local: Vec3) -> f32 {
    w_local.z.max(0.0) * std::f32::consts::FRAC_1_PI
}

use enum_dispatch::enum_dispatch;
use geometry::sampling;
use geometry::Interaction;
use math::hcm::{self, Vec3};
use math::prob::Prob;
use radiometry::color::Color;
use std::f32::consts::FRAC_1_PI;

/// Scattering behavior of a surface. All directions are in world space and point away from the
/// surface; `wo` towards the viewer, `wi` towards the light (or the next path vertex).
///
/// The variant set is closed: every material a scene can hold is one of [`AnyMaterial`]'s cases,
/// so the renderer dispatches without trait objects.
#[enum_dispatch]
pub trait Material {
    /// Evaluates the BRDF for the given in/out directions at `isect`. Specular materials return
    /// black here; their reflectance only shows up through `sample`.
    fn eval(&self, isect: &Interaction, wo: Vec3, wi: Vec3) -> Color;

    /// Draws an incident direction from the material's importance distribution. Returns the BSDF
    /// value along the drawn direction, the direction itself, and the probability of having drawn
    /// it (a density for rough surfaces, a point mass for specular ones). The estimator weighs
    /// one sample as `f * cos(wi, normal) / probability`.
    fn sample(&self, isect: &Interaction, wo: Vec3, rnd2: (f32, f32)) -> (Color, Vec3, Prob);

    /// Probability density with which `sample` would produce `wi` given `wo`. Zero for specular
    /// materials (their distribution has no density).
    fn pdf(&self, isect: &Interaction, wo: Vec3, wi: Vec3) -> f32;

    fn has_emission(&self) -> bool;

    /// Radiance emitted by the surface, uniform over its area and the outgoing hemisphere.
    fn emission(&self) -> Color;

    fn summary(&self) -> String;
}

/// The closed set of materials understood by the renderer.
#[enum_dispatch(Material)]
pub enum AnyMaterial {
    Matte,
    Mirror,
    DiffuseLight,
}

/// Lambertian diffuse reflector: uniform reflectance `albedo / pi`, cosine-weighted importance
/// sampling.
pub struct Matte {
    pub albedo: Color,
}

impl Matte {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Matte {
    fn eval(&self, isect: &Interaction, wo: Vec3, wi: Vec3) -> Color {
        // Zero unless both directions lie on the outside of the surface.
        if wi.dot(isect.normal) > 0.0 && wo.dot(isect.normal) > 0.0 {
            self.albedo * FRAC_1_PI
        } else {
            Color::black()
        }
    }

    fn sample(&self, isect: &Interaction, _wo: Vec3, rnd2: (f32, f32)) -> (Color, Vec3, Prob) {
        let local = sampling::cos_sample_hemisphere(rnd2);
        let (tangent, bitangent) = hcm::make_coord_system(isect.normal);
        let wi = tangent * local.x + bitangent * local.y + isect.normal * local.z;
        (
            self.albedo * FRAC_1_PI,
            wi,
            Prob::Density(sampling::cos_hemisphere_pdf(local)),
        )
    }

    fn pdf(&self, isect: &Interaction, wo: Vec3, wi: Vec3) -> f32 {
        if wi.dot(isect.normal) > 0.0 && wo.dot(isect.normal) > 0.0 {
            wi.dot(isect.normal) * FRAC_1_PI
        } else {
            0.0
        }
    }

    fn has_emission(&self) -> bool {
        false
    }
    fn emission(&self) -> Color {
        Color::black()
    }
    fn summary(&self) -> String {
        format!("Matte{{albedo = {}}}", self.albedo)
    }
}

/// Perfect specular reflector.
pub struct Mirror {
    pub albedo: Color,
}

impl Mirror {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Mirror {
    fn eval(&self, _isect: &Interaction, _wo: Vec3, _wi: Vec3) -> Color {
        Color::black()
    }

    fn sample(&self, isect: &Interaction, wo: Vec3, _rnd2: (f32, f32)) -> (Color, Vec3, Prob) {
        let wi = hcm::reflect(isect.normal, wo);
        // The delta-distribution convention: dividing out the cosine here makes the estimator's
        // `f * cos / probability` weight come out to exactly `albedo`.
        let cos = wi.dot(isect.normal).abs().max(1e-6);
        (self.albedo * cos.recip(), wi, Prob::Mass(1.0))
    }

    fn pdf(&self, _isect: &Interaction, _wo: Vec3, _wi: Vec3) -> f32 {
        0.0
    }

    fn has_emission(&self) -> bool {
        false
    }
    fn emission(&self) -> Color {
        Color::black()
    }
    fn summary(&self) -> String {
        format!("Mirror{{albedo = {}}}", self.albedo)
    }
}

/// Uniform area emitter. Diffuse underneath, so a light panel that also receives light behaves
/// sensibly, though the integrator short-circuits on emissive hits.
pub struct DiffuseLight {
    emit: Color,
    base: Matte,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self {
            emit,
            base: Matte::new(Color::gray(0.65)),
        }
    }
}

impl Material for DiffuseLight {
    fn eval(&self, isect: &Interaction, wo: Vec3, wi: Vec3) -> Color {
        self.base.eval(isect, wo, wi)
    }

    fn sample(&self, isect: &Interaction, wo: Vec3, rnd2: (f32, f32)) -> (Color, Vec3, Prob) {
        self.base.sample(isect, wo, rnd2)
    }

    fn pdf(&self, isect: &Interaction, wo: Vec3, wi: Vec3) -> f32 {
        self.base.pdf(isect, wo, wi)
    }

    fn has_emission(&self) -> bool {
        true
    }
    fn emission(&self) -> Color {
        self.emit
    }
    fn summary(&self) -> String {
        format!("DiffuseLight{{emit = {}}}", self.emit)
    }
}

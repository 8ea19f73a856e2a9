use geometry::ray::Ray;
use geometry::Interaction;
use material::{AnyMaterial, Material};
use radiometry::color::Color;
use rand::Rng;
use scene::{LightSample, Scene};

/// Floor applied to sampling densities (and squared distances) before dividing by them, so a
/// near-singular sample cannot blow the estimate up.
const MIN_PDF: f32 = 1e-4;
const MIN_DIST_SQUARED: f32 = 1e-6;

/// Tolerance used to decide whether the shadow ray reached the sampled light point: the nearest
/// hit must land within this distance of the sample. Scaled to the preset scenes (units of
/// meters); larger than intersection noise, far smaller than any scene feature.
const SHADOW_EPSILON: f32 = 1e-3;

/// A direct-lighting estimate of at least this magnitude marks the bounce as "light already
/// counted": an indirect bounce that then lands on an emitter is dropped instead of counted
/// twice. A plain threshold test, not a balance-heuristic weight.
const DIRECT_LIGHT_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct Params {
    /// Hard cap on path length. Russian roulette keeps the expected length near
    /// `1 / (1 - rr_survival)`; the cap guarantees termination regardless.
    pub max_depth: u32,
    /// Probability that a path survives the continuation test at each bounce. Surviving
    /// contributions are divided by this, which keeps the estimator unbiased.
    pub rr_survival: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_depth: 16,
            rr_survival: 0.8,
        }
    }
}

/// The path-tracing estimator. One call to [`radiance`] produces one sample of the outgoing
/// radiance along a ray; accumulation over samples is the caller's business.
///
/// Reads the scene only; every call threads its own RNG, so concurrent estimates over one scene
/// are safe.
pub struct Integrator {
    params: Params,
}

impl Integrator {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Estimates the radiance arriving along `ray`.
    ///
    /// A ray that escapes the scene sees exactly the background constant; a ray whose nearest hit
    /// is an emitter sees exactly that emission. Everything else walks the path loop: at each
    /// vertex a direct-light sample accumulates, then the roulette decides whether a bounce
    /// direction is drawn and followed, with the path throughput picking up
    /// `f * cos / pdf / survival` per bounce. The summed estimate is clamped to [0, 1] per
    /// channel on return (an output-safety clamp, not part of the physical estimate).
    pub fn radiance<R: Rng>(&self, scene: &Scene, ray: Ray, rng: &mut R) -> Color {
        let (mut hit, mut mtl) = match scene.intersect(&ray) {
            None => return scene.background,
            Some(found) => found,
        };
        if mtl.has_emission() {
            return mtl.emission();
        }

        let mut acc = Color::black();
        let mut beta = Color::ONE;
        let mut wo = (-ray.dir).try_hat().unwrap_or(-ray.dir);

        for _bounce in 0..self.params.max_depth {
            let direct = self.direct_light(scene, &hit, mtl, wo, rng);
            acc += beta * direct;
            let direct_counted = direct.magnitude() > DIRECT_LIGHT_THRESHOLD;

            if rng.gen::<f32>() > self.params.rr_survival {
                break;
            }
            let (f, wi, prob) = mtl.sample(&hit, wo, (rng.gen(), rng.gen()));
            if f.is_black() {
                break;
            }
            let cos_bounce = wi.dot(hit.normal).max(0.0);
            let weight = f * cos_bounce
                * (prob.value().max(MIN_PDF) * self.params.rr_survival).recip();
            beta *= weight;
            if beta.is_black() {
                break;
            }

            let bounce_ray = hit.spawn_ray(wi);
            let (next_hit, next_mtl) = match scene.intersect(&bounce_ray) {
                // The bounce escaped; the indirect term contributes nothing.
                None => break,
                Some(found) => found,
            };
            if next_mtl.has_emission() {
                // A bounce landing on an emitter terminates the path either way; its emission
                // only counts if no direct sample already accounted for light at this vertex.
                if !direct_counted {
                    acc += beta * next_mtl.emission();
                }
                break;
            }

            hit = next_hit;
            mtl = next_mtl;
            wo = (-bounce_ray.dir).try_hat().unwrap_or(-bounce_ray.dir);
        }

        acc.saturated()
    }

    /// Next-event estimate: one area-weighted sample on the emissive surface, tested for
    /// visibility, weighted by the geometric term and the light pdf. Both cosines clamp at zero
    /// so backfacing geometry contributes nothing, never negative radiance.
    fn direct_light<R: Rng>(
        &self,
        scene: &Scene,
        hit: &Interaction,
        mtl: &AnyMaterial,
        wo: math::hcm::Vec3,
        rng: &mut R,
    ) -> Color {
        let LightSample {
            point: light_point,
            radiance,
            pdf,
        } = match scene.sample_light(rng) {
            // No emissive surface to sample: no direct contribution.
            None => return Color::black(),
            Some(sample) => sample,
        };

        let to_light = light_point.pos - hit.pos;
        let distance_squared = to_light.norm_squared().max(MIN_DIST_SQUARED);
        let wl = match to_light.try_hat() {
            None => return Color::black(),
            Some(dir) => dir,
        };

        // The sampled point is visible iff the shadow ray's nearest hit is that point itself,
        // within tolerance; the tolerance absorbs self-intersection jitter at both endpoints. A
        // miss means the ray skimmed past the emitter's edge, which also counts as visible.
        let shadow_ray = hit.spawn_ray(wl);
        let visible = match scene.intersect(&shadow_ray) {
            None => true,
            Some((blocker, _)) => blocker.pos.distance_to(light_point.pos) < SHADOW_EPSILON,
        };
        if !visible {
            return Color::black();
        }

        let cos_surface = wl.dot(hit.normal).max(0.0);
        let cos_light = (-wl).dot(light_point.normal).max(0.0);
        radiance
            * mtl.eval(hit, wo, wl)
            * (cos_surface * cos_light / (distance_squared * pdf.max(MIN_PDF)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::camera::Camera;
    use itertools::Itertools;
    use material::{DiffuseLight, Matte, Mirror};
    use math::hcm::{point3, vec3, Point3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use scene::preset;
    use shape::ParallelQuad;

    fn mean_radiance(
        integrator: &Integrator,
        scene: &Scene,
        ray: Ray,
        samples: u32,
        seed: u64,
    ) -> Color {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sum = Color::black();
        for _ in 0..samples {
            sum += integrator.radiance(scene, ray, &mut rng);
        }
        sum.scale_down_by(samples)
    }

    #[test]
    fn miss_returns_background_exactly() {
        let background = Color::new(0.235, 0.674, 0.843);
        let mut scene = Scene::new(Camera::new((8, 8), 1.0));
        let matte = scene.add_material(Matte::new(Color::gray(0.5)));
        scene.add_primitive(ParallelQuad::new_xy((-1.0, 1.0), (-1.0, 1.0), 5.0), matte);
        scene = scene.with_background(background);
        scene.build_bvh();

        let integrator = Integrator::new(Params::default());
        let away = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, -1.0));
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(integrator.radiance(&scene, away, &mut rng), background);
        }
    }

    #[test]
    fn emissive_hit_returns_emission_exactly() {
        let scene = preset::facing_quads();
        let integrator = Integrator::new(Params::default());
        // Aims straight at the light panel at z = 5.
        let ray = Ray::new(point3(0.0, 0.0, 7.0), vec3(0.0, 0.0, -1.0));
        let mut last = None;
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let radiance = integrator.radiance(&scene, ray, &mut rng);
            assert_eq!(radiance, Color::new(1200.0, 960.0, 720.0));
            // Independent of the roulette stream: every seed returns the identical value.
            if let Some(previous) = last {
                assert_eq!(radiance, previous);
            }
            last = Some(radiance);
        }
    }

    /// The master end-to-end scenario: one small panel light squarely facing a matte quad.
    /// The Monte-Carlo mean must converge to the analytic small-light direct estimate.
    #[test]
    fn facing_quads_converges_to_analytic_value() {
        let scene = preset::facing_quads();
        let integrator = Integrator::new(Params::default());
        // Hits the receiver's center from the lit side; both cosines are 1 there.
        let ray = Ray::new(point3(0.0, 0.0, 3.0), vec3(0.0, 0.0, -1.0));

        let emit = Color::new(1200.0, 960.0, 720.0);
        let albedo = Color::gray(0.7);
        let light_area = 0.1 * 0.1;
        let distance_squared = 25.0;
        let expected = emit * albedo * (std::f32::consts::FRAC_1_PI * light_area / distance_squared);

        let mean = mean_radiance(&integrator, &scene, ray, 4096, 42);
        for (channel, (actual, wanted)) in [
            (mean.r, expected.r),
            (mean.g, expected.g),
            (mean.b, expected.b),
        ]
        .iter()
        .enumerate()
        {
            let relative = (actual - wanted).abs() / wanted;
            assert!(
                relative < 0.04,
                "channel {}: mean = {}, analytic = {}, off by {:.1}%",
                channel,
                actual,
                wanted,
                relative * 100.0
            );
        }
    }

    /// A 45-degree mirror bouncing a camera ray up into a panel light: the whole estimate rides
    /// on the roulette-compensated indirect term, so its mean must not depend on the survival
    /// probability.
    fn mirror_bounce_scene() -> Scene {
        let s = 0.5f32.sqrt();
        let mut scene = Scene::new(Camera::new((8, 8), 1.0));
        let mirror = scene.add_material(Mirror::new(Color::new(0.9, 0.8, 0.7)));
        // Emission kept low enough that the roulette-boosted sample value stays under the output
        // clamp; otherwise the clamp would skew the comparison below.
        let light = scene.add_material(DiffuseLight::new(Color::new(0.5, 0.6, 0.7)));
        // Mirror plane through the origin, tilted 45 degrees between -z and +y.
        scene.add_primitive(
            ParallelQuad::new(
                point3(-1.0, -s, -s),
                vec3(2.0, 0.0, 0.0),
                vec3(0.0, 2.0 * s, 2.0 * s),
            ),
            mirror,
        );
        // Panel overhead, sampling normal -y (towards the mirror).
        scene.add_primitive(ParallelQuad::new_xz((-0.5, 0.5), 5.0, (-0.5, 0.5)), light);
        scene.build_bvh();
        scene
    }

    #[test]
    fn russian_roulette_compensation_is_unbiased() {
        let scene = mirror_bounce_scene();
        let ray = Ray::new(point3(0.0, 0.0, -3.0), vec3(0.0, 0.0, 1.0));
        // Expectation: mirror albedo * emission.
        let expected = Color::new(0.9, 0.8, 0.7) * Color::new(0.5, 0.6, 0.7);

        let with_roulette = Integrator::new(Params {
            max_depth: 16,
            rr_survival: 0.8,
        });
        let no_roulette = Integrator::new(Params {
            max_depth: 16,
            rr_survival: 1.0,
        });

        let certain = mean_radiance(&no_roulette, &scene, ray, 64, 7);
        assert!(
            (certain - expected).magnitude() < 1e-3,
            "survival 1.0: {} vs {}",
            certain,
            expected
        );

        let averaged = mean_radiance(&with_roulette, &scene, ray, 4000, 7);
        for (actual, wanted) in [
            (averaged.r, expected.r),
            (averaged.g, expected.g),
            (averaged.b, expected.b),
        ]
        .iter()
        {
            let relative = (actual - wanted).abs() / wanted;
            assert!(
                relative < 0.05,
                "mean = {} vs expected = {} ({:.1}% off)",
                averaged,
                expected,
                relative * 100.0
            );
        }
    }

    #[test]
    fn occluder_blocks_direct_light() {
        let build = |with_occluder: bool| {
            let mut scene = Scene::new(Camera::new((8, 8), 1.0));
            let matte = scene.add_material(Matte::new(Color::gray(0.7)));
            let light = scene.add_material(DiffuseLight::new(Color::new(1200.0, 960.0, 720.0)));
            scene.add_primitive(
                ParallelQuad::new(point3(-0.5, -0.5, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)),
                matte,
            );
            scene.add_primitive(
                ParallelQuad::new(point3(-0.05, -0.05, 5.0), vec3(0.0, 0.1, 0.0), vec3(0.1, 0.0, 0.0)),
                light,
            );
            if with_occluder {
                // Opaque panel strictly between the receiver and the light, wide enough to cover
                // the whole light cone.
                scene.add_primitive(
                    ParallelQuad::new_xy((-1.0, 1.0), (-1.0, 1.0), 2.5),
                    matte,
                );
            }
            scene.build_bvh();
            scene
        };

        // Depth 1 isolates the direct term: the single allowed bounce can only add radiance by
        // landing on the emitter, and every direction towards the emitter is covered by the
        // occluder. The camera sits between occluder and receiver, looking at the lit side.
        let integrator = Integrator::new(Params {
            max_depth: 1,
            rr_survival: 0.8,
        });
        let ray = Ray::new(point3(2.0, 0.0, 1.2), (Point3::ORIGIN - point3(2.0, 0.0, 1.2)).hat());

        let open = mean_radiance(&integrator, &build(false), ray, 64, 3);
        assert!(open.magnitude() > 0.05, "unoccluded direct light missing");

        let blocked = mean_radiance(&integrator, &build(true), ray, 64, 3);
        assert_eq!(
            blocked,
            Color::black(),
            "occluded receiver still saw direct light"
        );
    }

    #[test]
    fn self_occlusion_does_not_block() {
        // The shadow ray starts on the receiver itself; if the spawn offset or the distance
        // tolerance were wrong, the receiver (or the light) would shadow the very sample point.
        let scene = preset::facing_quads();
        let integrator = Integrator::new(Params {
            max_depth: 1,
            rr_survival: 0.8,
        });
        let ray = Ray::new(point3(0.0, 0.0, 3.0), vec3(0.0, 0.0, -1.0));
        let mean = mean_radiance(&integrator, &scene, ray, 32, 11);
        assert!(
            mean.r > 0.005,
            "direct light misclassified as self-occluded: {}",
            mean
        );
    }

    #[test]
    fn cornell_box_renders_plausible_values() {
        let scene = preset::cornell_box();
        let integrator = Integrator::new(Params::default());
        let (width, height) = scene.camera.resolution();
        let mut rng = StdRng::seed_from_u64(1);
        // A coarse grid of camera rays: all estimates must be finite and inside the clamp range.
        let grid = (0..height)
            .step_by(97)
            .cartesian_product((0..width).step_by(89));
        for (row, col) in grid {
            let ray = scene.camera.shoot_ray(row, col, (0.5, 0.5)).unwrap();
            for _ in 0..4 {
                let radiance = integrator.radiance(&scene, ray, &mut rng);
                assert!(radiance.is_finite(), "at ({}, {}): {}", row, col, radiance);
                let clamped = radiance.saturated();
                // Either the unclamped emission of the light panel, or a clamped estimate.
                assert!(
                    radiance == clamped || radiance == Color::new(34.0, 27.0, 17.0),
                    "unexpected unclamped value {}",
                    radiance
                );
            }
        }
    }
}

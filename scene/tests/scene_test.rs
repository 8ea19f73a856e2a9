use geometry::camera::Camera;
use geometry::ray::Ray;
use material::{DiffuseLight, Matte};
use math::hcm::{point3, vec3};
use math::Float;
use radiometry::color::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scene::Scene;
use shape::{IsolatedTriangle, ParallelQuad, Sphere};

fn test_camera() -> Camera {
    Camera::new((64, 64), 60.0f32.to_radians())
}

/// A grid of spheres, one wall, and a degenerate (zero-area) triangle thrown in to make sure
/// nothing chokes on it.
fn ball_scene() -> Scene {
    let mut scene = Scene::new(test_camera());
    let matte = scene.add_material(Matte::new(Color::gray(0.5)));
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                let center = point3(
                    i as f32 * 3.0 - 4.5,
                    j as f32 * 3.0 - 4.5,
                    k as f32 * 3.0 + 4.0,
                );
                let radius = 0.3 + 0.05 * ((i + 2 * j + 3 * k) % 5) as f32;
                scene.add_primitive(Sphere::new(center, radius), matte);
            }
        }
    }
    scene.add_primitive(ParallelQuad::new_xy((-8.0, 8.0), (-8.0, 8.0), 18.0), matte);
    let p = point3(1.0, 1.0, 6.0);
    scene.add_primitive(IsolatedTriangle::new(p, p + vec3(1.0, 1.0, 0.0), p), matte);
    scene.build_bvh();
    scene
}

fn ray_battery() -> Vec<Ray> {
    let (coords, _) = math::float::linspace((-7.0, 7.0), 9);
    let mut rays = Vec::new();
    for x in coords.iter() {
        for y in coords.iter() {
            rays.push(Ray::new(point3(*x, *y, -10.0), vec3(0.0, 0.0, 1.0)));
            rays.push(Ray::new(point3(*x, -20.0, *y + 10.0), vec3(0.02, 1.0, 0.01)));
        }
    }
    rays
}

#[test]
fn bvh_intersect_matches_linear_trace() {
    let scene = ball_scene();
    let everything = scene.all_primitives();
    let mut hits = 0;
    for ray in ray_battery() {
        let fast = scene.intersect(&ray);
        let slow = scene.trace(&ray, &everything);
        assert_eq!(scene.occluded(&ray), fast.is_some());
        match (fast, slow) {
            (None, None) => {}
            (Some((a, _)), Some((b, _))) => {
                assert!(
                    a.ray_t.dist_to(b.ray_t) < 1e-4,
                    "t = {} vs {} for ray {}",
                    a.ray_t,
                    b.ray_t,
                    ray
                );
                assert!(a.pos.distance_to(b.pos) < 1e-3);
                hits += 1;
            }
            (a, b) => panic!(
                "ray {}: bvh = {:?}, linear = {:?}",
                ray,
                a.map(|h| h.0.ray_t),
                b.map(|h| h.0.ray_t)
            ),
        }
    }
    assert!(hits > 30, "battery barely hit anything ({} hits)", hits);
}

#[test]
fn rebuilding_changes_nothing() {
    let mut scene = ball_scene();
    let before: Vec<Option<f32>> = ray_battery()
        .iter()
        .map(|r| scene.intersect(r).map(|(i, _)| i.ray_t))
        .collect();
    scene.build_bvh();
    let after: Vec<Option<f32>> = ray_battery()
        .iter()
        .map(|r| scene.intersect(r).map(|(i, _)| i.ray_t))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn empty_scene_never_hits() {
    let mut scene = Scene::new(test_camera());
    scene.build_bvh();
    assert!(scene.intersect(&Ray::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0))).is_none());
    let mut rng = StdRng::seed_from_u64(7);
    assert!(scene.sample_light(&mut rng).is_none());
}

#[test]
fn light_sampling_is_area_weighted() {
    let mut scene = Scene::new(test_camera());
    let matte = scene.add_material(Matte::new(Color::gray(0.4)));
    let light = scene.add_material(DiffuseLight::new(Color::new(10.0, 10.0, 10.0)));

    scene.add_primitive(ParallelQuad::new_xy((-4.0, 4.0), (-4.0, 4.0), 0.0), matte);
    // Two panels: 1x1 at z = 1 and 1x3 at z = 2. Total emissive area: 4.
    scene.add_primitive(ParallelQuad::new_xy((0.0, 1.0), (0.0, 1.0), 1.0), light);
    scene.add_primitive(ParallelQuad::new_xy((0.0, 1.0), (0.0, 3.0), 2.0), light);
    scene.build_bvh();
    assert!(scene.emissive_area().dist_to(4.0) < 1e-5);

    let mut rng = StdRng::seed_from_u64(99);
    let mut small = 0;
    let mut big = 0;
    let draws = 4000;
    for _ in 0..draws {
        let sample = scene.sample_light(&mut rng).expect("two lights exist");
        assert!(sample.pdf.dist_to(0.25) < 1e-6);
        assert_eq!(sample.radiance, Color::new(10.0, 10.0, 10.0));
        if sample.point.pos.z.dist_to(1.0) < 1e-5 {
            small += 1;
        } else {
            assert!(sample.point.pos.z.dist_to(2.0) < 1e-5);
            big += 1;
        }
    }
    let share = small as f32 / draws as f32;
    assert!(share.dist_to(0.25) < 0.03, "small-panel share = {}", share);
    assert!(big > 0);
}

use accel::Bvh;
use geometry::bvh::BBox;
use geometry::ray::Ray;
use math::hcm::{point3, vec3, Point3, Vec3};

/// Minimal analytic sphere; the test's stand-in for scene items.
struct Ball {
    center: Point3,
    radius: f32,
}

impl Ball {
    fn bbox(&self) -> BBox {
        let half_diagonal = Vec3::new(1.0, 1.0, 1.0) * self.radius;
        BBox::new(self.center - half_diagonal, self.center + half_diagonal)
    }

    fn intersect_t(&self, r: &Ray) -> Option<f32> {
        let f = r.origin - self.center;
        let a = r.dir.norm_squared();
        let b_half = f.dot(r.dir);
        let c = f.norm_squared() - self.radius * self.radius;
        let delta = b_half * b_half - a * c;
        if delta < 0.0 {
            return None;
        }
        let sqrt_delta = delta.sqrt();
        let t0 = (-b_half - sqrt_delta) / a;
        let t1 = (-b_half + sqrt_delta) / a;
        r.truncated_t(t0).or_else(|| r.truncated_t(t1))
    }
}

/// Deterministic pseudo-random ball field (no RNG dependency in this crate's tests).
fn ball_field(count: usize) -> Vec<Ball> {
    let mut state = 0x2545f491u64;
    let mut next_unit = move || {
        // xorshift*; folded into [0, 1)
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        (state.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 40) as f32 / (1u64 << 24) as f32
    };
    (0..count)
        .map(|_| Ball {
            center: point3(
                next_unit() * 20.0 - 10.0,
                next_unit() * 20.0 - 10.0,
                next_unit() * 20.0 - 10.0,
            ),
            radius: next_unit() * 0.8 + 0.1,
        })
        .collect()
}

fn ray_battery() -> Vec<Ray> {
    let (coords, _) = math::float::linspace((-9.0, 9.0), 7);
    let mut rays = Vec::new();
    for x in coords.iter() {
        for y in coords.iter() {
            rays.push(Ray::new(point3(*x, *y, -30.0), vec3(0.0, 0.0, 1.0)));
            rays.push(Ray::new(point3(*x, -30.0, *y), vec3(0.1, 1.0, -0.05)));
            rays.push(Ray::new(point3(30.0, *x, *y), vec3(-1.0, 0.02, 0.03)));
        }
    }
    rays
}

fn linear_scan(balls: &[Ball], r: &Ray) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, ball) in balls.iter().enumerate() {
        if let Some(t) = ball.intersect_t(r) {
            if best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((i, t));
            }
        }
    }
    best
}

fn bvh_scan(bvh: &Bvh, balls: &[Ball], r: &Ray) -> Option<(usize, f32)> {
    bvh.intersect(r, |i, ray| balls[i].intersect_t(ray).map(|t| (t, (i, t))))
}

#[test]
fn matches_linear_scan() {
    let balls = ball_field(120);
    let bvh = Bvh::build(balls.len(), |i| balls[i].bbox());
    assert!(bvh.geometric_sound());

    let mut hits = 0;
    for ray in ray_battery() {
        let expected = linear_scan(&balls, &ray);
        let actual = bvh_scan(&bvh, &balls, &ray);
        match (expected, actual) {
            (None, None) => {}
            (Some((i, t)), Some((j, u))) => {
                assert_eq!(i, j, "different ball hit by ray {}", ray);
                assert!((t - u).abs() < 1e-5, "t = {} vs {}", t, u);
                hits += 1;
            }
            (e, a) => panic!("ray {}: linear = {:?}, bvh = {:?}", ray, e, a),
        }
    }
    assert!(hits > 20, "battery barely hit anything ({} hits)", hits);
}

#[test]
fn empty_collection_never_hits() {
    let bvh = Bvh::build(0, |_| unreachable!());
    let ray = Ray::new(Point3::ORIGIN, Vec3::Z);
    assert!(bvh_scan(&bvh, &[], &ray).is_none());
    assert!(!bvh.occludes(&ray, |_, _| unreachable!()));
    assert_eq!(bvh.item_count(), 0);
}

#[test]
fn rebuild_is_idempotent() {
    let balls = ball_field(64);
    let first = Bvh::build(balls.len(), |i| balls[i].bbox());
    let second = Bvh::build(balls.len(), |i| balls[i].bbox());
    for ray in ray_battery() {
        let a = bvh_scan(&first, &balls, &ray);
        let b = bvh_scan(&second, &balls, &ray);
        assert_eq!(a.map(|(i, _)| i), b.map(|(i, _)| i));
    }
}

/// An axis-aligned rectangle at fixed z; its bounding box has zero extent on one axis.
struct Plate {
    z: f32,
    half_width: f32,
}

impl Plate {
    fn bbox(&self) -> BBox {
        BBox::new(
            point3(-self.half_width, -self.half_width, self.z),
            point3(self.half_width, self.half_width, self.z),
        )
    }
    fn intersect_t(&self, r: &Ray) -> Option<f32> {
        let t = r.truncated_t((self.z - r.origin.z) / r.dir.z)?;
        let p = r.position_at(t);
        (p.x.abs() <= self.half_width && p.y.abs() <= self.half_width).then(|| t)
    }
}

#[test]
fn zero_extent_items_are_not_dropped() {
    // Several plates at the same z: centroids coincide on every axis, forcing the oversized-leaf
    // path; all of them must remain reachable.
    let plates = (1..=8)
        .map(|i| Plate {
            z: 5.0,
            half_width: i as f32,
        })
        .collect::<Vec<_>>();
    let bvh = Bvh::build(plates.len(), |i| plates[i].bbox());
    assert!(bvh.geometric_sound());
    assert_eq!(bvh.item_count(), 8);

    let ray = Ray::new(point3(7.5, 0.0, 0.0), vec3(0.0, 0.0, 1.0));
    // Only the widest plate covers x = 7.5.
    let hit = bvh.intersect(&ray, |i, r| plates[i].intersect_t(r).map(|t| (t, i)));
    assert_eq!(hit, Some(7));

    let center_ray = Ray::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0));
    assert!(bvh.occludes(&center_ray, |i, r| plates[i].intersect_t(r).is_some()));
}

pub mod preset;

use accel::Bvh;
use geometry::bvh::BBox;
use geometry::camera::Camera;
use geometry::ray::Ray;
use geometry::Interaction;
use material::{AnyMaterial, Material};
use radiometry::color::Color;
use rand::Rng;
use shape::Shape;

/// Handle into a [`Scene`]'s material arena. Primitives refer to their material through one of
/// these; the scene keeps exclusive ownership of the materials themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialId(usize);

/// A renderable object: owns its geometry, refers to its material by arena index.
pub struct Primitive {
    shape: Box<dyn Shape>,
    material: MaterialId,
}

impl Primitive {
    pub fn bbox(&self) -> BBox {
        self.shape.bbox()
    }
    pub fn area(&self) -> f32 {
        self.shape.area()
    }
    pub fn intersect(&self, r: &Ray) -> Option<Interaction> {
        self.shape.intersect(r)
    }
    pub fn sample(&self, rnd2: (f32, f32)) -> Interaction {
        self.shape.sample(rnd2)
    }
}

/// A point sampled on the scene's emissive surface.
pub struct LightSample {
    pub point: Interaction,
    /// Radiance emitted at the sampled point.
    pub radiance: Color,
    /// Density of the sample with respect to surface area over the *whole* emissive surface of
    /// the scene, not just the chosen primitive.
    pub pdf: f32,
}

/// Owns every primitive and material of a render, plus the acceleration structure over them.
///
/// Usage follows a strict lifecycle: populate with `add_material` / `add_primitive`, then call
/// `build_bvh()` once, then query (`intersect`, `sample_light`, `trace`) from as many threads as
/// desired. Adding a primitive invalidates the tree; querying without a valid tree is a contract
/// violation and panics.
pub struct Scene {
    primitives: Vec<Primitive>,
    materials: Vec<AnyMaterial>,
    bvh: Option<Bvh>,

    // Filled in by `build_bvh`.
    emissive: Vec<usize>,
    emissive_area: f32,

    pub background: Color,
    pub camera: Camera,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            primitives: Vec::new(),
            materials: Vec::new(),
            bvh: None,
            emissive: Vec::new(),
            emissive_area: 0.0,
            background: Color::black(),
            camera,
        }
    }

    pub fn with_background(self, background: Color) -> Self {
        Self { background, ..self }
    }

    pub fn add_material<M: Into<AnyMaterial>>(&mut self, material: M) -> MaterialId {
        self.materials.push(material.into());
        MaterialId(self.materials.len() - 1)
    }

    /// Adds a primitive and returns its arena index. Any previously built BVH is dropped: a stale
    /// tree must never be queried against a changed primitive set.
    pub fn add_primitive<S: Shape + 'static>(&mut self, shape: S, material: MaterialId) -> usize {
        assert!(material.0 < self.materials.len(), "unknown material id");
        self.bvh = None;
        self.primitives.push(Primitive {
            shape: Box::new(shape),
            material,
        });
        self.primitives.len() - 1
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn material(&self, id: MaterialId) -> &AnyMaterial {
        &self.materials[id.0]
    }

    /// One-time build step over the current primitive set; must precede any query. Rebuilding on
    /// an unchanged scene yields an equivalent tree. Also caches the emissive primitive list that
    /// `sample_light` draws from.
    pub fn build_bvh(&mut self) {
        let primitives = &self.primitives;
        let bvh = Bvh::build(primitives.len(), |i| primitives[i].bbox());

        self.emissive = (0..self.primitives.len())
            .filter(|i| self.material(self.primitives[*i].material).has_emission())
            .collect();
        self.emissive_area = self
            .emissive
            .iter()
            .map(|i| self.primitives[*i].area())
            .sum();

        log::info!(
            "BVH built over {} primitives (height {}); {} emissive, total emissive area {:.3}",
            self.primitives.len(),
            bvh.height(),
            self.emissive.len(),
            self.emissive_area
        );
        if self.emissive.is_empty() {
            log::warn!("scene has no emissive primitives; direct lighting will be black");
        }
        self.bvh = Some(bvh);
    }

    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }

    fn built_bvh(&self) -> &Bvh {
        assert!(self.bvh.is_some(), "Scene queried before build_bvh()");
        self.bvh.as_ref().unwrap()
    }

    /// Nearest intersection along `ray`, resolved through the BVH. Pure query; safe to call
    /// concurrently once the scene is built.
    pub fn intersect(&self, ray: &Ray) -> Option<(Interaction, &AnyMaterial)> {
        self.built_bvh()
            .intersect(ray, |i, r| {
                let prim = &self.primitives[i];
                prim.intersect(r)
                    .map(|isect| (isect.ray_t, (isect, prim.material)))
            })
            .map(|(isect, material)| (isect, self.material(material)))
    }

    /// Any-hit occlusion query against the whole scene.
    pub fn occluded(&self, ray: &Ray) -> bool {
        self.built_bvh()
            .occludes(ray, |i, r| self.primitives[i].shape.occludes(r))
    }

    /// Area-weighted sample of one point on the scene's emissive surface: a uniform draw lands in
    /// `[0, A)` over the total emissive area, the primitive whose cumulative-area span contains it
    /// is picked, and that primitive produces a uniform-area point of its own. The returned pdf
    /// is `1 / A`, a density over the union of all emissive surfaces.
    ///
    /// Returns `None` when the scene has no emissive area.
    pub fn sample_light<R: Rng>(&self, rng: &mut R) -> Option<LightSample> {
        if self.emissive_area <= 0.0 {
            return None;
        }
        let target = rng.gen::<f32>() * self.emissive_area;
        let mut accumulated = 0.0;
        let mut chosen = *self.emissive.last().unwrap();
        for index in self.emissive.iter() {
            accumulated += self.primitives[*index].area();
            if target <= accumulated {
                chosen = *index;
                break;
            }
        }

        let primitive = &self.primitives[chosen];
        let point = primitive.sample((rng.gen::<f32>(), rng.gen::<f32>()));
        Some(LightSample {
            point,
            radiance: self.material(primitive.material).emission(),
            pdf: 1.0 / self.emissive_area,
        })
    }

    /// Nearest hit among an explicitly enumerated candidate subset; a linear scan with the same
    /// nearest-hit contract as `intersect`, minus the spatial pruning. Useful for shadow tests
    /// against known objects and as the brute-force reference in tests.
    pub fn trace(&self, r: &Ray, candidates: &[usize]) -> Option<(Interaction, &AnyMaterial)> {
        let mut ray = *r;
        let mut best: Option<(Interaction, MaterialId)> = None;
        for index in candidates.iter() {
            let prim = &self.primitives[*index];
            if let Some(isect) = prim.intersect(&ray) {
                ray.set_extent(isect.ray_t);
                best = Some((isect, prim.material));
            }
        }
        best.map(|(isect, material)| (isect, self.material(material)))
    }

    /// Every primitive index, in insertion order; the natural candidate list for `trace`.
    pub fn all_primitives(&self) -> Vec<usize> {
        (0..self.primitives.len()).collect()
    }

    pub fn emissive_area(&self) -> f32 {
        self.emissive_area
    }
}

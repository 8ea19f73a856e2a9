use geometry::camera::Camera;
use math::hcm::{point3, vec3, Point3};
use radiometry::color::Color;

use crate::Scene;
use material::{DiffuseLight, Matte, Mirror};
use shape::{ParallelQuad, Sphere, TriangleMesh};

// Functions that build the scenes: camera, geometry and materials, with the BVH already built.
// ------------------------------------------------------------------------------------------------

/// Names understood by `from_name`.
pub const PRESET_NAMES: [&str; 2] = ["cornell_box", "facing_quads"];

pub fn from_name(name: &str) -> Option<Scene> {
    match name {
        "cornell_box" => Some(cornell_box()),
        "facing_quads" => Some(facing_quads()),
        _ => None,
    }
}

/// The classic box: white floor/ceiling/back wall, red and green side walls, one panel light
/// under the ceiling, a tall diffuse box and a mirror sphere. The interior spans [0, 5.55] on
/// every axis, with the front face open towards the camera.
pub fn cornell_box() -> Scene {
    const S: f32 = 5.55;
    let camera = Camera::new((784, 784), 40.0f32.to_radians()).looking_at(
        point3(S * 0.5, S * 0.5, -8.0),
        point3(S * 0.5, S * 0.5, 0.0),
        math::hcm::Vec3::Y,
    );
    let mut scene = Scene::new(camera);

    let white = scene.add_material(Matte::new(Color::new(0.725, 0.71, 0.68)));
    let red = scene.add_material(Matte::new(Color::new(0.63, 0.065, 0.05)));
    let green = scene.add_material(Matte::new(Color::new(0.14, 0.45, 0.091)));
    let mirror = scene.add_material(Mirror::new(Color::new(0.95, 0.95, 0.95)));
    let light = scene.add_material(DiffuseLight::new(Color::new(34.0, 27.0, 17.0)));

    // Floor, ceiling, back wall.
    scene.add_primitive(ParallelQuad::new_xz((0.0, S), 0.0, (0.0, S)), white);
    scene.add_primitive(ParallelQuad::new_xz((0.0, S), S, (0.0, S)), white);
    scene.add_primitive(ParallelQuad::new_xy((0.0, S), (0.0, S), S), white);
    // Left wall red, right wall green.
    scene.add_primitive(ParallelQuad::new_yz(0.0, (0.0, S), (0.0, S)), red);
    scene.add_primitive(ParallelQuad::new_yz(S, (0.0, S), (0.0, S)), green);
    // Panel light just below the ceiling.
    scene.add_primitive(
        ParallelQuad::new_xz((2.1, 3.45), S - 0.01, (2.3, 3.3)),
        light,
    );
    // Tall box on the left half, mirror ball on the right.
    scene.add_primitive(
        TriangleMesh::cuboid(point3(0.9, 0.0, 2.8), point3(2.6, 3.3, 4.5)),
        white,
    );
    scene.add_primitive(Sphere::new(point3(3.9, 1.0, 2.2), 1.0), mirror);

    scene.build_bvh();
    scene
}

/// The master direct-lighting scenario: one small panel light squarely facing one matte quad,
/// nothing else, black background. The camera sits between the two, on the lit side of the
/// receiver. The expected radiance at the receiver center is known in closed form (small-light
/// approximation), which the integrator tests rely on.
pub fn facing_quads() -> Scene {
    let camera = Camera::new((256, 256), 60.0f32.to_radians()).looking_at(
        point3(0.0, 0.0, 2.5),
        Point3::ORIGIN,
        math::hcm::Vec3::Y,
    );
    let mut scene = Scene::new(camera);

    let matte = scene.add_material(Matte::new(Color::gray(0.7)));
    let light = scene.add_material(DiffuseLight::new(Color::new(1200.0, 960.0, 720.0)));

    // Receiver: unit quad centered at the origin in the z = 0 plane, normal +z.
    scene.add_primitive(
        ParallelQuad::new(point3(-0.5, -0.5, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)),
        matte,
    );
    // Emitter: 0.1 x 0.1 panel at z = 5 with its sampling normal facing the receiver (-z).
    scene.add_primitive(
        ParallelQuad::new(point3(-0.05, -0.05, 5.0), vec3(0.0, 0.1, 0.0), vec3(0.1, 0.0, 0.0)),
        light,
    );

    scene.build_bvh();
    scene
}

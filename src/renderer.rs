use crate::film::Film;
use crate::integrator::Integrator;
use indicatif::{ProgressBar, ProgressStyle};
use radiometry::color::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use scene::Scene;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub samples_per_pixel: u32,
    pub seed: u64,
    pub single_thread: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            seed: 1,
            single_thread: false,
        }
    }
}

/// Renders the scene through its camera: per pixel, averages `samples_per_pixel` jittered
/// estimates. Scanlines render independently, each on its own deterministic RNG stream, so the
/// multi-threaded result equals the single-threaded one for a fixed seed.
pub fn render(scene: &Scene, integrator: &Integrator, options: &RenderOptions) -> Film {
    assert!(scene.is_built(), "scene must be built before rendering");
    let (width, height) = scene.camera.resolution();
    let mut film = Film::new(width, height);

    let progress = ProgressBar::new(height as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} rows"),
    );

    let render_row = |row: u32, row_pixels: &mut [Color]| {
        let mut rng = row_rng(options.seed, row);
        for col in 0..width {
            let mut sum = Color::black();
            for _ in 0..options.samples_per_pixel {
                let jitter = (rng.gen::<f32>(), rng.gen::<f32>());
                let ray = scene.camera.shoot_ray(row, col, jitter).unwrap();
                sum += integrator.radiance(scene, ray, &mut rng);
            }
            row_pixels[col as usize] = sum.scale_down_by(options.samples_per_pixel);
        }
        progress.inc(1);
    };

    if options.single_thread {
        for (row, row_pixels) in film.pixels_mut().chunks_mut(width as usize).enumerate() {
            render_row(row as u32, row_pixels);
        }
    } else {
        film.pixels_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(row, row_pixels)| render_row(row as u32, row_pixels));
    }
    progress.finish();

    film
}

/// One RNG stream per scanline: reproducible regardless of which thread takes which row.
fn row_rng(seed: u64, row: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ (row as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

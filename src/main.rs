mod cli_options;
mod film;
mod integrator;
mod renderer;

use log::info;

fn main() {
    env_logger::init();

    let options = match cli_options::parse_args(std::env::args().collect()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("usage: {}", cli_options::CliOptions::message());
            std::process::exit(1);
        }
    };

    let scene_name = options
        .scene_name
        .clone()
        .unwrap_or_else(|| String::from("cornell_box"));
    let scene = match scene::preset::from_name(&scene_name) {
        Some(scene) => scene,
        None => {
            eprintln!(
                "unknown scene {:?}; available: {}",
                scene_name,
                scene::preset::PRESET_NAMES.join(", ")
            );
            std::process::exit(1);
        }
    };
    let (width, height) = scene.camera.resolution();
    info!(
        "rendering {} at {}x{}, {} spp",
        scene_name, width, height, options.samples_per_pixel
    );

    let integrator = integrator::Integrator::new(integrator::Params::default());
    let render_options = renderer::RenderOptions {
        samples_per_pixel: options.samples_per_pixel,
        seed: options.seed,
        single_thread: !options.use_multi_thread,
    };
    let film = renderer::render(&scene, &integrator, &render_options);

    let written = if options.output.ends_with(".exr") {
        film.write_exr(&options.output)
    } else {
        film.write_png(&options.output)
    };
    match written {
        Ok(()) => info!("wrote {}", options.output),
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

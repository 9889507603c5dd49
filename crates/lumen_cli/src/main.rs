//! `lumen` - render a scene file to a PPM or PNG image.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use lumen_core::{load_config, load_scene, Config, Scene};
use lumen_renderer::{render_aos, render_soa, same_pixels, save_image, Camera, RenderOptions};

use cli::{Args, Layout};

fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = args.log_level {
        builder.filter_level(level.into());
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

fn log_config(config: &Config) {
    log::debug!("Aspect ratio:    {}:{}", config.aspect_w, config.aspect_h);
    log::debug!("Image width:     {}", config.image_width);
    log::debug!("Gamma:           {}", config.gamma);
    log::debug!("Samples/pixel:   {}", config.samples_per_pixel);
    log::debug!("Max depth:       {}", config.max_depth);
    log::debug!("Field of view:   {}", config.field_of_view);
    log::debug!("Camera position: {}", config.camera_position);
    log::debug!("Camera target:   {}", config.camera_target);
    log::debug!("Camera north:    {}", config.camera_north);
    log::debug!("Seeds:           material {}, ray {}", config.material_rng_seed, config.ray_rng_seed);
}

fn render_and_save(
    camera: &Camera,
    scene: &Scene,
    options: &RenderOptions,
    layout: Layout,
    output: &Path,
) -> Result<()> {
    let save_error = || format!("Failed to write {}", output.display());

    match layout {
        Layout::Aos => {
            let image = render_aos(camera, scene, options);
            save_image(output, &image).with_context(save_error)?;
        }
        Layout::Soa => {
            let image = render_soa(camera, scene, options);
            save_image(output, &image).with_context(save_error)?;
        }
        Layout::Both => {
            let aos = render_aos(camera, scene, options);
            let soa = render_soa(camera, scene, options);
            ensure!(same_pixels(&aos, &soa), "AOS and SOA framebuffers differ");
            log::info!("AOS and SOA framebuffers match");
            save_image(output, &aos).with_context(save_error)?;
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    log::info!("Config loaded from {}", args.config.display());
    log_config(&config);

    let camera = Camera::from_config(&config).context("Invalid camera configuration")?;
    log::info!("Camera ready ({}x{})", camera.image_width, camera.image_height);

    let scene = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    log::info!(
        "Scene loaded (materials={}, spheres={}, cylinders={})",
        scene.materials.len(),
        scene.spheres.len(),
        scene.cylinders.len()
    );

    let options = RenderOptions {
        bucket_size: args.bucket_size,
        ..RenderOptions::default()
    };

    match args.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.get())
                .build()
                .context("Failed to build thread pool")?;
            log::debug!("Using {} worker threads", threads);
            pool.install(|| render_and_save(&camera, &scene, &options, args.layout, &args.output))
        }
        None => render_and_save(&camera, &scene, &options, args.layout, &args.output),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    log::info!("Starting Lumen");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

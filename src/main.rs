use std::path::{Path, PathBuf};
use std::process::ExitCode;

use liquid_globe::prelude::*;
use liquid_globe::export::export_displacement_png;

const USAGE: &str = "usage: liquid-globe [IMAGE] [--config FILE] [--export-map OUT.png]";

/// Side of the exported displacement map in pixels.
const EXPORT_SIZE: u32 = 512;

#[derive(Debug, Default, PartialEq)]
struct Args {
    image: Option<PathBuf>,
    config: Option<PathBuf>,
    export_map: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a file")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--export-map" => {
                let path = args.next().ok_or("--export-map needs a file")?;
                parsed.export_map = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown option {}\n{}", flag, USAGE)),
            _ if parsed.image.is_none() => parsed.image = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {}\n{}", arg, USAGE)),
        }
    }
    Ok(parsed)
}

/// Render one sample frame of the field (ambient flow plus a fresh tap) to a PNG.
fn export_sample(config: &GlobeConfig, out: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut globe = GlobeEffect::from_config(config).with_touch(true);
    globe.handle(PointerEvent::Tap(Vec2::new(0.12, -0.08)));
    for _ in 0..30 {
        globe.tick(PHYSICS_TICK);
        globe.advance_clock(PHYSICS_TICK);
    }

    let size = Vec2::splat(EXPORT_SIZE as f32);
    let params = globe.frame_parameters(size, size);
    let map = DisplacementMap::compute(&params, EXPORT_SIZE, EXPORT_SIZE);
    export_displacement_png(&map, out)?;
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            GlobeConfig::load(path)?
        }
        None => GlobeConfig::default(),
    };

    if let Some(out) = &args.export_map {
        return export_sample(&config, out);
    }

    let image = match &args.image {
        Some(path) => {
            log::info!("loading {}", path.display());
            SourceImage::from_file(path)?
        }
        None => {
            log::info!("no image given, using a checkerboard");
            SourceImage::default()
        }
    };

    Viewer::new()
        .with_image(image)
        .with_config(config)
        .with_title(window_title(args.image.as_deref()))
        .run()?;
    Ok(())
}

/// Window title, naming the image file when one was given.
fn window_title(image: Option<&Path>) -> String {
    match image.and_then(|p| p.file_name()) {
        Some(name) => format!("Liquid Globe - {}", name.to_string_lossy()),
        None => "Liquid Globe".to_string(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

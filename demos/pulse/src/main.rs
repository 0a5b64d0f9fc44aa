use std::path::PathBuf;

use clap::Parser;
use log::info;
use pulse::{Scene, SceneConfig};

/// Render the diffusing pulse scene to numbered PNG frames.
#[derive(Parser, Debug)]
struct Args {
    /// TOML scene configuration. Missing keys keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 15)]
    fps: u32,

    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Frame width and height in pixels.
    #[arg(long, default_value_t = 480)]
    size: u32,

    /// Also write a top-down grayscale height map per frame.
    #[arg(long)]
    heightmap: bool,
}

fn load_config(args: &Args) -> anyhow::Result<SceneConfig> {
    match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&text)?)
        }
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!("scene config: {:?}", config);

    std::fs::create_dir_all(&args.out)?;

    let mut scene = Scene::new(config)?;
    let total = scene.timeline().frames(*scene.camera(), args.fps)?.len();
    let z_scale = scene.evaluator().evaluate().z_range().1.abs().max(1e-6);

    let n = scene.run(args.fps, |frame, field| -> anyhow::Result<()> {
        image_util::save_wireframe(&args.out, "pulse", frame.index, field, &frame.camera, args.size)?;
        if args.heightmap {
            image_util::save_heightmap(&args.out, "height", frame.index, field, z_scale)?;
        }

        eprint!("\r {} / {}", frame.index + 1, total);
        Ok(())
    })?;
    eprintln!();

    info!("wrote {} frames to {}", n, args.out.display());

    Ok(())
}

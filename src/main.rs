use std::fs::{self, OpenOptions};
use std::process;

use anyhow::{Context, Result, bail};
use serde_json::json;

use logo_wallpaper::{
    assets::Assets,
    engine::{
        AnimationDirector, FRAME_COUNT,
        layout::{self, Location, Metrics},
        tween::MotionTween,
    },
    player::Player,
    settings::{self, KEY_LOCATION, STORE_NAME, SettingsStore},
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const RUN_USAGE: &str = "logo-wallpaper run [--location <name>] [--density <f>]";
const SET_USAGE: &str = "logo-wallpaper set-location <name>";
const LAYOUT_USAGE: &str = "logo-wallpaper layout <width> <height> [<name>] [--density <f>]";

/// Options shared by the subcommands.
#[derive(Default)]
struct Options {
    location: Option<String>,
    density: Option<f32>,
    positional: Vec<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>, usage: &str) -> Result<Options> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--location" => opts.location = Some(args.next().context(usage.to_string())?),
            "--density" => {
                let raw = args.next().context(usage.to_string())?;
                let density: f32 = raw
                    .parse()
                    .with_context(|| format!("Invalid density {raw:?}"))?;
                if !(density > 0.0 && density.is_finite()) {
                    bail!("Density must be positive, got {density}");
                }
                opts.density = Some(density);
            }
            s if s.starts_with("--") => bail!("Unknown option {s}\n\nUsage:\n  {usage}"),
            _ => opts.positional.push(arg),
        }
    }
    Ok(opts)
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("run") => play(parse_options(args, RUN_USAGE)?),
        Some("set-location") => {
            let opts = parse_options(args, SET_USAGE)?;
            let name = opts.positional.first().context(SET_USAGE)?;
            set_location(name)
        }
        Some("layout") => print_layout(parse_options(args, LAYOUT_USAGE)?),
        _ => bail!(
            "Logo Wallpaper — animated logo for the terminal\n\nUsage:\n  {RUN_USAGE}\n  {SET_USAGE}\n  {LAYOUT_USAGE}"
        ),
    }
}

/// Log to a file next to the settings so the alternate screen stays clean.
fn init_logging() -> Result<()> {
    let dir = settings::config_dir();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join("logo-wallpaper.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn play(opts: Options) -> Result<()> {
    init_logging()?;

    let mut store = SettingsStore::open(STORE_NAME);
    if let Some(name) = &opts.location {
        name.parse::<Location>()?;
        store.set_string(KEY_LOCATION, name);
    }
    let assets = Assets::builtin(opts.density.unwrap_or(1.0));
    let director = AnimationDirector::new(assets);

    let mut player = Player::new(director, store);
    player.play()
}

fn set_location(name: &str) -> Result<()> {
    let location: Location = name.parse()?;
    let mut store = SettingsStore::open(STORE_NAME);
    store.set_string(KEY_LOCATION, location.name());
    store.commit()?;
    if let Some(path) = store.path() {
        eprintln!("Location set to {location} in {}", path.display());
    }
    Ok(())
}

fn print_layout(opts: Options) -> Result<()> {
    let [width, height] = [0, 1].map(|i| opts.positional.get(i));
    let width: i32 = width
        .context(LAYOUT_USAGE)?
        .parse()
        .context("Invalid width")?;
    let height: i32 = height
        .context(LAYOUT_USAGE)?
        .parse()
        .context("Invalid height")?;
    let name = opts
        .positional
        .get(2)
        .or(opts.location.as_ref())
        .map_or(settings::DEFAULT_LOCATION, String::as_str);
    let location: Location = name.parse()?;

    let assets = Assets::builtin(opts.density.unwrap_or(1.0));
    let metrics = Metrics::new(width, height, assets.density, &assets);
    let layout = layout::compute(location, &metrics);
    let frames: Vec<_> = layout
        .boxes
        .iter()
        .map(|path| {
            MotionTween::new(assets.box_sprite.clone(), path.start, path.end, FRAME_COUNT)
                .positions()
                .to_vec()
        })
        .collect();

    let report = json!({
        "metrics": {
            "width": width,
            "height": height,
            "density": metrics.density,
        },
        "layout": layout,
        "frames": frames,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

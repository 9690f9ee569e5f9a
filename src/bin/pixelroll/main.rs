//! pixelroll - terminal piano-roll player
//!
//! Run with: cargo run -- [--notes song.json] [--config player.toml] [--seed N] [--verbose]

mod app;
mod audio;
mod song;
mod sprites;
mod ui;

use std::fs::File;
use std::path::Path;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use pixelroll::config::PlayerConfig;

use app::Player;

fn init_logging(verbose: bool) -> EyreResult<()> {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let log_path = std::env::temp_dir().join("pixelroll.log");
    let log_file = File::create(&log_path)
        .wrap_err_with(|| format!("cannot create log file {}", log_path.display()))?;

    WriteLogger::init(log_level, Config::default(), log_file)
        .wrap_err("failed to initialize logger")?;

    log::info!("pixelroll starting (log level: {:?})", log_level);
    Ok(())
}

fn load_config(path: Option<&str>) -> EyreResult<PlayerConfig> {
    let Some(path) = path else {
        return Ok(PlayerConfig::default());
    };
    let text = std::fs::read_to_string(Path::new(path))
        .wrap_err_with(|| format!("cannot read config {}", path))?;
    let config = PlayerConfig::from_toml(&text).wrap_err_with(|| format!("in {}", path))?;
    log::info!("loaded config from {}", path);
    Ok(config)
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args: Vec<String> = std::env::args().collect();
    let flag_value = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    };

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose)?;

    let config = load_config(flag_value("--config"))?;
    let tracks = match flag_value("--notes") {
        Some(path) => song::load(Path::new(path))?,
        None => song::demo(),
    };
    let seed = flag_value("--seed")
        .map(|s| s.parse::<u64>())
        .transpose()
        .wrap_err("--seed expects an unsigned integer")?;

    let mut player = Player::new(config, tracks, seed)?;

    let mut terminal = ratatui::init();
    let result = player.run(&mut terminal);
    ratatui::restore();
    result
}

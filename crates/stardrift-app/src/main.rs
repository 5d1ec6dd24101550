//! The binary entry point for the Stardrift backdrop.

mod platform;

use clap::Parser;
use stardrift_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    let dirs = match platform::PlatformDirs::resolve_and_create() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            std::process::exit(1);
        }
    };
    let config_dir = args.config.clone().unwrap_or_else(|| dirs.config_dir.clone());

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config ({e}), using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    stardrift_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    stardrift_app::window::run_with_config(config);
}

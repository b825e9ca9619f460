mod app_dir;
mod cli;
mod color_profiles;
mod error;
mod overview;
mod preferences;
mod run;
mod tour_file;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::preferences::AppPreferences;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    info!("Starting TourMap");

    let mut prefs = AppPreferences::load();
    args.apply(&mut prefs);
    if args.save {
        prefs.save();
    }

    let profiles_dir = color_profiles::color_profiles_dir();
    color_profiles::ensure_default_profiles(&profiles_dir);

    match run::run(&args.tour, &prefs, &profiles_dir) {
        Ok(summary) => {
            if let Some(path) = &summary.overview {
                info!("Overview written to {}", path.display());
            }
            if let Some(path) = &summary.legend {
                info!("Legend written to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

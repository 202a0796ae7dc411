mod age;
mod app;
mod calendar;
mod color;
mod error;
mod notes;
mod settings;
mod vault;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;

use calendar::{GridConfig, MinimapConfig, RenderRequest, render, write_svg};
use vault::{LaunchOptions, load_vault, settings_path_or_default};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Folder holding the daily notes.
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings file; defaults to the per-user config directory.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Render the calendar to an SVG file and exit.
    #[arg(long, value_name = "FILE")]
    export_svg: Option<PathBuf>,

    /// Container width used for the export.
    #[arg(long, default_value_t = 1200.0)]
    width: f32,

    /// Minimap height used for the export.
    #[arg(long, default_value_t = 900.0)]
    height: f32,
}

fn export(options: &LaunchOptions, target: &Path, width: f32, height: f32) -> Result<()> {
    let vault = load_vault(options)?;
    let rendered = render(&RenderRequest {
        settings: &vault.settings,
        notes: &vault.notes,
        today: vault.today,
        container_width: width,
        minimap_height: height,
        grid: &GridConfig::default(),
        minimap: &MinimapConfig::default(),
    })
    .context("failed to render the calendar")?;

    write_svg(target, &rendered.grid, &rendered.minimap)?;
    log::info!(
        "exported {} days to {}",
        rendered.grid.geometry.len(),
        target.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = LaunchOptions {
        settings_path: settings_path_or_default(args.settings.clone(), &args.vault),
        vault_root: args.vault.clone(),
        today: args.today,
    };
    log::debug!("settings file: {}", options.settings_path.display());

    if let Some(target) = &args.export_svg {
        return export(&options, target, args.width, args.height);
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Life calendar",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::LifeCalendarApp::new(cc, options)))),
    )
    .map_err(|error| anyhow!("{error}"))
}

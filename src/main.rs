use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::info;

mod config;
mod constants;
mod engine;
mod layer;
mod loader;
mod manifest;
mod rotator;
mod state;
mod texture_loader;
mod ticker;

use crate::config::{Cli, Command, GenerateArgs, ShowArgs};
use crate::engine::BannerEngine;
use crate::manifest::Order;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Command::Show(args) => show(args),
        Command::Generate(args) => generate(args),
    }
}

fn show(args: ShowArgs) -> Result<()> {
    let images = args.source.resolve()?;
    info!(count = images.len(), "banner images loaded");

    let mut engine = BannerEngine::new(images, args.interval(), args.rotator_options())?;

    let (mut rl, thread) = raylib::init()
        .size(args.width, args.height)
        .title("Banner Rotator")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(args.fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        engine.render_frame(dt, &mut rl, &thread);
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let order = if args.sorted { Order::Sorted } else { Order::Shuffled };
    let base = args
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let base = fs::canonicalize(base).with_context(|| format!("resolving {}", base.display()))?;
    let dir = fs::canonicalize(&args.dir)
        .with_context(|| format!("resolving {}", args.dir.display()))?;

    let images = manifest::generate(&dir, &base, order)
        .with_context(|| format!("scanning {}", args.dir.display()))?;
    manifest::write_manifest(&args.output, &images)
        .with_context(|| format!("writing {}", args.output.display()))?;

    for image in &images {
        println!("{}", image.display());
    }
    info!(count = images.len(), output = %args.output.display(), "manifest written");
    Ok(())
}

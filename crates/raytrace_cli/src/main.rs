//! `raytrace`: render a built-in sphere scene to PPM or PNG.

mod cli;
mod scenes;
mod settings;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use raytrace_renderer::{
    render, stream_rng, PixelSink, PngWriter, PpmWriter, RenderConfig, RenderMode,
    RenderProgress, SCENE_STREAM,
};

use crate::cli::{init_logger, Args};
use crate::settings::Settings;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_args(&args);
    let mut camera = settings.camera();

    let mut scene_rng = stream_rng(args.seed, SCENE_STREAM);
    let world = args.scene.build(&mut scene_rng);
    log::info!("Scene {:?}: {} objects", args.scene, world.len());

    let config = RenderConfig {
        mode: if args.parallel {
            RenderMode::Parallel
        } else {
            RenderMode::Sequential
        },
        workers: args.workers,
        seed: args.seed,
    };

    let mut sink = open_sink(args.output.as_deref())?;

    let bar = progress_bar()?;
    let on_progress = |event: RenderProgress| report_progress(&bar, event);

    let stats = render(&mut camera, &world, &config, sink.as_mut(), &on_progress)
        .context("render failed")?;

    log::info!(
        "Rendered {}x{} with {} workers over {} chunks",
        stats.width,
        stats.height,
        stats.workers,
        stats.chunks
    );

    Ok(())
}

/// Pick the image writer for `output`: PNG by extension, PPM otherwise,
/// PPM on stdout when no path is given.
fn open_sink(output: Option<&Path>) -> Result<Box<dyn PixelSink>> {
    let Some(path) = output else {
        return Ok(Box::new(PpmWriter::new(BufWriter::new(io::stdout().lock()))));
    };

    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        return Ok(Box::new(PngWriter::new(path)));
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    Ok(Box::new(PpmWriter::new(BufWriter::new(file))))
}

fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::no_length();
    bar.set_style(ProgressStyle::with_template(
        "{msg:>10} {bar:40} {pos}/{len} ETA: {eta}",
    )?);
    Ok(bar)
}

/// Draw a progress event. The first event of a render carries the total.
fn report_progress(bar: &ProgressBar, event: RenderProgress) {
    let remaining = match event {
        RenderProgress::ScanlinesRemaining(n) => {
            bar.set_message("scanlines");
            n as u64
        }
        RenderProgress::ChunksRemaining(n) => {
            bar.set_message("chunks");
            n as u64
        }
        RenderProgress::Done(elapsed) => {
            bar.finish_with_message(format!("Done in {:.2}s", elapsed.as_secs_f64()));
            return;
        }
    };

    let total = match bar.length() {
        Some(total) => total,
        None => {
            bar.set_length(remaining);
            remaining
        }
    };
    bar.set_position(total.saturating_sub(remaining));
}

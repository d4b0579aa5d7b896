//! ticktween console demo
//!
//! Draws a circle of dots that grows and shrinks with a bouncing, ping-pong
//! animation until Enter is pressed.

mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use config::{CancellationName, DemoConfig, EasingName};
use rxrust::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;
use ticktween_animation::{AnimateOptions, Animator, ProgressExt};
use ticktween_core::FrameTicker;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Bouncing ASCII circle driven by a ticktween animation
#[derive(Parser, Debug)]
#[command(name = "ticktween")]
#[command(about = "Bouncing ASCII circle driven by a ticktween animation")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Length of one forward run in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Clock tick rate
    #[arg(long)]
    fps: Option<u32>,

    /// Easing preset
    #[arg(long, value_enum)]
    easing: Option<EasingName>,

    /// Stop at the end instead of playing each run backwards
    #[arg(long)]
    no_ping_pong: bool,

    /// Final frame shown when the animation is cancelled
    #[arg(long, value_enum)]
    cancel: Option<CancellationName>,

    /// Width of the widest row
    #[arg(long)]
    diameter: Option<usize>,
}

impl Cli {
    /// Command-line flags win over the config file
    fn apply(&self, config: &mut DemoConfig) {
        if let Some(duration_ms) = self.duration_ms {
            config.animation.duration_ms = duration_ms;
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(easing) = self.easing {
            config.animation.easing = easing;
        }
        if self.no_ping_pong {
            config.animation.ping_pong = false;
        }
        if let Some(cancel) = self.cancel {
            config.animation.cancellation = cancel;
        }
        if let Some(diameter) = self.diameter {
            config.display.diameter = diameter;
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the drawing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    run(&config)
}

fn run(config: &DemoConfig) -> Result<()> {
    let settings = &config.animation;
    info!(
        duration_ms = settings.duration_ms,
        fps = settings.fps,
        easing = ?settings.easing,
        ping_pong = settings.ping_pong,
        "starting animation, press Enter to cancel"
    );

    let ticker = FrameTicker::new();
    let animator = Animator::from_clock(ticker.clock());
    let mut progress = animator.create_animation(settings.duration());
    if settings.ping_pong {
        progress = progress.go_backwards_when_finished();
    }
    let progress = progress.with_easing(settings.easing.into()).repeat_forever();

    let diameter = config.display.diameter;
    let options = AnimateOptions::new().cancellation(settings.cancellation.into());
    let subscription = progress
        .try_animate(
            move |frame| -> io::Result<()> {
                let mut out = io::stdout().lock();
                write!(out, "{}{}", render::CLEAR_SCREEN, render::circle(diameter, frame.value))?;
                out.flush()
            },
            options,
        )
        .activate();

    let enter = spawn_enter_listener()?;
    let period = settings.tick_period();
    let mut deadline = Instant::now();
    let pressed = loop {
        // Absolute deadlines; a tick that runs late restarts the schedule
        deadline += period;
        match deadline.checked_duration_since(Instant::now()) {
            Some(wait) => thread::sleep(wait),
            None => deadline = Instant::now(),
        }
        ticker.tick();

        if subscription.is_closed() {
            warn!("animation stopped on its own");
            break None;
        }
        match enter.try_recv() {
            Ok(pressed) => break Some(pressed),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break None,
        }
    };

    subscription.unsubscribe();
    println!("Animation cancelled");

    if let Some(pressed) = pressed {
        pressed.context("Failed to read from stdin")?;
    }
    Ok(())
}

/// Read one line from stdin on a background thread
fn spawn_enter_listener() -> Result<Receiver<io::Result<()>>> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("ticktween-stdin".to_string())
        .spawn(move || {
            let mut line = String::new();
            let read = io::stdin().read_line(&mut line).map(|_| ());
            // The render loop may already be gone
            let _ = sender.send(read);
        })
        .context("Failed to spawn stdin reader")?;
    Ok(receiver)
}

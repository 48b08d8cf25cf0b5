use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tracing::warn;

use gooey_morph::{Animator, MorphConfig, MorphView, surface_fits};

/// Looping gooey morphing-text animation.
#[derive(Parser, Debug)]
#[command(name = "gooey-morph", version)]
struct Args {
    /// Words to cycle through. Defaults to the built-in list.
    words: Vec<String>,

    /// Morph transition length in seconds.
    #[arg(long, default_value_t = 1.0)]
    morph_secs: f32,

    /// Hold time between morphs in seconds.
    #[arg(long, default_value_t = 0.25)]
    cooldown_secs: f32,

    /// Frame rate of the driver loop.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Outgoing slot color, RRGGBB hex.
    #[arg(long, value_parser = parse_color, default_value = "ffffff")]
    outgoing_color: Color,

    /// Incoming slot color, RRGGBB hex.
    #[arg(long, value_parser = parse_color, default_value = "ffffff")]
    incoming_color: Color,

    /// Render the first word statically and skip the animation loop.
    /// Also honored via a non-empty REDUCED_MOTION environment variable.
    #[arg(long)]
    reduced_motion: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    ensure!(
        args.morph_secs.is_finite() && args.morph_secs > 0.0,
        "--morph-secs must be a positive number"
    );
    ensure!(
        args.cooldown_secs.is_finite() && args.cooldown_secs >= 0.0,
        "--cooldown-secs must be zero or positive"
    );
    ensure!(args.fps >= 1, "--fps must be at least 1");

    let defaults = MorphConfig::default();
    let animator = MorphConfig {
        words: if args.words.is_empty() {
            defaults.words
        } else {
            args.words.clone()
        },
        morph_duration: Duration::from_secs_f32(args.morph_secs),
        cooldown_time: Duration::from_secs_f32(args.cooldown_secs),
    }
    .build()
    .context("invalid animation config")?;

    let reduced_motion = args.reduced_motion || env_reduced_motion();

    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)?;

    let result = run(animator, &args, reduced_motion);

    disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

fn run(mut animator: Animator, args: &Args, reduced_motion: bool) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);

    if let Err(err) = surface_fits(area, animator.words()) {
        warn!(%err, "text slots do not fit the terminal, not starting");
        return Ok(());
    }

    if reduced_motion {
        let visual = animator.static_visual();
        terminal.draw(|f| {
            f.render_widget(
                MorphView::new(&visual).colors(args.outgoing_color, args.incoming_color),
                f.area(),
            )
        })?;

        return wait_for_quit();
    }

    let frame_interval = Duration::from_secs(1) / args.fps;
    let mut next_frame = Instant::now() + frame_interval;

    loop {
        let visual = animator.tick(Instant::now());
        terminal.draw(|f| {
            f.render_widget(
                MorphView::new(&visual).colors(args.outgoing_color, args.incoming_color),
                f.area(),
            )
        })?;

        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());

            if !event::poll(timeout)? {
                break;
            }

            if quit_requested(event::read()?) {
                return Ok(());
            }

            if Instant::now() >= next_frame {
                break;
            }
        }

        next_frame += frame_interval;

        // After a stall, restart the cadence instead of bursting
        // catch-up frames.
        if next_frame < Instant::now() {
            next_frame = Instant::now() + frame_interval;
        }
    }
}

fn wait_for_quit() -> anyhow::Result<()> {
    loop {
        if quit_requested(event::read()?) {
            return Ok(());
        }
    }
}

fn quit_requested(event: Event) -> bool {
    match event {
        Event::Key(key) => {
            key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        }
        _ => false,
    }
}

fn env_reduced_motion() -> bool {
    std::env::var_os("REDUCED_MOTION").is_some_and(|v| !v.is_empty())
}

fn parse_color(s: &str) -> Result<Color, String> {
    let hex = s.trim_start_matches('#');

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB hex color, got '{s}'"));
    }

    let channel = |range| u8::from_str_radix(&hex[range], 16).map_err(|e| e.to_string());

    Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hex_with_and_without_hash() {
        assert_eq!(parse_color("ff8000"), Ok(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color("#102030"), Ok(Color::Rgb(16, 32, 48)));
    }

    #[test]
    fn parse_color_rejects_malformed_input() {
        assert!(parse_color("fff").is_err());
        assert!(parse_color("not-hex").is_err());
        assert!(parse_color("ff80001").is_err());
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use glitchfolio::config::Config;
use glitchfolio::content::{GraphQlClient, HttpTransport};
use glitchfolio::render::label::CELL_W_PX;
use std::sync::Mutex;

fn main() -> Result<()> {
    let cfg = Config::parse();
    let level = cfg.log_level.as_tracing();

    if let Some(command) = cfg.content_command() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .init();
        let client = GraphQlClient::new(HttpTransport::new(cfg.endpoint.clone(), cfg.timeout()));
        let cols = crossterm::terminal::size().map(|(c, _)| c).unwrap_or(80);
        let viewport_px = (cols as f32 * CELL_W_PX) as u32;
        let mut out = std::io::stdout().lock();
        return glitchfolio::browse::run_command(&client, &command, viewport_px, &mut out);
    }

    // The session owns stderr's terminal, so logs only go to an explicit file.
    if let Some(path) = &cfg.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(level)
            .init();
    }

    glitchfolio::app::run(cfg)
}

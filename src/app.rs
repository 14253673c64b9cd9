use crate::config::{Config, RendererMode};
use crate::content::catalog::sort_categories;
use crate::content::{Category, ContentSource, GraphQlClient, HttpTransport, LoadState};
use crate::glitch::text::{GlitchTier, TextGlitch, TextGlitchProfile};
use crate::glitch::GlitchBackground;
use crate::render::label::glitch_labels;
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, KittyRenderer, Label, LabelStyle, Renderer};
use crate::terminal::TerminalGuard;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use fastrand::Rng;
use std::io::BufWriter;
use std::time::{Duration, Instant};

pub const TAGLINE: &str = "Digital Artist & Creator";
pub const SPECIALTIES: &str =
    "Specializing in generative art, experimental photography, and audiovisual performances.";

pub fn run(cfg: Config) -> anyhow::Result<()> {
    // Before raw mode, so a slow or failing CMS never leaves the terminal half set up.
    let nav = if cfg.no_nav {
        String::new()
    } else {
        let client = GraphQlClient::new(HttpTransport::new(cfg.endpoint.clone(), cfg.timeout()));
        match LoadState::from_result("categories", client.categories()) {
            LoadState::Ready(mut categories) => {
                sort_categories(&mut categories);
                nav_line(&categories)
            }
            _ => String::new(),
        }
    };

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Kitty => Box::new(KittyRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = renderer.cell_pixels();

    let mut last_size = TerminalGuard::size()?;
    let mut show_hud = cfg.hud;
    let mut show_help = false;
    let mut hud_rows = hud_rows_for_size(last_size, show_hud);

    let (w, h) = surface_size(last_size, hud_rows, px_w_mul, px_h_mul);
    let (mut background, mut label_rng) = match cfg.seed {
        Some(seed) => (
            GlitchBackground::with_seed(w, h, seed),
            Rng::with_seed(seed.wrapping_add(1)),
        ),
        None => (GlitchBackground::new(w, h), Rng::new()),
    };

    let start = Instant::now();
    let mut home = HomeScreen::new(&cfg.title, Duration::ZERO);
    tracing::info!(
        renderer = renderer.name(),
        cols = last_size.0,
        rows = last_size.1,
        "session started"
    );

    let mut last_frame = start;
    let mut fps = FpsCounter::new();

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    match handle_key(k.code, k.modifiers) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Spike => background.spike(),
                        KeyAction::ToggleHud => show_hud = !show_hud,
                        KeyAction::ToggleHelp => show_help = !show_help,
                        KeyAction::None => {}
                    }
                }
                Event::Resize(c, r) => last_size = (c, r),
                _ => {}
            }
        }

        // Resize events can be missed in some terminals.
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
        }

        let dt = now.duration_since(last_frame);
        last_frame = now;

        let (term_cols, term_rows) = last_size;
        let hud = if show_hud {
            build_hud(
                term_cols as usize,
                &nav,
                fps.fps(),
                background.state().intensity,
                background.state().bands.len(),
                renderer.name(),
            )
        } else {
            String::new()
        };
        hud_rows = hud_rows_for_text(term_rows, show_hud, &hud);
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let (w, h) = surface_size(last_size, hud_rows, px_w_mul, px_h_mul);
        background.resize(w, h);

        background.tick(dt);
        let clock = now.duration_since(start);
        home.advance(clock, &mut label_rng);
        let labels = home.labels(term_cols, visual_rows, &mut label_rng);

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: background.pixels(),
            labels: &labels,
            hud: &hud,
            hud_rows,
            overlay: show_help.then_some(help_popup_text()),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn surface_size(size: (u16, u16), hud_rows: u16, px_w_mul: usize, px_h_mul: usize) -> (usize, usize) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    (
        (cols as usize).saturating_mul(px_w_mul),
        (visual_rows as usize).saturating_mul(px_h_mul),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Spike,
    ToggleHud,
    ToggleHelp,
}

pub fn handle_key(code: KeyCode, mods: KeyModifiers) -> KeyAction {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return KeyAction::Quit;
    }
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char(' ') => KeyAction::Spike,
        KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::ToggleHud,
        KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ToggleHelp,
        _ => KeyAction::None,
    }
}

struct HomeLine {
    text: String,
    /// Row relative to the vertical center of the visual area.
    row_offset: i32,
    style: LabelStyle,
    glitch: TextGlitch,
}

/// The landing screen: the title and two taglines, each with its own glitch
/// timers. Dropping it cancels every timer.
pub struct HomeScreen {
    lines: Vec<HomeLine>,
}

impl HomeScreen {
    pub fn new(title: &str, now: Duration) -> Self {
        let line = |text: &str, row_offset, rgb, bold, profile| HomeLine {
            text: text.to_string(),
            row_offset,
            style: LabelStyle { rgb, bold },
            glitch: TextGlitch::new(profile, now),
        };
        let title = title.to_uppercase();
        Self {
            lines: vec![
                line(title.as_str(), -2, (255, 255, 255), true, TextGlitchProfile::title()),
                line(
                    TAGLINE,
                    0,
                    (204, 204, 204),
                    false,
                    TextGlitchProfile::text(GlitchTier::Medium),
                ),
                line(
                    SPECIALTIES,
                    2,
                    (153, 153, 153),
                    false,
                    TextGlitchProfile::text(GlitchTier::Low),
                ),
            ],
        }
    }

    pub fn glitches(&self) -> impl Iterator<Item = &TextGlitch> {
        self.lines.iter().map(|l| &l.glitch)
    }

    pub fn advance(&mut self, now: Duration, rng: &mut Rng) {
        for line in &mut self.lines {
            line.glitch.advance(now, rng);
        }
    }

    pub fn labels(&self, cols: u16, rows: u16, rng: &mut Rng) -> Vec<Label> {
        let center = rows as i32 / 2;
        let mut out = Vec::new();
        for line in &self.lines {
            let row = center + line.row_offset;
            if row < 0 || row >= rows as i32 {
                continue;
            }
            out.extend(glitch_labels(
                &line.text,
                row as u16,
                cols,
                rows,
                line.style,
                &line.glitch,
                rng,
            ));
        }
        out
    }
}

impl Drop for HomeScreen {
    fn drop(&mut self) {
        let bursts: u64 = self.lines.iter().map(|l| l.glitch.triggers()).sum();
        for line in &mut self.lines {
            line.glitch.cancel();
        }
        tracing::info!(bursts, "session ended");
    }
}

/// Category names in display order, for the HUD.
pub fn nav_line(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" · ")
}

fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    if !show_hud {
        return 0;
    }
    let rows = size.1;
    if rows <= 1 {
        return 0;
    }
    (rows - 1).min(3)
}

fn hud_rows_for_text(term_rows: u16, show_hud: bool, hud: &str) -> u16 {
    if !show_hud {
        return 0;
    }
    let max_rows = term_rows.saturating_sub(1);
    let wanted = hud.lines().count() as u16;
    wanted.min(max_rows)
}

pub fn build_hud(
    cols: usize,
    nav: &str,
    fps: f32,
    intensity: f32,
    bands: usize,
    renderer_name: &str,
) -> String {
    let mut logical_lines = Vec::new();
    if !nav.is_empty() {
        logical_lines.push(nav.to_string());
    }
    logical_lines.push(format!(
        "FPS: {fps:>4.1} | Int: {intensity:>4.2} | Bands: {bands} | Renderer: {renderer_name} | space glitch | h HUD | ? help | q quit"
    ));
    wrap_hud_lines(cols, &logical_lines).join("\n")
}

fn wrap_hud_lines(cols: usize, lines: &[String]) -> Vec<String> {
    let width = cols.max(1);
    let mut out = Vec::new();
    for line in lines {
        out.extend(hard_wrap_line(line, width));
    }
    out
}

fn hard_wrap_line(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn help_popup_text() -> &'static str {
    "Glitchfolio\n\
space  force a glitch spike\n\
h  show/hide HUD\n\
?  toggle this help\n\
q or esc  quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

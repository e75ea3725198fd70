use crate::assets::{save_screenshot, SourceLibrary};
use crate::blend::BlendMode;
use crate::buffer::{copy_region, PixelBuffer, Rect};
use crate::config::Config;
use crate::noise::NoiseField;
use crate::render::{Frame, HalfBlockRenderer};
use crate::rng::FastrandSource;
use crate::terminal::TerminalGuard;
use crate::visual::{PresetBank, RunState, Scheduler};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let sources = SourceLibrary::load(&cfg.images)
        .with_context(|| format!("loading images from {}", cfg.images.display()))?;
    let mut bank = PresetBank::new(sources)?;
    if select_preset(&cfg.preset, &mut bank).is_none() {
        bank.select("slit-scan");
    }

    let seed = cfg.seed.unwrap_or_else(|| fastrand::u64(..));
    let noise = NoiseField::new(seed as u32);
    let mut rng = FastrandSource::seeded(seed);

    let _term = TerminalGuard::enter()?;
    let mut out = BufWriter::new(std::io::stdout());
    let mut renderer = HalfBlockRenderer::new();

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut canvas = PixelBuffer::new(1, 1);
    let mut screen = PixelBuffer::new(1, 1);
    let mut scheduler = Scheduler::new();
    let mut show_hud = true;
    let mut note = String::new();
    let mut fps = FpsCounter::new();

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(
                        k.code,
                        k.modifiers,
                        &mut bank,
                        &mut scheduler,
                        &mut rng,
                        &mut show_hud,
                        &mut note,
                        &canvas,
                    ) {
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => {
                    last_size = (c, r);
                }
                _ => {}
            }
        }

        // Size check once per frame (resize events can be missed in some terminals).
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
        }

        if scheduler.should_draw() {
            let pacing = bank.draw(&mut canvas, &noise, &mut rng);
            scheduler.apply(pacing);
        }

        let (term_cols, term_rows) = last_size;
        let hud_rows: u16 = if show_hud && term_rows > 1 { 1 } else { 0 };
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let w = term_cols as u32;
        let h = visual_rows as u32 * 2;
        if screen.width() != w || screen.height() != h {
            screen = PixelBuffer::new(w, h);
        }
        copy_region(
            &canvas,
            Rect::new(0, 0, canvas.width() as i32, canvas.height() as i32),
            &mut screen,
            Rect::new(0, 0, w as i32, h as i32),
        );

        let hud = build_hud(&bank, &scheduler, fps.fps(), &note);
        let frame = Frame {
            term_cols,
            visual_rows,
            pixel_width: w as usize,
            pixel_height: h as usize,
            pixels_rgba: screen.pixels(),
            hud: &hud,
            hud_rows,
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

fn select_preset(preset: &Option<String>, bank: &mut PresetBank) -> Option<()> {
    let p = preset.as_deref()?.trim();
    if p.is_empty() {
        return None;
    }
    if let Ok(i) = p.parse::<usize>() {
        if i < bank.len() {
            let name = bank.names().nth(i)?;
            bank.select(name);
            return Some(());
        }
        return None;
    }
    let p_l = p.to_lowercase();
    let name = bank.names().find(|n| n.contains(&p_l))?;
    bank.select(name);
    Some(())
}

#[allow(clippy::too_many_arguments)]
fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    bank: &mut PresetBank,
    scheduler: &mut Scheduler,
    rng: &mut FastrandSource,
    show_hud: &mut bool,
    note: &mut String,
    canvas: &PixelBuffer,
) -> bool {
    match code {
        KeyCode::Char('c') if mods.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('w') => {
            // Paused presets get one frame of the newly selected preset.
            scheduler.request_frame();
            bank.select_previous();
        }
        KeyCode::Char('s') => {
            scheduler.request_frame();
            bank.select_next();
        }
        KeyCode::Char('r') => {
            scheduler.request_frame();
            bank.select_random(rng);
        }
        KeyCode::Char('h') => *show_hud = !*show_hud,
        KeyCode::Char(' ') => {
            bank.cycle_source(rng);
            scheduler.request_frame();
        }
        KeyCode::Enter => {
            // Screenshot failure must not kill the session.
            match save_screenshot(canvas, bank.active_name()) {
                Ok(path) => *note = format!("saved {}", path.display()),
                Err(e) => *note = format!("screenshot failed: {e:#}"),
            }
        }
        KeyCode::Char('b') => {
            let blend = BlendMode::pick(rng);
            bank.set_blend(rng, blend);
            *note = format!("blend {}", blend.label());
            scheduler.request_frame();
        }
        _ => {}
    }
    false
}

fn build_hud(bank: &PresetBank, scheduler: &Scheduler, fps: f32, note: &str) -> String {
    let blend = bank
        .active_blend()
        .map(|b| b.label())
        .unwrap_or("normal");
    let state = match scheduler.state() {
        RunState::Running => "running",
        RunState::Paused => "paused",
    };
    let mut hud = format!(
        "{} | blend {} | {} | {:.0} fps | w/s prev/next r random space img b blend enter shot h hud q quit",
        bank.active_name(),
        blend,
        state,
        fps
    );
    if !note.is_empty() {
        hud.push_str(" | ");
        hud.push_str(note);
    }
    hud
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

use scanmelt::assets::SourceLibrary;
use scanmelt::buffer::PixelBuffer;
use scanmelt::noise::NoiseField;
use scanmelt::rng::{FastrandSource, RandomSource};
use scanmelt::visual::{
    drift, FramePacing, PresetBank, PresetState, RunState, Scheduler, PRESET_ORDER,
};

/// Replays queued unit draws; integer draws fall back to the low bound.
struct ScriptedRng {
    units: Vec<f32>,
    at: usize,
}

impl ScriptedRng {
    fn new(units: Vec<f32>) -> Self {
        Self { units, at: 0 }
    }
}

impl RandomSource for ScriptedRng {
    fn int_in(&mut self, lo: i32, _hi: i32) -> i32 {
        lo
    }

    fn unit(&mut self) -> f32 {
        let v = *self.units.get(self.at).or_else(|| self.units.last()).unwrap_or(&0.0);
        self.at += 1;
        v
    }
}

fn small_sources(w: u32, h: u32) -> SourceLibrary {
    let mut a = PixelBuffer::new(w, h);
    a.fill(120, 40, 200);
    let mut b = PixelBuffer::new(w, h);
    b.fill(10, 220, 60);
    SourceLibrary::from_buffers(vec![a, b])
}

fn bank(w: u32, h: u32) -> PresetBank {
    PresetBank::new(small_sources(w, h)).unwrap()
}

fn has_non_black(buf: &PixelBuffer) -> bool {
    buf.pixels()
        .chunks_exact(4)
        .any(|px| px[0] != 0 || px[1] != 0 || px[2] != 0)
}

#[test]
fn bank_registers_presets_in_order() {
    let bank = bank(8, 8);
    let names: Vec<_> = bank.names().collect();
    assert_eq!(names, PRESET_ORDER.to_vec());
}

#[test]
fn empty_sources_are_rejected() {
    assert!(PresetBank::new(SourceLibrary::from_buffers(vec![])).is_err());
}

#[test]
fn next_then_previous_returns_to_start() {
    let mut bank = bank(8, 8);
    for start in 0..bank.len() {
        while bank.active_index() != start {
            bank.select_next();
        }
        bank.select_next();
        bank.select_previous();
        assert_eq!(bank.active_index(), start);
    }
}

#[test]
fn cycling_through_all_presets_wraps() {
    let mut bank = bank(8, 8);
    let start = bank.active_index();
    for _ in 0..bank.len() {
        bank.select_next();
    }
    assert_eq!(bank.active_index(), start);
}

#[test]
fn select_by_name_and_reject_unknown() {
    let mut bank = bank(8, 8);
    assert!(bank.select("melt"));
    assert_eq!(bank.active_name(), "melt");
    assert!(!bank.select("no-such-preset"));
    assert_eq!(bank.active_name(), "melt");
}

#[test]
fn state_is_created_lazily_and_survives_switching() {
    let mut bank = bank(8, 8);
    let noise = NoiseField::new(1);
    let mut rng = FastrandSource::seeded(1);
    let mut canvas = PixelBuffer::new(1, 1);

    assert!(bank.active_state().is_none());
    bank.draw(&mut canvas, &noise, &mut rng);
    assert!(bank.active_state().is_some());

    // Switching away and back keeps the state instance.
    bank.select_next();
    bank.select_previous();
    assert!(bank.active_state().is_some());
}

#[test]
fn draw_resizes_canvas_to_source_dimensions() {
    let mut bank = bank(12, 10);
    let noise = NoiseField::new(3);
    let mut rng = FastrandSource::seeded(3);
    let mut canvas = PixelBuffer::new(1, 1);

    bank.select("melt");
    bank.draw(&mut canvas, &noise, &mut rng);
    assert_eq!((canvas.width(), canvas.height()), (12, 10));
    assert!(has_non_black(&canvas));
}

#[test]
fn drift_pauses_after_each_frame_and_melt_runs_free() {
    let mut bank = bank(16, 40);
    let noise = NoiseField::new(5);
    let mut rng = FastrandSource::seeded(5);
    let mut canvas = PixelBuffer::new(1, 1);

    bank.select("drift");
    assert_eq!(
        bank.draw(&mut canvas, &noise, &mut rng),
        FramePacing::PauseAfterFrame
    );

    bank.select("melt");
    assert_eq!(
        bank.draw(&mut canvas, &noise, &mut rng),
        FramePacing::Continuous
    );
}

#[test]
fn stale_bands_reuse_the_previous_source_rect() {
    let noise = NoiseField::new(11);
    // Unit draws of 0.0 never pass the freshness coin flip, so every band
    // after the first reuses the first band's source.
    let mut rng = ScriptedRng::new(vec![0.0]);
    let plans = drift::band_sweep(64, 40, 64, &noise, 0.0, &mut rng);

    assert_eq!(plans.len(), 4);
    assert!(plans[0].fresh);
    for (i, plan) in plans.iter().enumerate().skip(1) {
        assert!(!plan.fresh, "band {i} unexpectedly fresh");
        assert_eq!(plan.src, plans[0].src, "band {i} source moved");
    }
    // Destinations keep advancing even while the source is stuck.
    for (i, plan) in plans.iter().enumerate() {
        assert_eq!(plan.dest.y, i as i32 * 10);
    }
}

#[test]
fn fresh_bands_recompute_their_source() {
    let noise = NoiseField::new(11);
    let mut rng = ScriptedRng::new(vec![1.0]);
    let plans = drift::band_sweep(64, 40, 64, &noise, 0.0, &mut rng);
    for (i, plan) in plans.iter().enumerate() {
        assert!(plan.fresh, "band {i}");
        assert_eq!(plan.src.y, (i as i32 + 1) * 10);
        assert_eq!(plan.src.height, (i as i32 + 1) * 10);
    }
}

#[test]
fn slit_scan_wraps_and_clears_after_a_full_sweep() {
    let mut bank = bank(4, 6);
    let noise = NoiseField::new(2);
    let mut rng = FastrandSource::seeded(2);
    let mut canvas = PixelBuffer::new(1, 1);

    bank.select("slit-scan");
    for _ in 0..7 {
        bank.draw(&mut canvas, &noise, &mut rng);
    }

    let Some(PresetState::Echo(state)) = bank.active_state() else {
        panic!("slit-scan state missing");
    };
    assert_eq!(state.scan_line, 0);
    assert!(!has_non_black(&state.echo));
    assert!(!has_non_black(&canvas));
}

#[test]
fn slit_scan_accumulates_before_the_wrap() {
    let mut bank = bank(4, 6);
    let noise = NoiseField::new(2);
    let mut rng = FastrandSource::seeded(2);
    let mut canvas = PixelBuffer::new(1, 1);

    bank.select("slit-scan");
    bank.draw(&mut canvas, &noise, &mut rng);
    let Some(PresetState::Echo(state)) = bank.active_state() else {
        panic!("slit-scan state missing");
    };
    assert_eq!(state.scan_line, 1);
    assert!(has_non_black(&canvas));
}

#[test]
fn cycling_sources_restarts_the_slit_scan_accumulator() {
    let mut bank = bank(4, 6);
    let noise = NoiseField::new(2);
    let mut rng = FastrandSource::seeded(2);
    let mut canvas = PixelBuffer::new(1, 1);

    bank.select("slit-scan");
    for _ in 0..3 {
        bank.draw(&mut canvas, &noise, &mut rng);
    }
    let before = match bank.active_state() {
        Some(PresetState::Echo(s)) => s.image,
        _ => panic!("slit-scan state missing"),
    };

    bank.cycle_source(&mut rng);

    let Some(PresetState::Echo(state)) = bank.active_state() else {
        panic!("slit-scan state missing");
    };
    assert_eq!(state.image, (before + 1) % 2);
    assert_eq!(state.scan_line, 0);
    assert_eq!(state.canvas_y, 0);
    assert!(!has_non_black(&state.echo));
}

#[test]
fn scheduler_paused_grants_one_frame_per_request() {
    let mut s = Scheduler::new();
    assert_eq!(s.state(), RunState::Running);
    assert!(s.should_draw());

    s.pause();
    assert_eq!(s.state(), RunState::Paused);
    assert!(!s.should_draw());

    s.request_frame();
    assert!(s.should_draw());
    assert!(!s.should_draw());

    s.resume();
    assert!(s.should_draw());
}

#[test]
fn melt_keeps_rendering_after_a_drift_pause() {
    let mut bank = bank(16, 40);
    let noise = NoiseField::new(8);
    let mut rng = FastrandSource::seeded(8);
    let mut canvas = PixelBuffer::new(1, 1);
    let mut scheduler = Scheduler::new();

    // Drift renders one frame and suspends the loop.
    bank.select("drift");
    assert!(scheduler.should_draw());
    let pacing = bank.draw(&mut canvas, &noise, &mut rng);
    scheduler.apply(pacing);
    assert_eq!(scheduler.state(), RunState::Paused);

    // Switching presets grants one frame; a continuous preset must then
    // take the loop out of the pause for good.
    scheduler.request_frame();
    bank.select_next();
    assert_eq!(bank.active_name(), "melt");

    let mut drawn = 0;
    for _ in 0..5 {
        if scheduler.should_draw() {
            let pacing = bank.draw(&mut canvas, &noise, &mut rng);
            scheduler.apply(pacing);
            drawn += 1;
        }
    }
    assert_eq!(drawn, 5, "melt froze after {drawn} frame(s)");
    assert_eq!(scheduler.state(), RunState::Running);
}

#[test]
fn pause_after_frame_pacing_pauses_the_scheduler() {
    let mut s = Scheduler::new();
    s.apply(FramePacing::Continuous);
    assert_eq!(s.state(), RunState::Running);
    s.apply(FramePacing::PauseAfterFrame);
    assert_eq!(s.state(), RunState::Paused);
}

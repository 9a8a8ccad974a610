use crate::audio::{AudioSystem, SharedSpectrum, SPECTRUM_LEN};
use crate::config::{AudioSource, Config, RendererMode};
use crate::engine::{MotifEngine, RenderCtx};
use crate::levels::{self, BandLevels, LevelExtractor};
use crate::params::ParameterState;
use crate::presets::{make_presets, select_preset, NamedPreset};
use crate::render::{AsciiRenderer, BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::terminal::TerminalGuard;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Braille => Box::new(BrailleRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = match cfg.renderer {
        RendererMode::HalfBlock => (1usize, 2usize),
        RendererMode::Braille => (2usize, 4usize),
        RendererMode::Ascii => (1usize, 1usize),
    };

    // Audio is optional; without it the extractor smooths toward silence.
    let audio = match cfg.source {
        AudioSource::Mic => Some(
            AudioSystem::new_mic(cfg.device.as_deref())
                .with_context(|| format!("start audio (source={:?})", cfg.source))?,
        ),
        AudioSource::None => None,
    };
    let spectrum: Option<Arc<SharedSpectrum>> = audio.as_ref().map(|a| a.spectrum());

    let presets = make_presets();
    let mut active_preset = select_preset(&cfg.preset, &presets);
    let mut params = active_preset
        .map(|i| presets[i].state)
        .unwrap_or_default()
        .clamped();

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut engine = MotifEngine::new();
    let mut extractor = LevelExtractor::new();
    let mut spectrum_buf = [0u8; SPECTRUM_LEN];

    let mut paused = false;
    let mut show_hud = true;
    let mut show_help = false;
    let mut hud_rows: u16 = if show_hud { 2 } else { 0 };

    // Animation clock; advances only while playing, so pausing freezes the
    // time base and resuming continues without a jump.
    let mut anim_t = 0.0f32;
    let mut last_frame = Instant::now();

    let mut fps = FpsCounter::new();
    let mut tuning = AdaptiveScale::new();

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    let action = handle_key(k.code, k.modifiers);
                    match action {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::TogglePause => paused = !paused,
                        KeyAction::ToggleHud => {
                            show_hud = !show_hud;
                            hud_rows = if show_hud { 2 } else { 0 };
                        }
                        KeyAction::ToggleHelp => show_help = !show_help,
                        KeyAction::Randomize => {
                            params = ParameterState::randomized();
                            active_preset = None;
                        }
                        KeyAction::Preset(i) => {
                            if let Some(p) = presets.get(i) {
                                // Atomic replacement, never a merge.
                                params = p.state.clamped();
                                active_preset = Some(i);
                            }
                        }
                        KeyAction::Edit(edit) => {
                            params = apply_edit(params, edit);
                            active_preset = None;
                        }
                        KeyAction::None => {}
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

        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;
        if !paused {
            anim_t += dt;
        }

        // Level extraction runs every tick, paused or not, so audio state
        // stays warm across a pause.
        let inst = if let Some(spec) = spectrum.as_ref() {
            spec.load_into(&mut spectrum_buf);
            levels::instantaneous(&spectrum_buf)
        } else {
            BandLevels::default()
        };
        let band_levels = extractor.update(inst, params.reactive_gain);

        if !paused {
            let (term_cols, term_rows) = last_size;
            let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
            let w = (term_cols as usize).saturating_mul(px_w_mul);
            let h = (visual_rows as usize).saturating_mul(px_h_mul);

            let ctx = RenderCtx {
                t: anim_t,
                w,
                h,
                params,
                levels: band_levels,
                scale: tuning.scale(),
            };
            let pixels = engine.render(&ctx);

            let hud = if show_hud {
                build_hud(
                    &presets,
                    active_preset,
                    &params,
                    &band_levels,
                    fps.fps(),
                    renderer.name(),
                    paused,
                )
            } else {
                String::new()
            };

            let frame = Frame {
                term_cols,
                term_rows,
                visual_rows,
                pixel_width: w,
                pixel_height: h,
                pixels_rgba: pixels,
                hud: &hud,
                hud_rows,
                overlay: show_help.then(help_popup_text),
                sync_updates: cfg.sync_updates,
            };
            renderer.render(&frame, &mut out)?;
        }

        fps.tick();
        let total_ms = now.elapsed().as_secs_f32() * 1000.0;
        tuning.update(total_ms, 1000.0 / cfg.fps.max(1) as f32);

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum ParamEdit {
    Motif,
    Arrangement,
    Palette,
    Instances(i32),
    Folds(i32),
    Speed(f32),
}

#[derive(Clone, Copy, Debug)]
enum KeyAction {
    None,
    Quit,
    TogglePause,
    ToggleHud,
    ToggleHelp,
    Randomize,
    Preset(usize),
    Edit(ParamEdit),
}

fn handle_key(code: KeyCode, mods: KeyModifiers) -> KeyAction {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return KeyAction::Quit;
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char(' ') => KeyAction::TogglePause,
        KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::ToggleHud,
        KeyCode::Char('?') => KeyAction::ToggleHelp,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Randomize,
        KeyCode::Char(c @ '1'..='6') => KeyAction::Preset(c as usize - '1' as usize),
        KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::Edit(ParamEdit::Motif),
        KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Edit(ParamEdit::Arrangement),
        KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Edit(ParamEdit::Palette),
        KeyCode::Up => KeyAction::Edit(ParamEdit::Instances(4)),
        KeyCode::Down => KeyAction::Edit(ParamEdit::Instances(-4)),
        KeyCode::Right => KeyAction::Edit(ParamEdit::Folds(1)),
        KeyCode::Left => KeyAction::Edit(ParamEdit::Folds(-1)),
        KeyCode::Char(']') => KeyAction::Edit(ParamEdit::Speed(0.05)),
        KeyCode::Char('[') => KeyAction::Edit(ParamEdit::Speed(-0.05)),
        _ => KeyAction::None,
    }
}

/// Every edit produces a fresh clamped snapshot; nothing mutates in place.
fn apply_edit(p: ParameterState, edit: ParamEdit) -> ParameterState {
    let next = match edit {
        ParamEdit::Motif => ParameterState {
            motif: p.motif.next(),
            ..p
        },
        ParamEdit::Arrangement => ParameterState {
            arrangement: p.arrangement.next(),
            ..p
        },
        ParamEdit::Palette => ParameterState {
            palette: p.palette.next(),
            ..p
        },
        ParamEdit::Instances(d) => ParameterState {
            instance_count: p.instance_count.saturating_add_signed(d),
            ..p
        },
        ParamEdit::Folds(d) => ParameterState {
            folds: p.folds.saturating_add_signed(d),
            ..p
        },
        ParamEdit::Speed(d) => ParameterState {
            speed: p.speed + d,
            ..p
        },
    };
    next.clamped()
}

fn build_hud(
    presets: &[NamedPreset],
    active_preset: Option<usize>,
    params: &ParameterState,
    levels: &BandLevels,
    fps: f32,
    renderer: &str,
    paused: bool,
) -> String {
    let preset_name = active_preset
        .and_then(|i| presets.get(i))
        .map(|p| p.name)
        .unwrap_or("Custom");

    let line1 = format!(
        "[{}]{} {} / {} / {}  folds {}  iter {}  n {}",
        preset_name,
        if paused { " (paused)" } else { "" },
        params.motif.label(),
        params.arrangement.label(),
        params.palette.label(),
        params.folds,
        params.iterations,
        params.instance_count,
    );
    let line2 = format!(
        "lo {:.2} mid {:.2} hi {:.2} all {:.2}  speed {:.2} warp {:.2}  {} {:.0}fps  ? help",
        levels.low,
        levels.mid,
        levels.high,
        levels.overall,
        params.speed,
        params.warp,
        renderer,
        fps,
    );
    format!("{line1}\n{line2}")
}

fn help_popup_text() -> &'static str {
    "Motif Visualizer\n\
     \n\
     Space      pause / resume\n\
     r          randomize parameters\n\
     1..6       apply preset\n\
     m / a / p  cycle motif / arrangement / palette\n\
     Up/Down    instance count\n\
     Left/Right kaleidoscope folds\n\
     [ / ]      speed\n\
     h          toggle HUD\n\
     ?          toggle this help\n\
     q / Esc    quit"
}

struct FpsCounter {
    frames: u32,
    window_start: Instant,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            window_start: Instant::now(),
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let dt = self.window_start.elapsed().as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.window_start = Instant::now();
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

/// Coarse adaptive downscale: grow the block size when frames keep missing
/// the budget, shrink it back slowly once there is ample headroom.
struct AdaptiveScale {
    scale: usize,
    over: u32,
    under: u32,
}

impl AdaptiveScale {
    fn new() -> Self {
        Self {
            scale: 1,
            over: 0,
            under: 0,
        }
    }

    fn scale(&self) -> usize {
        self.scale
    }

    fn update(&mut self, frame_ms: f32, budget_ms: f32) {
        if frame_ms > budget_ms * 1.2 {
            self.over += 1;
            self.under = 0;
            if self.over >= 8 && self.scale < 4 {
                self.scale += 1;
                self.over = 0;
            }
        } else if frame_ms < budget_ms * 0.45 && self.scale > 1 {
            self.under += 1;
            self.over = 0;
            if self.under >= 120 {
                self.scale -= 1;
                self.under = 0;
            }
        } else {
            self.over = 0;
            self.under = 0;
        }
    }
}

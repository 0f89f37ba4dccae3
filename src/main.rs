/// Entry point and frame loop.

mod app;
mod config;
mod engine;
mod grid;
mod ui;

use std::time::{Duration, Instant};

use crossterm::terminal;

use app::{App, Screen};
use config::GameConfig;
use engine::ffi::NativeEngine;
use ui::assets::AssetStore;
use ui::audio::{AudioDirector, SoundEngine};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::{hit_test, key_action, HitContext, Layout};

fn main() {
    let config = GameConfig::load();

    // The native simulation is not optional: without the library there
    // is nothing to present, so fail fast before touching the terminal.
    let sim = match NativeEngine::load(&config.engine_lib) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: could not load engine library '{}': {e}", config.engine_lib);
            std::process::exit(1);
        }
    };

    let mut application = App::new(sim, &config, AudioDirector::new());
    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let mut assets = AssetStore::standard();

    let result = frame_loop(&mut application, &mut renderer, sound, &mut assets, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    // Report asset gaps once, after the terminal is back to normal.
    let missing: Vec<&str> = assets.missing_report().collect();
    if !missing.is_empty() {
        eprintln!("Missing sprites (drawn as placeholders):");
        for key in missing {
            eprintln!("  {key}");
        }
    }
}

fn frame_loop(
    app: &mut App<NativeEngine>,
    renderer: &mut Renderer,
    mut sound: Option<SoundEngine>,
    assets: &mut AssetStore,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let frame_budget = Duration::from_secs_f64(1.0 / config.target_fps as f64);
    let started = Instant::now();
    let mut last_frame = Instant::now();

    loop {
        input.drain_events();
        if input.ctrl_c_pressed() {
            break;
        }

        let now_ms = started.elapsed().as_millis() as u64;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let layout = Layout::new(tw, th);
        let ctx = HitContext {
            plants_count: app.record.plants_count,
            shovel_unlocked: app.shovel_unlocked,
            map_w: app.session.map_w,
            map_h: app.session.map_h,
        };

        for &key in input.pressed_keys() {
            if let Some(action) = key_action(app.screen, key) {
                app.apply(action, now_ms);
            }
        }
        if input.right_clicked {
            app.apply(app::UiAction::CancelDig, now_ms);
        }
        for &(cx, cy) in &input.clicks {
            if let Some(action) = hit_test(&layout, app.screen, &ctx, &app.geom, cx, cy) {
                app.apply(action, now_ms);
            }
        }
        if app.quit_requested {
            break;
        }

        // Right-hand side of the clock: a capped, measured dt keeps the
        // simulation stable across stalls.
        let dt = last_frame.elapsed().as_secs_f32().min(0.1);
        last_frame = Instant::now();
        app.tick(dt, now_ms);

        let out = app.take_output();
        if let Some(engine) = sound.as_mut() {
            if !app.director.muted {
                for cue in &out.cues {
                    engine.play(*cue);
                }
            }
            if let Some(track) = out.music {
                engine.start_music(track, app.director.music_muted);
            }
            if out.pause_music {
                engine.pause_music();
            }
            if out.resume_music {
                engine.resume_music();
            }
        }

        // The pause screen keeps rendering the frozen lawn underneath,
        // so it redraws like any other screen.
        let pointer = if app.screen == Screen::InGame { input.pointer } else { None };
        renderer.render(app, assets, &layout, pointer, started.elapsed().as_secs_f64())?;

        let elapsed = last_frame.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    Ok(())
}

//! nothing: a small 2D platformer
//!
//! Levels are plain text files. Boxes float in lava, goals mark
//! checkpoints, regions fire script commands, and a console lets you type
//! those commands yourself.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod game;
mod input;
mod math;
mod script;
mod system;

use std::path::{Path, PathBuf};

use macroquad::prelude::*;

use config::{GameConfig, DEFAULT_CONFIG_PATH};
use game::level_folder::discover_levels;
use game::{Camera, Console, Level, LevelPicker, MacroquadCanvas, MacroquadSounds, CONSOLE_TOGGLE_KEY};
use input::{InputEvent, InputSnapshot, InputState};

/// First command line argument, or `game.ron`
fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn window_conf() -> Conf {
    // Errors are reported once logging is up, in main.
    let config = GameConfig::load(&config_path()).unwrap_or_default();
    Conf {
        window_title: format!("nothing v{}", VERSION),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
        previous(info);
    }));
}

enum Screen {
    Picker(LevelPicker),
    Running(Level),
}

fn picker_screen(config: &GameConfig) -> Screen {
    Screen::Picker(LevelPicker::new(discover_levels(&config.levels_dir)))
}

fn level_screen(path: &Path, config: &GameConfig) -> Screen {
    match Level::from_file(path) {
        Ok(level) => Screen::Running(level),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not load level");
            picker_screen(config)
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    init_tracing();

    let config = match GameConfig::load(&config_path()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "bad config, using defaults");
            GameConfig::default()
        }
    };
    let gravity = math::vec2(0.0, config.gravity);

    let mut camera = Camera::new(Box::new(MacroquadCanvas));
    let mut sounds = MacroquadSounds::load(&config.sounds_dir).await;
    let mut input = InputState::new();
    let mut console = Console::new();
    let mut cursor_grabbed = false;

    let mut screen = match &config.start_level {
        Some(path) => level_screen(path, &config),
        None => picker_screen(&config),
    };

    loop {
        let delta_time = get_frame_time().min(config.max_delta_time);
        let events = input.poll();
        let snapshot = input.snapshot();
        let typed: Vec<char> = std::iter::from_fn(get_char_pressed).collect();
        let mut next_screen = None;

        clear_background(BLACK);

        match &mut screen {
            Screen::Picker(picker) => {
                for event in &events {
                    if let Some(path) = picker.event(event) {
                        next_screen = Some(level_screen(&path, &config));
                    }
                }
                if is_mouse_button_pressed(MouseButton::Left) {
                    let (x, y) = mouse_position();
                    if let Some(path) = picker.click(math::vec2(x, y), camera.viewport()) {
                        next_screen = Some(level_screen(&path, &config));
                    }
                }

                if delta_time > 0.0 {
                    picker.update(delta_time);
                }
                picker.enter_camera_event(&mut camera);
                if let Err(e) = picker.render(&mut camera) {
                    tracing::error!(error = %e, "picker render failed");
                }
            }

            Screen::Running(level) => {
                for c in typed {
                    console.type_char(c);
                }

                for event in &events {
                    if *event == InputEvent::KeyDown(CONSOLE_TOGGLE_KEY) {
                        console.toggle();
                        continue;
                    }
                    if console.event(event, level) {
                        continue;
                    }
                    match event {
                        InputEvent::KeyDown(KeyCode::F5) => {
                            if let Err(e) = level.reload_preserve_player() {
                                tracing::error!(error = %e, "soft reload failed, keeping the current level");
                            }
                        }
                        InputEvent::KeyDown(KeyCode::F6) => {
                            tracing::info!(path = %level.file_name().display(), "Full reload");
                            match Level::from_file(level.file_name()) {
                                Ok(reloaded) => *level = reloaded,
                                Err(e) => tracing::error!(error = %e, "full reload failed, keeping the current level"),
                            }
                        }
                        InputEvent::KeyDown(KeyCode::F1) => {
                            level.toggle_debug_mode();
                            camera.toggle_debug_mode();
                        }
                        InputEvent::KeyDown(KeyCode::Escape) => {
                            next_screen = Some(picker_screen(&config));
                        }
                        _ => {
                            if let Err(e) = level.event(event) {
                                tracing::error!(error = %e, "event handling failed");
                            }
                        }
                    }
                }

                let held = if console.is_enabled() {
                    InputSnapshot::default()
                } else {
                    snapshot
                };
                if let Err(e) = level.input(&held) {
                    tracing::error!(error = %e, "input handling failed");
                }

                if delta_time > 0.0 {
                    if let Err(e) = level.update(delta_time, gravity) {
                        tracing::error!(error = %e, "level update failed, frame skipped");
                    }
                }

                if let Err(e) = level.enter_camera_event(&mut camera) {
                    tracing::error!(error = %e, "camera update failed");
                }
                if let Err(e) = level.render(&mut camera) {
                    tracing::error!(error = %e, "level render failed");
                }
                console.render(&mut camera);
                level.sound(&mut sounds);

                if level.flying_mode() != cursor_grabbed {
                    cursor_grabbed = level.flying_mode();
                    set_cursor_grab(cursor_grabbed);
                    show_mouse(!cursor_grabbed);
                }
            }
        }

        if let Some(screen_after) = next_screen {
            screen = screen_after;
            if cursor_grabbed {
                cursor_grabbed = false;
                set_cursor_grab(false);
                show_mouse(true);
            }
        }

        next_frame().await;
    }
}

//! Level picker
//!
//! Title screen with a slowly drifting background and a vertical list of
//! the discovered levels. Keyboard, gamepad or mouse picks one.

use std::path::PathBuf;

use macroquad::input::KeyCode;

use crate::game::camera::Camera;
use crate::game::level::{Background, LevelError};
use crate::game::level_folder::LevelInfo;
use crate::input::{button, InputEvent};
use crate::math::{rgba, vec2, Color, Rect, Vec2};

const PICKER_BACKGROUND: Color = rgba(7.0 / 255.0, 54.0 / 255.0, 66.0 / 255.0, 1.0);
const HIGHLIGHT: Color = rgba(1.0, 1.0, 1.0, 0.15);
const TEXT_COLOR: Color = Color::WHITE;

const TITLE: &str = "Select Level";
const TITLE_SIZE: f32 = 64.0;
const TITLE_MARGIN_TOP: f32 = 100.0;
const TITLE_MARGIN_BOTTOM: f32 = 60.0;
const ITEM_WIDTH: f32 = 400.0;
const ITEM_HEIGHT: f32 = 50.0;
const ITEM_FONT_SIZE: f32 = 36.0;
/// Background scroll speed in pixels per second
const DRIFT_SPEED: f32 = 50.0;

pub struct LevelPicker {
    background: Background,
    camera_position: Vec2,
    levels: Vec<LevelInfo>,
    cursor: usize,
}

impl LevelPicker {
    pub fn new(levels: Vec<LevelInfo>) -> Self {
        Self {
            background: Background::new(PICKER_BACKGROUND),
            camera_position: Vec2::ZERO,
            levels,
            cursor: 0,
        }
    }

    pub fn levels(&self) -> &[LevelInfo] {
        &self.levels
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn update(&mut self, delta_time: f32) {
        self.camera_position.x += DRIFT_SPEED * delta_time;
    }

    pub fn enter_camera_event(&self, camera: &mut Camera) {
        camera.center_at(self.camera_position);
        camera.set_scale(1.0);
    }

    fn selected_path(&self) -> Option<PathBuf> {
        self.levels.get(self.cursor).map(|l| l.path.clone())
    }

    /// Move the cursor, or return the chosen level's path.
    pub fn event(&mut self, event: &InputEvent) -> Option<PathBuf> {
        match *event {
            InputEvent::KeyDown(KeyCode::Up) | InputEvent::KeyDown(KeyCode::W) => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            InputEvent::KeyDown(KeyCode::Down) | InputEvent::KeyDown(KeyCode::S) => {
                if self.cursor + 1 < self.levels.len() {
                    self.cursor += 1;
                }
                None
            }
            InputEvent::KeyDown(KeyCode::Enter)
            | InputEvent::KeyDown(KeyCode::KpEnter)
            | InputEvent::KeyDown(KeyCode::Space)
            | InputEvent::JoyButtonDown(button::A) => self.selected_path(),
            _ => None,
        }
    }

    fn item_rect(&self, index: usize, viewport: Vec2) -> Rect {
        let top = TITLE_MARGIN_TOP + TITLE_SIZE + TITLE_MARGIN_BOTTOM;
        Rect::new(
            viewport.x * 0.5 - ITEM_WIDTH * 0.5,
            top + index as f32 * ITEM_HEIGHT,
            ITEM_WIDTH,
            ITEM_HEIGHT,
        )
    }

    /// Mouse click at a screen position
    pub fn click(&mut self, point: Vec2, viewport: Vec2) -> Option<PathBuf> {
        let index = (0..self.levels.len()).find(|&i| self.item_rect(i, viewport).contains_point(point))?;
        self.cursor = index;
        self.selected_path()
    }

    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        self.background.render(camera)?;

        let viewport = camera.viewport();
        camera.draw_screen_text(
            TITLE,
            vec2(viewport.x * 0.5 - ITEM_WIDTH * 0.5, TITLE_MARGIN_TOP + TITLE_SIZE),
            TITLE_SIZE,
            TEXT_COLOR,
        );

        if self.levels.is_empty() {
            let rect = self.item_rect(0, viewport);
            camera.draw_screen_text("No levels found", vec2(rect.x, rect.y + ITEM_FONT_SIZE), ITEM_FONT_SIZE, TEXT_COLOR);
            return Ok(());
        }

        camera.fill_screen_rect(self.item_rect(self.cursor, viewport), HIGHLIGHT);
        for (i, level) in self.levels.iter().enumerate() {
            let rect = self.item_rect(i, viewport);
            camera.draw_screen_text(&level.name, vec2(rect.x + 10.0, rect.y + ITEM_FONT_SIZE), ITEM_FONT_SIZE, TEXT_COLOR);
        }
        Ok(())
    }
}

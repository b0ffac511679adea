//! 2D Camera
//!
//! Maps world coordinates onto the screen and forwards draw calls to a
//! `Canvas` backend. Game code only ever draws in world space through the
//! camera; the backend only ever sees screen space.

use crate::math::{vec2, Color, Rect, Vec2};

/// Drawing backend in screen coordinates
pub trait Canvas {
    /// Screen size in pixels
    fn viewport(&self) -> Vec2;
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color);
}

pub struct Camera {
    /// World point shown at the center of the screen
    position: Vec2,
    scale: f32,
    debug_mode: bool,
    canvas: Box<dyn Canvas>,
}

impl Camera {
    pub fn new(canvas: Box<dyn Canvas>) -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
            debug_mode: false,
            canvas,
        }
    }

    pub fn center_at(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.01);
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn toggle_debug_mode(&mut self) {
        self.debug_mode = !self.debug_mode;
    }

    pub fn viewport(&self) -> Vec2 {
        self.canvas.viewport()
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        let half = self.viewport() * 0.5;
        (p - self.position) * self.scale + half
    }

    pub fn to_world(&self, p: Vec2) -> Vec2 {
        let half = self.viewport() * 0.5;
        (p - half) * (1.0 / self.scale) + self.position
    }

    fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_vecs(self.to_screen(rect.position()), rect.size() * self.scale)
    }

    /// The part of the world currently on screen
    pub fn view_rect(&self) -> Rect {
        let top_left = self.to_world(Vec2::ZERO);
        let bottom_right = self.to_world(self.viewport());
        Rect::from_vecs(top_left, bottom_right - top_left)
    }

    pub fn is_point_visible(&self, p: Vec2) -> bool {
        self.view_rect().contains_point(p)
    }

    pub fn is_rect_visible(&self, rect: Rect) -> bool {
        self.view_rect().overlaps(&rect)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let screen = self.rect_to_screen(rect);
        self.canvas.fill_rect(screen, color);
    }

    pub fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        let screen = self.rect_to_screen(rect);
        self.canvas.draw_rect(screen, thickness, color);
    }

    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        let (a, b, c) = (self.to_screen(a), self.to_screen(b), self.to_screen(c));
        self.canvas.fill_triangle(a, b, c, color);
    }

    pub fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let screen = self.to_screen(position);
        self.canvas.draw_text(text, screen, size * self.scale, color);
    }

    /// Fill the whole screen, ignoring the camera transform
    pub fn fill_screen(&mut self, color: Color) {
        let viewport = self.viewport();
        self.fill_screen_rect(Rect::new(0.0, 0.0, viewport.x, viewport.y), color);
    }

    pub fn fill_screen_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.fill_rect(rect, color);
    }

    /// Screen-space text, for overlays that do not move with the world
    pub fn draw_screen_text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        self.canvas.draw_text(text, position, size, color);
    }
}

// =============================================================================
// Macroquad backend
// =============================================================================

pub struct MacroquadCanvas;

impl Canvas for MacroquadCanvas {
    fn viewport(&self) -> Vec2 {
        vec2(macroquad::window::screen_width(), macroquad::window::screen_height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        macroquad::shapes::draw_rectangle(rect.x, rect.y, rect.w, rect.h, color.into());
    }

    fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        macroquad::shapes::draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, thickness, color.into());
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        use macroquad::math::vec2 as mq_vec2;
        macroquad::shapes::draw_triangle(
            mq_vec2(a.x, a.y),
            mq_vec2(b.x, b.y),
            mq_vec2(c.x, c.y),
            color.into(),
        );
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        macroquad::text::draw_text(text, position.x, position.y, size, color.into());
    }
}

// =============================================================================
// Recording backend for tests
// =============================================================================

#[cfg(test)]
pub mod recording {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        FillRect(Rect, Color),
        DrawRect(Rect, Color),
        Triangle(Color),
        Text(String, Color),
    }

    /// Canvas that logs every call into a shared list
    #[derive(Clone, Default)]
    pub struct RecordingCanvas {
        pub calls: Rc<RefCell<Vec<DrawCall>>>,
    }

    impl Canvas for RecordingCanvas {
        fn viewport(&self) -> Vec2 {
            vec2(800.0, 600.0)
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.calls.borrow_mut().push(DrawCall::FillRect(rect, color));
        }

        fn draw_rect(&mut self, rect: Rect, _thickness: f32, color: Color) {
            self.calls.borrow_mut().push(DrawCall::DrawRect(rect, color));
        }

        fn fill_triangle(&mut self, _a: Vec2, _b: Vec2, _c: Vec2, color: Color) {
            self.calls.borrow_mut().push(DrawCall::Triangle(color));
        }

        fn draw_text(&mut self, text: &str, _position: Vec2, _size: f32, color: Color) {
            self.calls.borrow_mut().push(DrawCall::Text(text.to_string(), color));
        }
    }

    /// Camera centered so that world coordinates equal screen coordinates
    pub fn recording_camera() -> (Camera, Rc<RefCell<Vec<DrawCall>>>) {
        let canvas = RecordingCanvas::default();
        let calls = canvas.calls.clone();
        let mut camera = Camera::new(Box::new(canvas));
        camera.center_at(vec2(400.0, 300.0));
        (camera, calls)
    }
}

#[cfg(test)]
mod tests {
    use super::recording::*;
    use super::*;

    #[test]
    fn test_identity_transform() {
        let (camera, _) = recording_camera();
        assert_eq!(camera.to_screen(vec2(10.0, 20.0)), vec2(10.0, 20.0));
        assert_eq!(camera.view_rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_scale_zooms_around_center() {
        let (mut camera, _) = recording_camera();
        camera.set_scale(2.0);
        assert_eq!(camera.to_screen(vec2(400.0, 300.0)), vec2(400.0, 300.0));
        assert_eq!(camera.to_screen(vec2(410.0, 300.0)), vec2(420.0, 300.0));
        assert_eq!(camera.view_rect(), Rect::new(200.0, 150.0, 400.0, 300.0));
        let p = vec2(123.0, 45.0);
        let back = camera.to_world(camera.to_screen(p));
        assert!((back - p).magnitude() < 1e-3);
    }

    #[test]
    fn test_fill_rect_is_transformed() {
        let (mut camera, calls) = recording_camera();
        camera.center_at(vec2(410.0, 300.0));
        camera.fill_rect(Rect::new(10.0, 10.0, 5.0, 5.0), Color::WHITE);
        assert_eq!(
            calls.borrow()[0],
            DrawCall::FillRect(Rect::new(0.0, 10.0, 5.0, 5.0), Color::WHITE)
        );
    }

    #[test]
    fn test_visibility() {
        let (camera, _) = recording_camera();
        assert!(camera.is_point_visible(vec2(1.0, 1.0)));
        assert!(!camera.is_point_visible(vec2(-1.0, 1.0)));
        assert!(camera.is_rect_visible(Rect::new(-10.0, -10.0, 11.0, 11.0)));
    }
}

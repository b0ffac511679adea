//! Trigger regions
//!
//! Invisible rectangles that fire script commands when the player's center
//! enters or leaves them. Triggers are edge-based: standing inside a region
//! fires `enter` once.

use crate::game::camera::Camera;
use crate::math::{Color, Rect};
use crate::script::{tokenize, Expr};
use crate::system::LineStream;
use super::error::LevelError;
use super::section::{expect_line, read_count, Fields};

const SECTION: &str = "regions";

const DEBUG_COLOR: Color = crate::math::rgba(0.0, 1.0, 0.5, 1.0);
const DEBUG_FONT_SIZE: f32 = 18.0;

/// A tokenized command a region fires
pub type Trigger = Vec<Expr>;

struct Region {
    id: String,
    rect: Rect,
    on_enter: Vec<Trigger>,
    on_leave: Vec<Trigger>,
    player_inside: bool,
}

pub struct Regions {
    regions: Vec<Region>,
}

impl Regions {
    /// `count`, then per region an `id x y w h n` line followed by `n`
    /// lines of `enter <command>` or `leave <command>`
    pub fn from_stream(stream: &mut LineStream) -> Result<Self, LevelError> {
        let count = read_count(stream, SECTION)?;
        let mut regions = Vec::with_capacity(count);
        for _ in 0..count {
            let line = expect_line(stream, SECTION)?;
            let mut fields = Fields::new(line, SECTION);
            let id = fields.next_word("id")?.to_string();
            let rect = fields.next_rect()?;
            let trigger_count = fields.next_usize("trigger count")?;

            let mut region = Region {
                id,
                rect,
                on_enter: Vec::new(),
                on_leave: Vec::new(),
                player_inside: false,
            };
            for _ in 0..trigger_count {
                let line = expect_line(stream, SECTION)?;
                let (kind, command) = line
                    .trim_start()
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| LevelError::parse(SECTION, format!("trigger without command: '{}'", line)))?;
                let command = tokenize(command).map_err(|e| LevelError::parse(SECTION, e.to_string()))?;
                if command.is_empty() {
                    return Err(LevelError::parse(SECTION, "empty trigger command"));
                }
                match kind {
                    "enter" => region.on_enter.push(command),
                    "leave" => region.on_leave.push(command),
                    other => {
                        return Err(LevelError::parse(
                            SECTION,
                            format!("unknown trigger kind '{}'", other),
                        ))
                    }
                }
            }
            regions.push(region);
        }
        Ok(Self { regions })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Commands of every region the player's center just entered
    pub fn player_enter(&mut self, player_hitbox: &Rect) -> Vec<Trigger> {
        let center = player_hitbox.center();
        let mut fired = Vec::new();
        for region in &mut self.regions {
            if !region.player_inside && region.rect.contains_point(center) {
                region.player_inside = true;
                tracing::debug!(region = %region.id, "player entered region");
                fired.extend(region.on_enter.iter().cloned());
            }
        }
        fired
    }

    /// Commands of every region the player's center just left
    pub fn player_leave(&mut self, player_hitbox: &Rect) -> Vec<Trigger> {
        let center = player_hitbox.center();
        let mut fired = Vec::new();
        for region in &mut self.regions {
            if region.player_inside && !region.rect.contains_point(center) {
                region.player_inside = false;
                tracing::debug!(region = %region.id, "player left region");
                fired.extend(region.on_leave.iter().cloned());
            }
        }
        fired
    }

    /// Outlines and ids, only in debug mode
    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        if !camera.debug_mode() {
            return Ok(());
        }
        for region in &self.regions {
            camera.draw_rect(region.rect, 2.0, DEBUG_COLOR);
            camera.draw_text(&region.id, region.rect.position(), DEBUG_FONT_SIZE, DEBUG_COLOR);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::camera::recording::recording_camera;
    use std::io::Cursor;

    fn stream(text: &str) -> LineStream {
        LineStream::from_reader(Cursor::new(text.as_bytes().to_vec()), 512)
    }

    fn door() -> Regions {
        let text = "1\ndoor 0 0 100 100 2\nenter label show hello\nleave (box new 0 0 10 10 \"ff0000\")\n";
        Regions::from_stream(&mut stream(text)).unwrap()
    }

    fn at(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 20.0, 20.0)
    }

    #[test]
    fn test_parse_triggers() {
        let mut r = door();
        assert_eq!(r.len(), 1);
        let fired = r.player_enter(&at(40.0, 40.0));
        assert_eq!(
            fired,
            vec![vec![Expr::symbol("label"), Expr::symbol("show"), Expr::symbol("hello")]]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Regions::from_stream(&mut stream("1\ndoor 0 0 100 100 1\nhover fly\n")),
            Err(LevelError::Parse { section: "regions", .. })
        ));
        assert!(matches!(
            Regions::from_stream(&mut stream("1\ndoor 0 0 100 100 1\nenter\n")),
            Err(LevelError::Parse { section: "regions", .. })
        ));
        assert!(matches!(
            Regions::from_stream(&mut stream("1\ndoor 0 0 100 100 1\nenter \"oops\n")),
            Err(LevelError::Parse { section: "regions", .. })
        ));
        assert!(matches!(
            Regions::from_stream(&mut stream("1\ndoor 0 0 100 100 2\nenter fly\n")),
            Err(LevelError::UnexpectedEof { section: "regions" })
        ));
    }

    #[test]
    fn test_enter_and_leave_fire_once() {
        let mut r = door();

        assert!(r.player_leave(&at(200.0, 200.0)).is_empty());
        assert_eq!(r.player_enter(&at(40.0, 40.0)).len(), 1);
        assert!(r.player_enter(&at(50.0, 40.0)).is_empty());
        assert!(r.player_leave(&at(50.0, 40.0)).is_empty());

        let left = r.player_leave(&at(200.0, 40.0));
        assert_eq!(left.len(), 1);
        assert_eq!(left[0][0], Expr::symbol("box"));
        assert!(r.player_leave(&at(200.0, 40.0)).is_empty());
        assert_eq!(r.player_enter(&at(40.0, 40.0)).len(), 1);
    }

    #[test]
    fn test_center_decides_containment() {
        let mut r = door();
        // overlapping the edge, center still outside
        assert!(r.player_enter(&at(-15.0, 40.0)).is_empty());
        assert_eq!(r.player_enter(&at(-5.0, 40.0)).len(), 1);
    }

    #[test]
    fn test_render_only_in_debug_mode() {
        let r = door();
        let (mut camera, calls) = recording_camera();
        r.render(&mut camera).unwrap();
        assert!(calls.borrow().is_empty());

        camera.toggle_debug_mode();
        r.render(&mut camera).unwrap();
        assert_eq!(calls.borrow().len(), 2);
    }
}

//! Field helpers shared by the section parsers
//!
//! Sections are whitespace-separated records. A parser pulls a line with
//! `expect_line`, then walks its fields with `Fields`.

use crate::math::{Color, Rect};
use crate::system::LineStream;
use super::error::LevelError;

/// Next line of a section, or `UnexpectedEof` naming that section.
pub fn expect_line<'a>(
    stream: &'a mut LineStream,
    section: &'static str,
) -> Result<&'a str, LevelError> {
    stream
        .next_line()
        .ok_or(LevelError::UnexpectedEof { section })
}

/// Read the leading count line of a list section.
pub fn read_count(
    stream: &mut LineStream,
    section: &'static str,
) -> Result<usize, LevelError> {
    let line = expect_line(stream, section)?;
    Fields::new(line, section).next_usize("count")
}

/// Cursor over the whitespace-separated fields of one line
pub struct Fields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    section: &'static str,
}

impl<'a> Fields<'a> {
    pub fn new(line: &'a str, section: &'static str) -> Self {
        Self {
            tokens: line.split_whitespace(),
            section,
        }
    }

    pub fn next_word(&mut self, name: &str) -> Result<&'a str, LevelError> {
        self.tokens
            .next()
            .ok_or_else(|| LevelError::parse(self.section, format!("missing {}", name)))
    }

    pub fn next_f32(&mut self, name: &str) -> Result<f32, LevelError> {
        let word = self.next_word(name)?;
        match word.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(LevelError::parse(
                self.section,
                format!("{} is not a number: '{}'", name, word),
            )),
        }
    }

    pub fn next_usize(&mut self, name: &str) -> Result<usize, LevelError> {
        let word = self.next_word(name)?;
        word.parse::<usize>().map_err(|_| {
            LevelError::parse(
                self.section,
                format!("{} is not a non-negative integer: '{}'", name, word),
            )
        })
    }

    pub fn next_color(&mut self, name: &str) -> Result<Color, LevelError> {
        let word = self.next_word(name)?;
        Color::from_hex(word).ok_or_else(|| {
            LevelError::parse(self.section, format!("{} is not a hex color: '{}'", name, word))
        })
    }

    /// `x y w h`
    pub fn next_rect(&mut self) -> Result<Rect, LevelError> {
        Ok(Rect::new(
            self.next_f32("x")?,
            self.next_f32("y")?,
            self.next_f32("w")?,
            self.next_f32("h")?,
        ))
    }

    /// Fields not consumed yet
    pub fn rest(self) -> Vec<&'a str> {
        self.tokens.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_fields_parse_in_order() {
        let mut f = Fields::new("10 20.5 30 40 ff0000 extra", "platforms");
        assert_eq!(f.next_rect().unwrap(), Rect::new(10.0, 20.5, 30.0, 40.0));
        assert_eq!(f.next_color("color").unwrap(), Color::from_hex("ff0000").unwrap());
        assert_eq!(f.rest(), vec!["extra"]);
    }

    #[test]
    fn test_fields_report_section() {
        let mut f = Fields::new("10 abc", "lava");
        f.next_f32("x").unwrap();
        match f.next_f32("y") {
            Err(LevelError::Parse { section, message }) => {
                assert_eq!(section, "lava");
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_field() {
        let mut f = Fields::new("", "goals");
        assert!(matches!(f.next_word("id"), Err(LevelError::Parse { .. })));
    }

    #[test]
    fn test_read_count_eof() {
        let mut s = LineStream::from_reader(Cursor::new(Vec::new()), 64);
        assert!(matches!(
            read_count(&mut s, "boxes"),
            Err(LevelError::UnexpectedEof { section: "boxes" })
        ));
    }
}

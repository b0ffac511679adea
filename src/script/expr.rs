//! Command expressions
//!
//! The embedded language's evaluator hands commands over as flat lists of
//! atoms. `tokenize` produces the same shape from a text line, which is how
//! region triggers and the console feed commands in.

use super::error::ScriptError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i64),
    Real(f32),
    Str(String),
    Symbol(String),
}

impl Expr {
    pub fn symbol(s: &str) -> Self {
        Expr::Symbol(s.to_string())
    }

    pub fn string(s: &str) -> Self {
        Expr::Str(s.to_string())
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Expr::Integer(v) => format!("integer {}", v),
            Expr::Real(v) => format!("real {}", v),
            Expr::Str(s) => format!("string \"{}\"", s),
            Expr::Symbol(s) => format!("symbol {}", s),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Integer(v) => write!(f, "{}", v),
            Expr::Real(v) => write!(f, "{}", v),
            Expr::Str(s) => write!(f, "\"{}\"", s),
            Expr::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// Result of a successfully dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Nil,
    Integer(i64),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Split a command line into atoms.
///
/// One surrounding pair of parentheses is accepted and stripped, so both
/// `box new 0 0 10 10` and `(box new 0 0 10 10)` work. Nested lists are not
/// supported.
pub fn tokenize(line: &str) -> Result<Vec<Expr>, ScriptError> {
    let mut body = line.trim();
    if let Some(inner) = body.strip_prefix('(') {
        body = inner
            .strip_suffix(')')
            .ok_or_else(|| ScriptError::Tokenize("unbalanced parenthesis".to_string()))?;
    }

    let mut exprs = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '(' || c == ')' {
            return Err(ScriptError::Tokenize("nested lists are not supported".to_string()));
        }

        if c == '"' {
            chars.next();
            let mut s = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('n') => s.push('\n'),
                        Some(other) => s.push(other),
                        None => break,
                    },
                    other => s.push(other),
                }
            }
            if !closed {
                return Err(ScriptError::Tokenize("unterminated string".to_string()));
            }
            exprs.push(Expr::Str(s));
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                break;
            }
            word.push(c);
            chars.next();
        }
        exprs.push(atom(&word));
    }

    Ok(exprs)
}

fn atom(word: &str) -> Expr {
    if let Ok(v) = word.parse::<i64>() {
        return Expr::Integer(v);
    }
    let looks_numeric = word
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
        .unwrap_or(false);
    if looks_numeric {
        if let Ok(v) = word.parse::<f32>() {
            if v.is_finite() {
                return Expr::Real(v);
            }
        }
    }
    Expr::Symbol(word.to_string())
}

/// Positional matcher over a command's arguments.
///
/// Commands read every argument through `Args` before touching any state,
/// so a malformed command fails without side effects.
pub struct Args<'a> {
    exprs: &'a [Expr],
    pos: usize,
}

impl<'a> Args<'a> {
    pub fn new(exprs: &'a [Expr]) -> Self {
        Self { exprs, pos: 0 }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a Expr, ScriptError> {
        let expr = self
            .exprs
            .get(self.pos)
            .ok_or(ScriptError::MissingArgument { expected })?;
        self.pos += 1;
        Ok(expr)
    }

    /// A symbol or string naming an action or object
    pub fn name(&mut self, expected: &'static str) -> Result<&'a str, ScriptError> {
        match self.next(expected)? {
            Expr::Symbol(s) | Expr::Str(s) => Ok(s),
            other => Err(ScriptError::WrongArgument {
                expected,
                got: other.describe(),
            }),
        }
    }

    /// An object id. Level files allow numeric ids, which tokenize as
    /// integers, so those are accepted too.
    pub fn ident(&mut self, expected: &'static str) -> Result<String, ScriptError> {
        match self.next(expected)? {
            Expr::Symbol(s) | Expr::Str(s) => Ok(s.clone()),
            Expr::Integer(v) => Ok(v.to_string()),
            other => Err(ScriptError::WrongArgument {
                expected,
                got: other.describe(),
            }),
        }
    }

    pub fn integer(&mut self, expected: &'static str) -> Result<i64, ScriptError> {
        match self.next(expected)? {
            Expr::Integer(v) => Ok(*v),
            other => Err(ScriptError::WrongArgument {
                expected,
                got: other.describe(),
            }),
        }
    }

    /// Optional trailing name (e.g. a color)
    pub fn optional_name(&mut self, expected: &'static str) -> Result<Option<&'a str>, ScriptError> {
        if self.is_empty() {
            return Ok(None);
        }
        self.name(expected).map(Some)
    }

    /// Arguments not consumed yet
    pub fn rest(&self) -> &'a [Expr] {
        &self.exprs[self.pos.min(self.exprs.len())..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.exprs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_atoms() {
        let exprs = tokenize("(box new 10 -20 5.5 5 \"ff0000\")").unwrap();
        assert_eq!(
            exprs,
            vec![
                Expr::symbol("box"),
                Expr::symbol("new"),
                Expr::Integer(10),
                Expr::Integer(-20),
                Expr::Real(5.5),
                Expr::Integer(5),
                Expr::string("ff0000"),
            ]
        );
    }

    #[test]
    fn test_tokenize_without_parens() {
        let exprs = tokenize("  body-push 3 0 -100 ").unwrap();
        assert_eq!(exprs.len(), 4);
        assert_eq!(exprs[0], Expr::symbol("body-push"));
        assert_eq!(exprs[3], Expr::Integer(-100));
    }

    #[test]
    fn test_hex_color_stays_symbol() {
        let exprs = tokenize("label hide 1e2x ff00ff").unwrap();
        assert_eq!(exprs[2], Expr::symbol("1e2x"));
        assert_eq!(exprs[3], Expr::symbol("ff00ff"));
    }

    #[test]
    fn test_tokenize_errors() {
        assert!(matches!(tokenize("(fly"), Err(ScriptError::Tokenize(_))));
        assert!(matches!(tokenize("a (b c)"), Err(ScriptError::Tokenize(_))));
        assert!(matches!(tokenize("label \"oops"), Err(ScriptError::Tokenize(_))));
    }

    #[test]
    fn test_args_matching() {
        let exprs = tokenize("new 1 2.5 foo").unwrap();
        let mut args = Args::new(&exprs);
        assert_eq!(args.name("action").unwrap(), "new");
        assert_eq!(args.integer("x").unwrap(), 1);
        assert_eq!(
            args.integer("y"),
            Err(ScriptError::WrongArgument {
                expected: "y",
                got: Expr::Real(2.5).describe(),
            })
        );
        assert_eq!(args.optional_name("color").unwrap(), Some("foo"));
        assert_eq!(args.optional_name("color").unwrap(), None);
        assert_eq!(
            args.integer("w"),
            Err(ScriptError::MissingArgument { expected: "w" })
        );
    }

    #[test]
    fn test_ident_accepts_numbers() {
        let exprs = tokenize("hide 42 door \"big one\" 1.5").unwrap();
        let mut args = Args::new(&exprs);
        args.name("action").unwrap();
        assert_eq!(args.ident("id").unwrap(), "42");
        assert_eq!(args.ident("id").unwrap(), "door");
        assert_eq!(args.ident("id").unwrap(), "big one");
        assert!(args.ident("id").is_err());
    }

    #[test]
    fn test_args_wrong_type() {
        let exprs = tokenize("x 1").unwrap();
        let mut args = Args::new(&exprs);
        assert!(matches!(
            args.integer("id"),
            Err(ScriptError::WrongArgument { expected: "id", .. })
        ));
    }
}

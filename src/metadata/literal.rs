//! String literal codec for the generated metadata module
//!
//! `quote` produces a single-quoted literal that never spans lines: every
//! backslash, quote and control character is escaped. `unquote` reads the
//! literal forms the distribution's runtime accepts (single, double and
//! triple quoted, with the standard escapes) so modules written by older
//! tooling stay readable.

use std::fmt;

/// Error raised while reading a literal or a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
  /// Byte offset into the scanned source
  pub offset: usize,
  pub message: String,
}

impl LiteralError {
  pub fn new(offset: usize, message: impl Into<String>) -> Self {
    Self {
      offset,
      message: message.into(),
    }
  }

  /// 1-based line number of the error within `source`
  pub fn line_in(&self, source: &str) -> usize {
    let end = self.offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
  }
}

impl fmt::Display for LiteralError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} (at byte {})", self.message, self.offset)
  }
}

impl std::error::Error for LiteralError {}

/// Quote a string as a single-line literal
pub fn quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('\'');
  for c in value.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
      c => out.push(c),
    }
  }
  out.push('\'');
  out
}

/// Read one literal at the start of `input`
///
/// Returns the decoded value and the number of bytes consumed. `base` is the
/// offset of `input` within the whole source, used for error positions.
pub fn unquote(input: &str, base: usize) -> Result<(String, usize), LiteralError> {
  let mut prefix = 0;
  if input.starts_with(['u', 'U']) {
    prefix = 1;
  }
  let body = &input[prefix..];
  let quote_char = match body.chars().next() {
    Some(q @ ('\'' | '"')) => q,
    _ => return Err(LiteralError::new(base, "expected a string literal")),
  };

  let triple: String = std::iter::repeat_n(quote_char, 3).collect();
  let is_triple = body.starts_with(&triple);
  let open_len = if is_triple { 3 } else { 1 };

  let mut value = String::new();
  let mut chars = body[open_len..].char_indices().peekable();
  let content_start = prefix + open_len;

  while let Some((i, c)) = chars.next() {
    let at = content_start + i;
    match c {
      '\\' => {
        let Some((_, esc)) = chars.next() else {
          return Err(LiteralError::new(base + at, "unterminated escape sequence"));
        };
        match esc {
          '\n' => {}
          '\\' => value.push('\\'),
          '\'' => value.push('\''),
          '"' => value.push('"'),
          'n' => value.push('\n'),
          'r' => value.push('\r'),
          't' => value.push('\t'),
          'a' => value.push('\x07'),
          'b' => value.push('\x08'),
          'f' => value.push('\x0c'),
          'v' => value.push('\x0b'),
          '0'..='7' => {
            let mut code = esc.to_digit(8).unwrap_or(0);
            for _ in 0..2 {
              match chars.peek() {
                Some(&(_, d @ '0'..='7')) => {
                  code = code * 8 + d.to_digit(8).unwrap_or(0);
                  chars.next();
                }
                _ => break,
              }
            }
            value.push(code_point(code, base + at)?);
          }
          'x' => value.push(read_hex(&mut chars, 2, base + at)?),
          'u' => value.push(read_hex(&mut chars, 4, base + at)?),
          'U' => value.push(read_hex(&mut chars, 8, base + at)?),
          other => {
            value.push('\\');
            value.push(other);
          }
        }
      }
      '\n' if !is_triple => {
        return Err(LiteralError::new(base + at, "unterminated string literal"));
      }
      c if c == quote_char => {
        if !is_triple {
          return Ok((value, at + 1));
        }
        if body[open_len + i..].starts_with(&triple) {
          return Ok((value, at + 3));
        }
        value.push(c);
      }
      c => value.push(c),
    }
  }

  Err(LiteralError::new(base, "unterminated string literal"))
}

fn read_hex<I>(chars: &mut std::iter::Peekable<I>, digits: usize, at: usize) -> Result<char, LiteralError>
where
  I: Iterator<Item = (usize, char)>,
{
  let mut code = 0u32;
  for _ in 0..digits {
    let digit = chars
      .next()
      .and_then(|(_, c)| c.to_digit(16))
      .ok_or_else(|| LiteralError::new(at, format!("truncated escape, expected {} hex digits", digits)))?;
    code = code * 16 + digit;
  }
  code_point(code, at)
}

fn code_point(code: u32, at: usize) -> Result<char, LiteralError> {
  char::from_u32(code).ok_or_else(|| LiteralError::new(at, format!("invalid code point {:#x}", code)))
}

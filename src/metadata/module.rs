//! Generated metadata module: rendering and re-reading
//!
//! The module is a flat list of string bindings:
//!
//! ```text
//! this_version = '0.2a.dev'
//! stable_version = '0.1a1'
//! readme = (
//!     'first line\n'
//!     'second line\n'
//! )
//! ```
//!
//! Multi-line values are written as implicitly concatenated literals inside
//! parentheses, one source line per text line. Reading accepts that layout as
//! well as plain and triple-quoted single literals.

use crate::core::error::{ConfigError, SetupResult};
use crate::metadata::literal::{self, LiteralError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const THIS_VERSION: &str = "this_version";
pub const STABLE_VERSION: &str = "stable_version";
pub const README: &str = "readme";

const HEADER: &str = "# -*- coding: utf-8 -*-
# Generated by dill-setup. Do not edit: every build overwrites this file.
";

/// The three bindings the generated module exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBindings {
  pub this_version: String,
  pub stable_version: String,
  /// Composed description followed by the license text
  pub readme: String,
}

impl ModuleBindings {
  /// Render the module source
  pub fn render(&self) -> String {
    let mut out = String::from(HEADER);
    for (name, value) in [
      (THIS_VERSION, &self.this_version),
      (STABLE_VERSION, &self.stable_version),
      (README, &self.readme),
    ] {
      render_binding(&mut out, name, value);
    }
    out
  }
}

fn render_binding(out: &mut String, name: &str, value: &str) {
  let lines: Vec<&str> = value.split_inclusive('\n').collect();
  if lines.len() <= 1 {
    out.push_str(&format!("{} = {}\n", name, literal::quote(value)));
    return;
  }

  out.push_str(&format!("{} = (\n", name));
  for line in lines {
    out.push_str("    ");
    out.push_str(&literal::quote(line));
    out.push('\n');
  }
  out.push_str(")\n");
}

/// A generated module found on disk from an earlier build
#[derive(Debug, Clone)]
pub struct PriorModule {
  pub path: PathBuf,
  pub bindings: BTreeMap<String, String>,
}

impl PriorModule {
  /// Read the module at `path`, if present
  ///
  /// Absence is not an error. A file that exists but cannot be read or
  /// parsed is a malformed module, and so is a path whose existence cannot
  /// be checked.
  pub fn read(path: &Path) -> SetupResult<Option<Self>> {
    match path.try_exists() {
      Ok(true) => {}
      Ok(false) => {
        tracing::debug!(path = %path.display(), "no prior generated module");
        return Ok(None);
      }
      Err(e) => return Err(malformed(path, format!("unreadable: {}", e))),
    }

    let source = fs::read_to_string(path).map_err(|e| malformed(path, format!("unreadable: {}", e)))?;
    let bindings = parse_bindings(&source)
      .map_err(|e| malformed(path, format!("line {}: {}", e.line_in(&source), e.message)))?;

    tracing::debug!(path = %path.display(), bindings = bindings.len(), "read prior generated module");
    Ok(Some(Self {
      path: path.to_path_buf(),
      bindings,
    }))
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.bindings.get(name).map(String::as_str)
  }

  /// The version a previous build decided on
  ///
  /// Missing or empty means the module is malformed; there is no fallback.
  pub fn this_version(&self) -> SetupResult<&str> {
    match self.get(THIS_VERSION) {
      Some(version) if !version.trim().is_empty() => Ok(version),
      Some(_) => Err(malformed(&self.path, format!("`{}` is empty", THIS_VERSION))),
      None => Err(malformed(&self.path, format!("missing `{}` binding", THIS_VERSION))),
    }
  }
}

fn malformed(path: &Path, reason: String) -> crate::core::error::SetupError {
  ConfigError::MalformedModule {
    path: path.to_path_buf(),
    reason,
  }
  .into()
}

/// Parse `name = <string>` bindings from module source
pub fn parse_bindings(source: &str) -> Result<BTreeMap<String, String>, LiteralError> {
  let mut scanner = Scanner { source, pos: 0 };
  let mut bindings = BTreeMap::new();

  loop {
    scanner.skip_trivia(true);
    if scanner.at_end() {
      break;
    }

    let name = scanner.identifier()?;
    scanner.skip_trivia(false);
    scanner.expect('=')?;
    scanner.skip_trivia(false);

    let value = if scanner.eat('(') {
      scanner.skip_trivia(true);
      let mut value = scanner.literal()?;
      loop {
        scanner.skip_trivia(true);
        if scanner.eat(')') {
          break;
        }
        value.push_str(&scanner.literal()?);
      }
      value
    } else {
      let mut value = scanner.literal()?;
      loop {
        scanner.skip_trivia(false);
        if !scanner.peek().is_some_and(|c| matches!(c, '\'' | '"')) {
          break;
        }
        value.push_str(&scanner.literal()?);
      }
      value
    };

    scanner.skip_trivia(false);
    scanner.end_of_statement()?;
    bindings.insert(name.to_string(), value);
  }

  Ok(bindings)
}

struct Scanner<'a> {
  source: &'a str,
  pos: usize,
}

impl<'a> Scanner<'a> {
  fn rest(&self) -> &'a str {
    &self.source[self.pos..]
  }

  fn at_end(&self) -> bool {
    self.pos >= self.source.len()
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn eat(&mut self, expected: char) -> bool {
    if self.peek() == Some(expected) {
      self.pos += expected.len_utf8();
      true
    } else {
      false
    }
  }

  fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
    if self.eat(expected) {
      Ok(())
    } else {
      Err(LiteralError::new(self.pos, format!("expected '{}'", expected)))
    }
  }

  /// Skip blanks, comments and line continuations; newlines only when allowed
  fn skip_trivia(&mut self, newlines: bool) {
    while let Some(c) = self.peek() {
      match c {
        ' ' | '\t' | '\x0c' => self.pos += 1,
        '\n' | '\r' if newlines => self.pos += 1,
        '\\' if self.rest()[1..].starts_with('\n') => self.pos += 2,
        '#' => {
          let line_len = self.rest().find('\n').unwrap_or(self.rest().len());
          self.pos += line_len;
        }
        _ => break,
      }
    }
  }

  fn identifier(&mut self) -> Result<&'a str, LiteralError> {
    let rest = self.rest();
    let len = rest
      .char_indices()
      .find(|&(i, c)| !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())))
      .map(|(i, _)| i)
      .unwrap_or(rest.len());
    if len == 0 {
      return Err(LiteralError::new(self.pos, "expected a binding name"));
    }
    self.pos += len;
    Ok(&rest[..len])
  }

  fn literal(&mut self) -> Result<String, LiteralError> {
    let (value, used) = literal::unquote(self.rest(), self.pos)?;
    self.pos += used;
    Ok(value)
  }

  fn end_of_statement(&mut self) -> Result<(), LiteralError> {
    match self.peek() {
      None => Ok(()),
      Some('\n') | Some('\r') | Some(';') => {
        self.pos += 1;
        Ok(())
      }
      Some(_) => Err(LiteralError::new(self.pos, "unexpected text after binding")),
    }
  }
}

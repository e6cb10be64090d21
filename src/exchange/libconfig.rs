//! libconfig reader and writer
//!
//! Covers the subset used by shape documents: groups `{}`, lists `()`,
//! scalar arrays `[]`, strings, booleans, integers (decimal or hex, with an
//! optional `L` suffix) and floats. Comments use `#`, `//` or `/* */`.
//!
//! ```text
//! shape = {
//!   type = "curve";
//!   data = (
//!     { degree = 1; knotvector = [0.0, 0.0, 1.0, 1.0]; }
//!   );
//! };
//! ```

use std::fmt::Write;

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parses a libconfig document into a JSON object
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser { src: text, pos: 0 };
    let settings = parser.settings(None)?;
    parser.skip_trivia()?;
    if parser.pos < text.len() {
        return Err(parser.error("unexpected input after the last setting"));
    }
    Ok(Value::Object(settings))
}

/// Writes a JSON object as libconfig settings. Null values are skipped.
pub fn to_string(root: &Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in root {
        write_setting(&mut out, key, value, 0);
    }
    out
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(self.error(format!("expected '{wanted}', found '{c}'"))),
            None => Err(self.error(format!("expected '{wanted}', found end of input"))),
        }
    }

    /// Skips whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            if rest.starts_with('#') || rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                let end = rest[2..]
                    .find("*/")
                    .ok_or_else(|| self.error("unterminated comment"))?;
                self.pos += end + 4;
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn settings(&mut self, close: Option<char>) -> Result<Map<String, Value>, ParseError> {
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None if close.is_none() => return Ok(map),
                None => return Err(self.error("unexpected end of input in group")),
                Some(c) if Some(c) == close => return Ok(map),
                Some(_) => {}
            }

            let name = self.name()?;
            self.skip_trivia()?;
            match self.bump() {
                Some('=') | Some(':') => {}
                _ => return Err(self.error(format!("expected '=' or ':' after '{name}'"))),
            }
            let value = self.value()?;
            map.insert(name, value);

            self.skip_trivia()?;
            if matches!(self.peek(), Some(';') | Some(',')) {
                self.bump();
            }
        }
    }

    fn name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '*' => {}
            _ => return Err(self.error("expected a setting name")),
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '*'))
        {
            self.bump();
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => {
                self.bump();
                let map = self.settings(Some('}'))?;
                self.expect('}')?;
                Ok(Value::Object(map))
            }
            Some('[') => {
                self.bump();
                let items = self.sequence(']')?;
                if items.iter().any(|v| v.is_array() || v.is_object()) {
                    return Err(self.error("arrays may only hold scalar values, use a list '( )'"));
                }
                Ok(Value::Array(items))
            }
            Some('(') => {
                self.bump();
                Ok(Value::Array(self.sequence(')')?))
            }
            Some('"') => self.string(),
            Some(_) => self.scalar(),
            None => Err(self.error("expected a value, found end of input")),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Vec<Value>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(items),
                _ => return Err(self.error(format!("expected ',' or '{close}'"))),
            }
        }
    }

    /// One or more adjacent string literals, concatenated
    fn string(&mut self) -> Result<Value, ParseError> {
        let mut out = String::new();
        while self.peek() == Some('"') {
            self.bump();
            loop {
                match self.bump() {
                    Some('"') => break,
                    Some('\\') => match self.bump() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some('f') => out.push('\u{c}'),
                        Some('\\') => out.push('\\'),
                        Some('"') => out.push('"'),
                        Some(c) => return Err(self.error(format!("unknown escape '\\{c}'"))),
                        None => return Err(self.error("unterminated string")),
                    },
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated string")),
                }
            }
            self.skip_trivia()?;
        }
        Ok(Value::String(out))
    }

    fn scalar(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_'))
        {
            self.bump();
        }
        let token = &self.src[start..self.pos];
        if token.is_empty() {
            return Err(self.error("expected a value"));
        }

        if token.eq_ignore_ascii_case("true") {
            return Ok(Value::Bool(true));
        }
        if token.eq_ignore_ascii_case("false") {
            return Ok(Value::Bool(false));
        }

        let digits = token.trim_end_matches(['L', 'l']);
        let (negative, unsigned) = match digits.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, digits.strip_prefix('+').unwrap_or(digits)),
        };
        if let Some(hex) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
            let n = i64::from_str_radix(hex, 16).map_err(|_| self.error(format!("invalid hex '{token}'")))?;
            return Ok(Value::from(if negative { -n } else { n }));
        }
        if let Ok(n) = digits.parse::<i64>() {
            return Ok(Value::from(n));
        }
        digits
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid value '{token}'")))
    }
}

fn write_setting(out: &mut String, key: &str, value: &Value, indent: usize) {
    if value.is_null() {
        return;
    }
    let _ = write!(out, "{:indent$}{key} = ", "", indent = indent);
    write_value(out, value, indent);
    out.push_str(";\n");
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null => out.push_str("\"\""),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) if items.iter().all(|v| !v.is_array() && !v.is_object()) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, indent);
            }
            out.push(']');
        }
        Value::Array(items) => {
            out.push_str("(\n");
            for (i, item) in items.iter().enumerate() {
                let _ = write!(out, "{:indent$}", "", indent = indent + 2);
                write_value(out, item, indent + 2);
                out.push_str(if i + 1 < items.len() { ",\n" } else { "\n" });
            }
            let _ = write!(out, "{:indent$})", "", indent = indent);
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (key, item) in map {
                write_setting(out, key, item, indent + 2);
            }
            let _ = write!(out, "{:indent$}}}", "", indent = indent);
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        let _ = write!(out, "{i}");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(out, "{u}L");
    } else if let Some(f) = n.as_f64() {
        let _ = write!(out, "{f:?}");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

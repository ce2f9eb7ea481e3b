//! Parser for Python-style literal values.
//!
//! TMDB exports store structured columns such as `genres` as the repr of a
//! Python list, e.g. `[{'id': 28, 'name': 'Action'}]`. This module parses that
//! subset: lists, tuples, dicts, quoted strings (with `r`, `u` and `b`
//! prefixes), decimal and `0x`/`0o`/`0b` numbers, `True`, `False` and `None`.
//! Anything else is a [`LiteralError`].

use serde_json::Value;

/// Nesting deeper than this is rejected instead of recursing further
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

impl Literal {
    /// Looks up a string key in a dict literal; the last duplicate key wins
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Dict(entries) => entries.iter().rev().find_map(|(k, v)| match k {
                Literal::Str(k) if k == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Converts an already-structured JSON value into the same shape
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Literal::None,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Literal::Int(i),
                None => Literal::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Literal::Str(s.clone()),
            Value::Array(items) => Literal::List(items.iter().map(Literal::from_json).collect()),
            Value::Object(map) => Literal::Dict(
                map.iter()
                    .map(|(k, v)| (Literal::Str(k.clone()), Literal::from_json(v)))
                    .collect(),
            ),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid literal at byte {position}: {message}")]
pub struct LiteralError {
    pub position: usize,
    pub message: &'static str,
}

/// Parses a complete literal; trailing non-whitespace input is an error
pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
    };
    let value = parser.value(0)?;
    parser.skip_whitespace();
    match parser.chars.peek() {
        None => Ok(value),
        Some(&(position, _)) => Err(LiteralError {
            position,
            message: "unexpected trailing input",
        }),
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn error<T>(&mut self, message: &'static str) -> Result<T, LiteralError> {
        Err(LiteralError {
            position: self.position(),
            message,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }

    fn value(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        if depth > MAX_DEPTH {
            return self.error("nesting too deep");
        }
        self.skip_whitespace();
        match self.chars.peek().map(|&(_, c)| c) {
            Some('[') => {
                self.chars.next();
                self.sequence(']', depth).map(Literal::List)
            }
            Some('(') => {
                self.chars.next();
                self.sequence(')', depth).map(Literal::Tuple)
            }
            Some('{') => {
                self.chars.next();
                self.dict(depth)
            }
            Some(quote @ ('\'' | '"')) => {
                self.chars.next();
                self.string(quote, false).map(Literal::Str)
            }
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            Some(_) => self.error("unexpected character"),
            None => self.error("unexpected end of input"),
        }
    }

    fn sequence(&mut self, close: char, depth: usize) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.next_if(|&(_, c)| c == close).is_some() {
                return Ok(items);
            }
            items.push(self.value(depth + 1)?);
            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, c)) if c == close => return Ok(items),
                _ => return self.error("expected ',' or closing bracket"),
            }
        }
    }

    fn dict(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.next_if(|&(_, c)| c == '}').is_some() {
                return Ok(Literal::Dict(entries));
            }
            let key = self.value(depth + 1)?;
            self.skip_whitespace();
            if self.chars.next_if(|&(_, c)| c == ':').is_none() {
                return self.error("expected ':' after dict key");
            }
            let value = self.value(depth + 1)?;
            entries.push((key, value));
            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, '}')) => return Ok(Literal::Dict(entries)),
                _ => return self.error("expected ',' or '}'"),
            }
        }
    }

    fn string(&mut self, quote: char, raw: bool) -> Result<String, LiteralError> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return self.error("unterminated string"),
                Some((_, c)) if c == quote => return Ok(out),
                // Raw strings keep the backslash; an escaped quote still doesn't close
                Some((_, '\\')) if raw => match self.chars.next() {
                    Some((_, c)) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return self.error("unterminated string"),
                },
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, '0')) => out.push('\0'),
                    Some((_, 'x')) => out.push(self.hex_escape(2)?),
                    Some((_, 'u')) => out.push(self.hex_escape(4)?),
                    Some((_, c @ ('\\' | '\'' | '"'))) => out.push(c),
                    // Unknown escapes are kept verbatim, as Python does
                    Some((_, c)) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return self.error("unterminated string"),
                },
                Some((_, c)) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            match self.chars.next().and_then(|(_, c)| c.to_digit(16)) {
                Some(d) => code = code * 16 + d,
                None => return self.error("invalid hex escape"),
            }
        }
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => self.error("invalid code point"),
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.position();
        let mut end = start;
        while let Some((i, c)) = self
            .chars
            .next_if(|&(_, c)| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'))
        {
            end = i + c.len_utf8();
        }
        let text = self.input[start..end].replace('_', "");
        if let Some(i) = parse_int(&text) {
            return Ok(Literal::Int(i));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Literal::Float(f)),
            _ => Err(LiteralError {
                position: start,
                message: "invalid number",
            }),
        }
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let input = self.input;
        let start = self.position();
        let mut end = start;
        while let Some((i, c)) = self.chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_') {
            end = i + c.len_utf8();
        }
        let word = &input[start..end];

        if let Some(quote @ ('\'' | '"')) = self.chars.peek().map(|&(_, c)| c) {
            let prefix = word.to_ascii_lowercase();
            let raw = prefix.contains('r');
            match prefix.as_str() {
                "u" | "r" => {
                    self.chars.next();
                    return self.string(quote, raw).map(Literal::Str);
                }
                "b" | "br" | "rb" => {
                    self.chars.next();
                    return self
                        .string(quote, raw)
                        .map(|text| Literal::Bytes(text.into_bytes()));
                }
                _ => {}
            }
        }

        match word {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => Err(LiteralError {
                position: start,
                message: "unknown identifier",
            }),
        }
    }
}

/// Integer with an optional sign and `0x`, `0o` or `0b` radix prefix
fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let radix = match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return text.parse().ok(),
    };
    let body = &digits[2..];
    if body.is_empty() || body.starts_with(['+', '-']) {
        return None;
    }
    let value = i64::from_str_radix(body, radix).ok()?;
    Some(if negative { -value } else { value })
}

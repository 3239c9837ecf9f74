//! Incremental JSON reader for catalog members.
//!
//! Reads structural tokens one at a time from a buffered byte stream and
//! captures single values as raw bytes, so that a catalog's manifest array
//! never has to be held in memory as a whole.

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use please_core::error::{PleaseError, Result};

/// A structural JSON token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Str(String),
    /// Number, boolean, null or a stray separator, unparsed.
    Scalar(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::BeginObject => write!(f, "'{{'"),
            Token::EndObject => write!(f, "'}}'"),
            Token::BeginArray => write!(f, "'['"),
            Token::EndArray => write!(f, "']'"),
            Token::Str(s) => write!(f, "string {:?}", s),
            Token::Scalar(s) => write!(f, "{}", s),
        }
    }
}

/// Describe an optional token for error messages.
pub(crate) fn describe(token: &Option<Token>) -> String {
    match token {
        Some(t) => t.to_string(),
        None => "end of input".to_string(),
    }
}

/// Byte-level JSON tokenizer over a buffered reader.
pub(crate) struct JsonStream<R> {
    reader: R,
    path: PathBuf,
}

impl<R: BufRead> JsonStream<R> {
    pub(crate) fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next token, skipping whitespace.
    ///
    /// Separators are not tokens; callers consume them with [`expect_byte`](Self::expect_byte).
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>> {
        let Some(b) = self.peek_non_whitespace()? else {
            return Ok(None);
        };
        let token = match b {
            b'{' => {
                self.consume();
                Token::BeginObject
            }
            b'}' => {
                self.consume();
                Token::EndObject
            }
            b'[' => {
                self.consume();
                Token::BeginArray
            }
            b']' => {
                self.consume();
                Token::EndArray
            }
            b'"' => {
                let mut raw = Vec::new();
                self.read_string_raw(&mut raw)?;
                let s = serde_json::from_slice::<String>(&raw).map_err(|e| self.decode_error(e))?;
                Token::Str(s)
            }
            b',' | b':' => {
                self.consume();
                Token::Scalar((b as char).to_string())
            }
            _ => {
                let mut raw = Vec::new();
                self.read_scalar_raw(&mut raw)?;
                Token::Scalar(String::from_utf8_lossy(&raw).into_owned())
            }
        };
        Ok(Some(token))
    }

    /// Capture the next complete JSON value as raw bytes.
    pub(crate) fn read_value_raw(&mut self) -> Result<Vec<u8>> {
        let b = self
            .peek_non_whitespace()?
            .ok_or_else(|| self.eof_error())?;
        let mut raw = Vec::new();
        match b {
            b'{' | b'[' => self.read_container_raw(&mut raw)?,
            b'"' => self.read_string_raw(&mut raw)?,
            b'}' | b']' | b',' | b':' => {
                return Err(PleaseError::UnexpectedToken {
                    path: self.path.clone(),
                    expected: "value".to_string(),
                    found: format!("'{}'", b as char),
                })
            }
            _ => self.read_scalar_raw(&mut raw)?,
        }
        Ok(raw)
    }

    /// Skip the next complete JSON value. The value must still be well-formed.
    pub(crate) fn skip_value(&mut self) -> Result<()> {
        let raw = self.read_value_raw()?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&raw)
            .map(|_| ())
            .map_err(|e| self.decode_error(e))
    }

    /// Consume `expected`, which must be the next non-whitespace byte.
    pub(crate) fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.peek_non_whitespace()? {
            Some(b) if b == expected => {
                self.consume();
                Ok(())
            }
            found => Err(PleaseError::UnexpectedToken {
                path: self.path.clone(),
                expected: format!("'{}'", expected as char),
                found: found.map_or_else(|| "end of input".to_string(), |b| format!("'{}'", b as char)),
            }),
        }
    }

    /// Peek the next non-whitespace byte without consuming it.
    pub(crate) fn peek_non_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            match self.peek()? {
                Some(b) if b.is_ascii_whitespace() => self.consume(),
                other => return Ok(other),
            }
        }
    }

    /// Consume one byte that was just peeked.
    pub(crate) fn consume(&mut self) {
        self.reader.consume(1);
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        let buf = self.reader.fill_buf().map_err(|e| PleaseError::CorruptArchive {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(buf.first().copied())
    }

    fn next_byte(&mut self) -> Result<u8> {
        let b = self.peek()?.ok_or_else(|| self.eof_error())?;
        self.consume();
        Ok(b)
    }

    /// Read a string starting at its opening quote, escapes left intact.
    fn read_string_raw(&mut self, out: &mut Vec<u8>) -> Result<()> {
        out.push(self.next_byte()?);
        loop {
            let b = self.next_byte()?;
            out.push(b);
            match b {
                b'\\' => out.push(self.next_byte()?),
                b'"' => return Ok(()),
                _ => {}
            }
        }
    }

    fn read_container_raw(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let Some(b) = self.peek()? else {
                return Err(self.eof_error());
            };
            if b == b'"' {
                self.read_string_raw(out)?;
                continue;
            }
            self.consume();
            out.push(b);
            match b {
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn read_scalar_raw(&mut self, out: &mut Vec<u8>) -> Result<()> {
        while let Some(b) = self.peek()? {
            if b.is_ascii_whitespace() || matches!(b, b',' | b':' | b']' | b'}' | b'[' | b'{') {
                break;
            }
            out.push(b);
            self.consume();
        }
        Ok(())
    }

    pub(crate) fn decode_error(&self, err: impl fmt::Display) -> PleaseError {
        PleaseError::DecodeError {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }

    fn eof_error(&self) -> PleaseError {
        self.decode_error("unexpected end of input")
    }
}

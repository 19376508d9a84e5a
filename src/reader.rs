//! A line-buffered, seekable cursor over the tokens of a whole input stream.
//!
//! [`TokenReader`] pulls lines from any [`BufRead`], tokenizes them and keeps
//! the tokens of the current *logical* line in a buffer the parser can move
//! around in. Comments never reach the parser: `//` drops the rest of its
//! line and `/* ... */` (nesting allowed) is skipped wherever it appears. A
//! block comment that spans several lines glues the tokens before and after
//! it into one logical line.
//!
//! ```rust
//! use skopik::reader::TokenReader;
//!
//! let src = "a = 1; // trailing\n/* gone\n  still gone */ b = 2";
//! let mut reader = TokenReader::new(src.as_bytes());
//!
//! let mut tokens = Vec::new();
//! while let Some(token) = reader.read_token().unwrap() {
//!     tokens.push(token);
//! }
//! assert_eq!(tokens, ["a", "=", "1", ";", "b", "=", "2"]);
//! ```

use crate::error::{Error, Result};
use crate::tokenizer::{Carry, Tokenizer, BLOCK_COMMENT_CLOSE, BLOCK_COMMENT_OPEN, LINE_COMMENT};
use std::collections::VecDeque;
use std::io::{BufRead, Lines};

/// Anything that yields tokens one at a time and knows which line it is on.
pub trait TokenSource {
    /// Returns the next token, or `None` once input is exhausted.
    fn next_token(&mut self) -> Result<Option<String>>;

    /// The 1-based line of the most recently returned token.
    fn line(&self) -> usize;

    /// Consumes tokens up to and including the `close` that matches an
    /// already consumed `open`. Every `open` seen on the way needs its own
    /// `close` first. Running out of input is always an error.
    fn match_token(&mut self, close: &str, open: &str) -> Result<()> {
        let mut opened_at = vec![self.line()];

        while let Some(token) = self.next_token()? {
            if token == close {
                opened_at.pop();
                if opened_at.is_empty() {
                    return Ok(());
                }
            } else if token == open {
                opened_at.push(self.line());
            }
        }

        let outer = opened_at.first().copied().unwrap_or_default();
        match opened_at.last().copied() {
            Some(inner) if opened_at.len() > 1 => Err(Error::lex(
                inner,
                format!(
                    "'{open}' on line {inner} is never closed, so the '{open}' opened on line {outer} cannot be matched"
                ),
            )),
            _ => Err(Error::lex(
                outer,
                format!("'{open}' opened on line {outer} is never closed"),
            )),
        }
    }
}

/// Physical lines, tokenized with string and comment state carried across
/// line breaks.
struct RawLines<R> {
    lines: Lines<R>,
    line: usize,
    carry: Carry,
    string_start: usize,
    pending: VecDeque<String>,
}

impl<R: BufRead> RawLines<R> {
    fn new(reader: R) -> Self {
        RawLines {
            lines: reader.lines(),
            line: 0,
            carry: Carry::Clear,
            string_start: 0,
            pending: VecDeque::new(),
        }
    }

    /// Tokenizes lines until one produces tokens. Returns `false` at end of input.
    fn fill(&mut self) -> Result<bool> {
        loop {
            let Some(text) = self.lines.next() else {
                if let Carry::String { .. } = self.carry {
                    return Err(Error::lex(
                        self.string_start,
                        format!("string opened on line {} is never closed", self.string_start),
                    ));
                }
                return Ok(false);
            };
            let text = text?;
            self.line += 1;

            let was_in_string = matches!(self.carry, Carry::String { .. });
            let mut tokenizer = Tokenizer::resume(&text, std::mem::take(&mut self.carry));
            let before = self.pending.len();
            self.pending.extend(tokenizer.by_ref());
            self.carry = tokenizer.into_carry();

            let emitted = self.pending.len() > before;
            if matches!(self.carry, Carry::String { .. }) && (!was_in_string || emitted) {
                self.string_start = self.line;
            }

            if emitted {
                return Ok(true);
            }
        }
    }

    /// Next token of the current physical line, never reading ahead.
    fn next_on_line(&mut self) -> Option<String> {
        self.pending.pop_front()
    }
}

impl<R: BufRead> TokenSource for RawLines<R> {
    fn next_token(&mut self) -> Result<Option<String>> {
        if self.pending.is_empty() && !self.fill()? {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }

    fn line(&self) -> usize {
        self.line
    }
}

/// Token cursor used by the parser.
///
/// The cursor only moves within the current logical line: [`seek`](Self::seek)
/// and [`pop_token`](Self::pop_token) refuse to step before its first token,
/// and [`find_next_pattern`](Self::find_next_pattern) never looks past its
/// last one.
pub struct TokenReader<R> {
    source: RawLines<R>,
    buffer: Vec<String>,
    index: usize,
    line: usize,
    lookahead: Option<(usize, Vec<String>)>,
}

impl<R: BufRead> TokenReader<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        TokenReader {
            source: RawLines::new(reader),
            buffer: Vec::new(),
            index: 0,
            line: 0,
            lookahead: None,
        }
    }

    /// Assembles the next non-empty logical line with comments removed.
    fn next_line(&mut self) -> Result<Option<(usize, Vec<String>)>> {
        loop {
            let Some(first) = self.source.next_token()? else {
                return Ok(None);
            };
            let line = self.source.line();
            let mut tokens = Vec::new();
            let mut next = Some(first);

            while let Some(token) = next {
                match token.as_str() {
                    // the tokenizer already dropped the rest of the line
                    LINE_COMMENT => {}
                    BLOCK_COMMENT_OPEN => {
                        self.source
                            .match_token(BLOCK_COMMENT_CLOSE, BLOCK_COMMENT_OPEN)?;
                    }
                    BLOCK_COMMENT_CLOSE => {
                        return Err(Error::lex(
                            self.source.line(),
                            "'*/' without an open block comment",
                        ));
                    }
                    _ => tokens.push(token),
                }
                next = self.source.next_on_line();
            }

            if !tokens.is_empty() {
                return Ok(Some((line, tokens)));
            }
        }
    }

    /// Moves to the next logical line. Returns `false` at end of input.
    fn advance_line(&mut self) -> Result<bool> {
        let next = match self.lookahead.take() {
            Some(loaded) => Some(loaded),
            None => self.next_line()?,
        };
        match next {
            Some((line, tokens)) => {
                self.line = line;
                self.buffer = tokens;
                self.index = 0;
                Ok(true)
            }
            None => {
                self.buffer.clear();
                self.index = 0;
                Ok(false)
            }
        }
    }

    /// Returns the next token and advances past it, loading lines as needed.
    /// `None` signals end of input.
    pub fn read_token(&mut self) -> Result<Option<String>> {
        if self.end_of_line() && !self.advance_line()? {
            return Ok(None);
        }
        let token = self.buffer.get(self.index).cloned();
        self.index += 1;
        Ok(token)
    }

    /// Returns the next token without consuming it, loading lines as needed.
    pub fn peek_token(&mut self) -> Result<Option<&str>> {
        if self.end_of_line() && !self.advance_line()? {
            return Ok(None);
        }
        Ok(self.buffer.get(self.index).map(String::as_str))
    }

    /// Returns the token `offset` places after the cursor on the current line.
    #[must_use]
    pub fn peek_on_line(&self, offset: usize) -> Option<&str> {
        self.buffer.get(self.index + offset).map(String::as_str)
    }

    /// Consumes the token at the cursor plus `offset` more. A negative offset
    /// steps back instead, but never before the start of the line.
    pub fn pop_token(&mut self, offset: isize) -> Result<()> {
        self.seek(offset + 1)
            .map_err(|_| Error::malformed_statement(self.line, "too many values popped"))
    }

    /// Moves the cursor by `offset` within the current line.
    pub fn seek(&mut self, offset: isize) -> Result<()> {
        let target = self.index as isize + offset;
        if target < 0 || target as usize > self.buffer.len() {
            return Err(Error::malformed_statement(
                self.line,
                format!("cannot seek {offset} from token {} of {}", self.index, self.buffer.len()),
            ));
        }
        self.index = target as usize;
        Ok(())
    }

    /// Looks for `pattern` as a contiguous run of tokens on the rest of the
    /// current line. Returns its start relative to the cursor.
    #[must_use]
    pub fn find_next_pattern(&self, pattern: &[&str]) -> Option<usize> {
        if pattern.is_empty() {
            return Some(0);
        }
        let rest = self.buffer.get(self.index..)?;
        rest.windows(pattern.len())
            .position(|window| window.iter().zip(pattern).all(|(token, want)| token == want))
    }

    /// `true` once every token of the current line has been consumed.
    #[must_use]
    pub fn end_of_line(&self) -> bool {
        self.index >= self.buffer.len()
    }

    /// `true` once no tokens remain anywhere in the input.
    pub fn end_of_stream(&mut self) -> Result<bool> {
        if !self.end_of_line() {
            return Ok(false);
        }
        if self.lookahead.is_none() {
            self.lookahead = self.next_line()?;
        }
        Ok(self.lookahead.is_none())
    }

    /// Line of the current logical line, or 0 before anything was read.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> TokenSource for TokenReader<R> {
    fn next_token(&mut self) -> Result<Option<String>> {
        self.read_token()
    }

    fn line(&self) -> usize {
        self.line
    }
}

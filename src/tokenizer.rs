//! Splitting a single line of Skopik text into tokens.
//!
//! [`Tokenizer`] is a lazy iterator over the tokens of one line. Whitespace
//! separates tokens and is never emitted; each structural operator becomes a
//! one-character token; quoted strings are emitted verbatim, quotes and
//! escapes included; the comment markers `//`, `/*` and `*/` are emitted as
//! their own tokens.
//!
//! Strings and block comments may run past the end of a line. The tokenizer
//! does not resolve that itself: once the line is exhausted,
//! [`Tokenizer::into_carry`] hands back a [`Carry`] which the caller feeds
//! into [`Tokenizer::resume`] together with the next line.
//!
//! ```rust
//! use skopik::tokenizer::Tokenizer;
//!
//! let tokens: Vec<String> = Tokenizer::new(r#"name = "a b"; list:[1,2]"#).collect();
//! assert_eq!(tokens, ["name", "=", "\"a b\"", ";", "list", ":", "[", "1", ",", "2", "]"]);
//! ```

use crate::charclass::{is_operator, is_quote, is_whitespace};

pub const LINE_COMMENT: &str = "//";
pub const BLOCK_COMMENT_OPEN: &str = "/*";
pub const BLOCK_COMMENT_CLOSE: &str = "*/";

const ESCAPE: char = '\\';

/// Lexical state left over at the end of a line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Carry {
    /// The line ended cleanly.
    #[default]
    Clear,
    /// The line ended inside a quoted string; `text` holds what was read so far.
    String { quote: char, text: String },
    /// The line ended inside `depth` nested block comments.
    Comment { depth: usize },
}

impl Carry {
    #[must_use]
    pub fn is_clear(&self) -> bool {
        matches!(self, Carry::Clear)
    }
}

/// Lazy tokenizer over a single line.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    line: &'a str,
    pos: usize,
    state: Carry,
    exhausted: bool,
}

impl<'a> Tokenizer<'a> {
    /// Starts tokenizing `line` from a clean state.
    #[must_use]
    pub fn new(line: &'a str) -> Self {
        Self::resume(line, Carry::Clear)
    }

    /// Continues tokenizing with the state the previous line ended in.
    #[must_use]
    pub fn resume(line: &'a str, carry: Carry) -> Self {
        Tokenizer {
            line,
            pos: 0,
            state: carry,
            exhausted: false,
        }
    }

    /// Consumes the tokenizer and returns the state to carry into the next line.
    ///
    /// Only meaningful once the iterator has been exhausted.
    #[must_use]
    pub fn into_carry(self) -> Carry {
        self.state
    }

    fn rest(&self) -> &'a str {
        let line = self.line;
        &line[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(is_whitespace);
        self.pos += rest.len() - trimmed.len();
    }

    fn take(&mut self, len: usize) -> String {
        let token = self.line[self.pos..self.pos + len].to_string();
        self.pos += len;
        token
    }

    /// Scans the body of an open string, appending to the carried text.
    /// Returns the finished token once the matching quote is found.
    fn scan_string(&mut self) -> Option<String> {
        let Carry::String { quote, mut text } = std::mem::take(&mut self.state) else {
            return None;
        };

        let mut escaped = false;

        for (offset, c) in self.rest().char_indices() {
            text.push(c);
            if escaped {
                escaped = false;
            } else if c == ESCAPE {
                escaped = true;
            } else if c == quote {
                self.pos += offset + c.len_utf8();
                return Some(text);
            }
        }

        // still open: keep the line break as part of the string
        self.pos = self.line.len();
        self.exhausted = true;
        text.push('\n');
        self.state = Carry::String { quote, text };
        None
    }

    fn next_in_comment(&mut self, depth: usize) -> Option<String> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with(BLOCK_COMMENT_OPEN) {
            self.state = Carry::Comment { depth: depth + 1 };
            return Some(self.take(2));
        }

        if rest.starts_with(BLOCK_COMMENT_CLOSE) {
            self.state = if depth > 1 {
                Carry::Comment { depth: depth - 1 }
            } else {
                Carry::Clear
            };
            return Some(self.take(2));
        }

        // inside a comment only the markers matter
        let len = word_len(rest, |_| false);
        Some(self.take(len))
    }

    fn next_in_code(&mut self) -> Option<String> {
        self.skip_whitespace();
        let rest = self.rest();
        let c = rest.chars().next()?;

        if rest.starts_with(LINE_COMMENT) {
            // nothing after a line comment is lexed
            self.pos = self.line.len();
            return Some(LINE_COMMENT.to_string());
        }

        if rest.starts_with(BLOCK_COMMENT_OPEN) {
            self.state = Carry::Comment { depth: 1 };
            return Some(self.take(2));
        }

        if rest.starts_with(BLOCK_COMMENT_CLOSE) {
            return Some(self.take(2));
        }

        if is_quote(c) {
            self.pos += c.len_utf8();
            self.state = Carry::String {
                quote: c,
                text: c.to_string(),
            };
            return self.scan_string();
        }

        if is_operator(c) {
            return Some(self.take(c.len_utf8()));
        }

        let len = word_len(rest, is_operator);
        Some(self.take(len))
    }
}

/// Length in bytes of the bare word at the start of `rest`.
fn word_len(rest: &str, is_break: impl Fn(char) -> bool) -> usize {
    let mut end = 0;
    for (offset, c) in rest.char_indices() {
        if is_whitespace(c) || is_break(c) {
            break;
        }
        let tail = &rest[offset..];
        if offset > 0
            && (tail.starts_with(LINE_COMMENT)
                || tail.starts_with(BLOCK_COMMENT_OPEN)
                || tail.starts_with(BLOCK_COMMENT_CLOSE))
        {
            break;
        }
        end = offset + c.len_utf8();
    }
    end
}

impl Iterator for Tokenizer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        match self.state {
            Carry::Clear => self.next_in_code(),
            Carry::String { .. } => self.scan_string(),
            Carry::Comment { depth } => self.next_in_comment(depth),
        }
    }
}

/// Tokenizes a whole line from a clean state.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    Tokenizer::new(line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_a_delimiter() {
        assert_eq!(tokenize("  a   b\tc  "), ["a", "b", "c"]);
        assert!(tokenize("   \t ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_operators_are_single_tokens() {
        assert_eq!(tokenize("a=b"), ["a", "=", "b"]);
        assert_eq!(tokenize("x:{y=1;}"), ["x", ":", "{", "y", "=", "1", ";", "}"]);
        assert_eq!(tokenize("(1,2)"), ["(", "1", ",", "2", ")"]);
        assert_eq!(tokenize("[5]:9"), ["[", "5", "]", ":", "9"]);
        assert_eq!(tokenize("@tag"), ["@", "tag"]);
    }

    #[test]
    fn test_strings_keep_quotes_and_escapes() {
        assert_eq!(tokenize(r#""hello world""#), [r#""hello world""#]);
        assert_eq!(tokenize(r#"'a;b,c'"#), ["'a;b,c'"]);
        assert_eq!(tokenize(r#""say \"hi\"" x"#), [r#""say \"hi\"""#, "x"]);
        assert_eq!(tokenize(r#""it's""#), [r#""it's""#]);
        assert_eq!(tokenize(r#"'say "hi"'"#), [r#"'say "hi"'"#]);
    }

    #[test]
    fn test_quote_closes_a_bare_word() {
        assert_eq!(tokenize(r#"abc"def""#), ["abc", "\"def\""]);
    }

    #[test]
    fn test_unterminated_string_is_carried() {
        let mut tokenizer = Tokenizer::new(r#"a = "first"#);
        let tokens: Vec<_> = tokenizer.by_ref().collect();
        assert_eq!(tokens, ["a", "="]);

        let carry = tokenizer.into_carry();
        assert_eq!(
            carry,
            Carry::String {
                quote: '"',
                text: "\"first\n".to_string()
            }
        );

        let mut tokenizer = Tokenizer::resume(r#"second" b"#, carry);
        let tokens: Vec<_> = tokenizer.by_ref().collect();
        assert_eq!(tokens, ["\"first\nsecond\"", "b"]);
        assert!(tokenizer.into_carry().is_clear());
    }

    #[test]
    fn test_line_comment_ends_the_line() {
        assert_eq!(tokenize("x = 5 // it's five"), ["x", "=", "5", "//"]);
        assert_eq!(tokenize("x = 5// no space"), ["x", "=", "5", "//"]);
        assert_eq!(tokenize(r#"s = "a//b""#), ["s", "=", r#""a//b""#]);
    }

    #[test]
    fn test_block_comment_markers() {
        assert_eq!(
            tokenize("a /* it's fine */ b"),
            ["a", "/*", "it's", "fine", "*/", "b"]
        );
        assert_eq!(tokenize("/*x*/y"), ["/*", "x", "*/", "y"]);
    }

    #[test]
    fn test_nested_block_comment_carry() {
        let mut tokenizer = Tokenizer::new("a /* one /* two */");
        let tokens: Vec<_> = tokenizer.by_ref().collect();
        assert_eq!(tokens, ["a", "/*", "one", "/*", "two", "*/"]);
        let carry = tokenizer.into_carry();
        assert_eq!(carry, Carry::Comment { depth: 1 });

        let mut tokenizer = Tokenizer::resume("\"q */ b", carry);
        let tokens: Vec<_> = tokenizer.by_ref().collect();
        assert_eq!(tokens, ["\"q", "*/", "b"]);
        assert!(tokenizer.into_carry().is_clear());
    }

    #[test]
    fn test_restartable() {
        let tokenizer = Tokenizer::new("a b c");
        let first: Vec<_> = tokenizer.clone().collect();
        let second: Vec<_> = tokenizer.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_numbers_stay_whole() {
        assert_eq!(tokenize("-1.5e-3f 0xFFuL 101b"), ["-1.5e-3f", "0xFFuL", "101b"]);
    }
}

//! Classification and decoding of single tokens.
//!
//! [`classify`] decides what a token means on its own: a structural
//! [`Operator`], one of the keywords `true`, `false` and `null` (matched
//! case-insensitively), a quoted string, a numeric literal or a bare word.
//! Numeric literals are validated by [`scan_number`], a small state machine
//! over the numeric grammar, and turned into a value by
//! [`NumberLiteral::decode`].
//!
//! ## Numeric literals
//!
//! | Spelling | Kind |
//! |---|---|
//! | `42`, `-7`, `0x2A` | `Int32` |
//! | `42L` | `Int64` |
//! | `42u`, `0xFFu` | `UInt32` |
//! | `42uL` | `UInt64` |
//! | `1.5`, `1e3`, `2d` | `Float64` |
//! | `1.5f` | `Float32` |
//! | `1011b` | `Binary` |
//!
//! ```rust
//! use skopik::literal::{classify, TokenClass};
//! use skopik::{Kind, Value};
//!
//! let TokenClass::Number(literal) = classify("0xFFu").unwrap() else { panic!() };
//! assert_eq!(literal.kind(), Kind::UInt32);
//! assert_eq!(literal.decode().unwrap().as_u32(), Some(255));
//!
//! assert!(classify("1.2.3").is_err());
//! assert!(matches!(classify("truex").unwrap(), TokenClass::Word));
//! ```

use crate::charclass::{is_digit, is_letter};
use crate::error::{Error, Result};
use crate::value::{Bits, IntFormat, Kind, Number, Value};

const HEX_PREFIX: &str = "0x";
const ESCAPE: char = '\\';

/// The three container blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Scope,
    Array,
    Tuple,
}

impl BlockKind {
    #[must_use]
    pub const fn open_token(self) -> &'static str {
        match self {
            BlockKind::Scope => "{",
            BlockKind::Array => "[",
            BlockKind::Tuple => "(",
        }
    }

    #[must_use]
    pub const fn close_token(self) -> &'static str {
        match self {
            BlockKind::Scope => "}",
            BlockKind::Array => "]",
            BlockKind::Tuple => ")",
        }
    }

    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            BlockKind::Scope => Kind::Scope,
            BlockKind::Array => Kind::Array,
            BlockKind::Tuple => Kind::Tuple,
        }
    }
}

/// Single-character structural operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    ScopeOpen,
    ScopeClose,
    ArrayOpen,
    ArrayClose,
    TupleOpen,
    TupleClose,
    /// `=`
    Assign,
    /// `:`
    Block,
    /// `;`
    ScopeSeparator,
    /// `,`
    ElementSeparator,
    /// `@`
    At,
}

impl Operator {
    /// Looks up a one-character token in the operator table.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Operator> {
        let mut chars = token.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let op = match c {
            '{' => Operator::ScopeOpen,
            '}' => Operator::ScopeClose,
            '[' => Operator::ArrayOpen,
            ']' => Operator::ArrayClose,
            '(' => Operator::TupleOpen,
            ')' => Operator::TupleClose,
            '=' => Operator::Assign,
            ':' => Operator::Block,
            ';' => Operator::ScopeSeparator,
            ',' => Operator::ElementSeparator,
            '@' => Operator::At,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Operator::ScopeOpen => '{',
            Operator::ScopeClose => '}',
            Operator::ArrayOpen => '[',
            Operator::ArrayClose => ']',
            Operator::TupleOpen => '(',
            Operator::TupleClose => ')',
            Operator::Assign => '=',
            Operator::Block => ':',
            Operator::ScopeSeparator => ';',
            Operator::ElementSeparator => ',',
            Operator::At => '@',
        }
    }

    /// The block this operator opens, if it opens one.
    #[must_use]
    pub const fn opens(self) -> Option<BlockKind> {
        match self {
            Operator::ScopeOpen => Some(BlockKind::Scope),
            Operator::ArrayOpen => Some(BlockKind::Array),
            Operator::TupleOpen => Some(BlockKind::Tuple),
            _ => None,
        }
    }

    /// The block this operator closes, if it closes one.
    #[must_use]
    pub const fn closes(self) -> Option<BlockKind> {
        match self {
            Operator::ScopeClose => Some(BlockKind::Scope),
            Operator::ArrayClose => Some(BlockKind::Array),
            Operator::TupleClose => Some(BlockKind::Tuple),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_separator(self) -> bool {
        matches!(self, Operator::ScopeSeparator | Operator::ElementSeparator)
    }
}

/// What a single token is, before any context is taken into account.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenClass<'a> {
    Operator(Operator),
    Bool(bool),
    Null,
    /// A quoted string, quotes still attached.
    Quoted,
    /// Anything else: an unquoted string.
    Word,
    Number(NumberLiteral<'a>),
}

/// Classifies one token.
///
/// Numeric-looking tokens (starting with a digit, `-` or `.`) must follow the
/// numeric grammar. Errors carry line 0 since a token has no position of its own.
pub fn classify(token: &str) -> Result<TokenClass<'_>> {
    if let Some(op) = Operator::from_token(token) {
        return Ok(TokenClass::Operator(op));
    }

    if token.eq_ignore_ascii_case("true") {
        return Ok(TokenClass::Bool(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(TokenClass::Bool(false));
    }
    if token.eq_ignore_ascii_case("null") {
        return Ok(TokenClass::Null);
    }

    if is_quoted(token) {
        return Ok(TokenClass::Quoted);
    }

    match token.chars().next() {
        Some(c) if is_digit(c) || c == '-' || c == '.' => {
            scan_number(token).map(TokenClass::Number)
        }
        _ => Ok(TokenClass::Word),
    }
}

/// A validated numeric literal, split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberLiteral<'a> {
    token: &'a str,
    kind: Kind,
    format: IntFormat,
    negative: bool,
    digits: &'a str,
}

#[derive(Default)]
struct Suffix {
    binary: bool,
    double: bool,
    float: bool,
    unsigned: bool,
    long: bool,
}

impl Suffix {
    fn parse(letters: &str, token: &str) -> Result<Suffix> {
        let mut suffix = Suffix::default();
        for c in letters.chars() {
            let flag = match c {
                'b' => &mut suffix.binary,
                'd' => &mut suffix.double,
                'f' => &mut suffix.float,
                'u' | 'U' => &mut suffix.unsigned,
                'L' => &mut suffix.long,
                _ => {
                    return Err(Error::malformed_number(
                        0,
                        token,
                        format!("unknown suffix letter '{c}'"),
                    ))
                }
            };
            if *flag {
                return Err(Error::malformed_number(
                    0,
                    token,
                    format!("suffix letter '{c}' appears twice"),
                ));
            }
            *flag = true;
        }
        Ok(suffix)
    }

    fn is_integer(&self) -> bool {
        self.unsigned || self.long
    }

    fn is_float(&self) -> bool {
        self.float || self.double
    }
}

/// Runs the numeric grammar over `token`.
///
/// ```rust
/// use skopik::literal::scan_number;
/// use skopik::{IntFormat, Kind};
///
/// let literal = scan_number("-0x10").unwrap();
/// assert_eq!(literal.kind(), Kind::Int32);
/// assert_eq!(literal.format(), IntFormat::Hexadecimal);
/// assert!(literal.is_negative());
///
/// for bad in ["1.2.3", "1e", "--1", "1e-e2", "0x"] {
///     assert!(scan_number(bad).is_err(), "{bad}");
/// }
/// ```
pub fn scan_number(token: &str) -> Result<NumberLiteral<'_>> {
    let malformed = |msg: &str| Error::malformed_number(0, token, msg);

    let (negative, unsigned_part) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (hex, body) = match unsigned_part.strip_prefix(HEX_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, unsigned_part),
    };

    let mut seen_digit = false;
    let mut seen_point = false;
    let mut exponent_at: Option<usize> = None;
    let mut exponent_digits = false;
    let mut prev: Option<char> = None;
    let mut end = body.len();

    for (i, c) in body.char_indices() {
        match c {
            c if is_digit(c) => {
                seen_digit = true;
                if exponent_at.is_some() {
                    exponent_digits = true;
                }
            }
            c if hex && c.is_ascii_hexdigit() => seen_digit = true,
            '.' if hex => return Err(malformed("a hexadecimal literal cannot have a decimal point")),
            '.' => {
                if seen_point {
                    return Err(malformed("second decimal point"));
                }
                if exponent_at.is_some() {
                    return Err(malformed("decimal point inside the exponent"));
                }
                if !seen_digit {
                    return Err(malformed("decimal point with no preceding digit"));
                }
                seen_point = true;
            }
            'e' | 'E' if !hex => {
                if exponent_at.is_some() {
                    return Err(malformed("second exponent marker"));
                }
                if !seen_digit {
                    return Err(malformed("exponent marker with no preceding digit or decimal point"));
                }
                exponent_at = Some(i);
            }
            '-' => {
                if hex || !matches!(prev, Some('e' | 'E')) {
                    return Err(malformed(
                        "'-' may only start the literal or follow the exponent marker",
                    ));
                }
            }
            c if is_letter(c) => {
                end = i;
                break;
            }
            c => {
                return Err(Error::malformed_number(
                    0,
                    token,
                    format!("unexpected character '{c}'"),
                ))
            }
        }
        prev = Some(c);
    }

    if !seen_digit {
        return Err(malformed(if hex {
            "hexadecimal literal has no digits"
        } else {
            "no digits"
        }));
    }
    if exponent_at.is_some() && !exponent_digits {
        return Err(malformed("exponent marker with no digits after it"));
    }

    let digits = &body[..end];
    let suffix = Suffix::parse(&body[end..], token)?;
    let fractional = seen_point || exponent_at.is_some();

    if suffix.binary && (suffix.is_integer() || suffix.is_float()) {
        return Err(malformed("a binary literal cannot carry another numeric suffix"));
    }
    if suffix.binary && fractional {
        return Err(malformed("a binary literal cannot have a decimal point or exponent"));
    }
    if suffix.is_float() && suffix.is_integer() {
        return Err(malformed("floating point and integer suffixes cannot be combined"));
    }
    if suffix.float && suffix.double {
        return Err(malformed("'f' and 'd' suffixes cannot be combined"));
    }
    if fractional && suffix.is_integer() {
        return Err(malformed("an integer suffix cannot follow a decimal point or exponent"));
    }
    if negative && suffix.unsigned {
        return Err(malformed("an unsigned literal cannot be negative"));
    }

    let kind = if suffix.binary {
        Kind::Binary
    } else if suffix.double {
        Kind::Float64
    } else if suffix.float {
        Kind::Float32
    } else if suffix.unsigned && suffix.long {
        Kind::UInt64
    } else if suffix.unsigned {
        Kind::UInt32
    } else if suffix.long {
        Kind::Int64
    } else if fractional {
        Kind::Float64
    } else {
        Kind::Int32
    };

    let format = if hex {
        IntFormat::Hexadecimal
    } else if suffix.binary {
        IntFormat::Binary
    } else {
        IntFormat::Default
    };

    Ok(NumberLiteral {
        token,
        kind,
        format,
        negative,
        digits,
    })
}

impl<'a> NumberLiteral<'a> {
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn format(&self) -> IntFormat {
        self.format
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The literal with sign, prefix and suffix removed.
    #[must_use]
    pub fn digits(&self) -> &'a str {
        self.digits
    }

    #[must_use]
    pub fn token(&self) -> &'a str {
        self.token
    }

    fn malformed(&self, msg: impl Into<String>) -> Error {
        Error::malformed_number(0, self.token, msg)
    }

    /// Decodes the literal into a scalar value of its kind.
    pub fn decode(&self) -> Result<Value> {
        match self.kind {
            Kind::Binary => self.decode_bits().map(Value::Bits),
            Kind::Float32 | Kind::Float64 => self.decode_float(),
            _ => self.decode_integer(),
        }
    }

    fn decode_bits(&self) -> Result<Bits> {
        if !self.digits.chars().all(|c| c == '0' || c == '1') {
            return Err(self.malformed("a binary literal may only contain 0 and 1"));
        }
        if self.digits.len() > 32 {
            return Err(self.malformed("a binary literal holds at most 32 digits"));
        }
        let bits = u32::from_str_radix(self.digits, 2)
            .map_err(|err| self.malformed(err.to_string()))?;
        if self.negative {
            Ok(Bits::new((bits as i32).wrapping_neg() as u32, 32))
        } else {
            Ok(Bits::new(bits, self.digits.len() as u8))
        }
    }

    fn decode_float(&self) -> Result<Value> {
        let text = if self.negative {
            format!("-{}", self.digits)
        } else {
            self.digits.to_string()
        };
        let number = if self.kind == Kind::Float32 {
            text.parse::<f32>().map(Number::Float32)
        } else {
            text.parse::<f64>().map(Number::Float64)
        }
        .map_err(|err| self.malformed(err.to_string()))?;
        Ok(Value::Number(number, self.format))
    }

    fn decode_integer(&self) -> Result<Value> {
        let hex = self.format == IntFormat::Hexadecimal;
        let radix = if hex { 16 } else { 10 };
        let magnitude = u64::from_str_radix(self.digits, radix)
            .map_err(|_| self.malformed(format!("does not fit in {}", self.kind)))?;
        let too_big = || self.malformed(format!("does not fit in {}", self.kind));

        let number = if hex {
            // hexadecimal spells a bit pattern of the target width
            match self.kind {
                Kind::Int32 => {
                    let bits = u32::try_from(magnitude).map_err(|_| too_big())? as i32;
                    Number::Int32(if self.negative { bits.wrapping_neg() } else { bits })
                }
                Kind::Int64 => {
                    let bits = magnitude as i64;
                    Number::Int64(if self.negative { bits.wrapping_neg() } else { bits })
                }
                Kind::UInt32 => Number::UInt32(u32::try_from(magnitude).map_err(|_| too_big())?),
                _ => Number::UInt64(magnitude),
            }
        } else {
            let signed = if self.negative {
                -i128::from(magnitude)
            } else {
                i128::from(magnitude)
            };
            match self.kind {
                Kind::Int32 => Number::Int32(i32::try_from(signed).map_err(|_| too_big())?),
                Kind::Int64 => Number::Int64(i64::try_from(signed).map_err(|_| too_big())?),
                Kind::UInt32 => Number::UInt32(u32::try_from(signed).map_err(|_| too_big())?),
                _ => Number::UInt64(u64::try_from(signed).map_err(|_| too_big())?),
            }
        };
        Ok(Value::Number(number, self.format))
    }
}

/// Classifies and decodes a token that should be a scalar.
///
/// Quoted strings are unquoted, bare words become strings as written.
/// Operators are not scalars and produce `None`.
pub fn decode_scalar(token: &str) -> Result<Option<Value>> {
    let value = match classify(token)? {
        TokenClass::Operator(_) => return Ok(None),
        TokenClass::Bool(b) => Value::Bool(b),
        TokenClass::Null => Value::Null,
        TokenClass::Quoted => Value::String(unquote(token).unwrap_or_else(|| token.to_string())),
        TokenClass::Word => Value::String(token.to_string()),
        TokenClass::Number(literal) => literal.decode()?,
    };
    Ok(Some(value))
}

/// `true` if the token is a complete quoted string.
#[must_use]
pub fn is_quoted(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) => open == close,
        _ => false,
    }
}

/// Strips the quotes from a quoted token and resolves its escape sequences.
///
/// Returns `None` if the token is not quoted.
///
/// ```rust
/// use skopik::literal::unquote;
///
/// assert_eq!(unquote(r#""a\tb""#).as_deref(), Some("a\tb"));
/// assert_eq!(unquote(r#"'say \"hi\"'"#).as_deref(), Some("say \"hi\""));
/// assert_eq!(unquote("bare"), None);
/// ```
#[must_use]
pub fn unquote(token: &str) -> Option<String> {
    if !is_quoted(token) {
        return None;
    }
    let inner = &token[1..token.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }
    Some(out)
}

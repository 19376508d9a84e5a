//! Character classification for the Skopik lexer.
//!
//! Every ASCII character maps to a [`CharClass`] flag set through a table
//! built at compile time, so classification is a single lookup and needs no
//! initialization or synchronization. Characters outside the ASCII range
//! classify as the empty set and are treated as ordinary word characters.
//!
//! ```rust
//! use skopik::charclass::{classify, CharClass};
//!
//! assert!(classify('7').contains(CharClass::DIGIT));
//! assert!(classify('Q').contains(CharClass::LETTER | CharClass::UPPERCASE));
//! assert!(classify('"').contains(CharClass::QUOTE | CharClass::OPERATOR));
//! assert!(classify('é').is_empty());
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A bit set of lexical roles a character can play.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharClass(u16);

impl CharClass {
    pub const NONE: CharClass = CharClass(0);
    pub const DIGIT: CharClass = CharClass(1 << 0);
    pub const LETTER: CharClass = CharClass(1 << 1);
    pub const LOWERCASE: CharClass = CharClass(1 << 2);
    pub const UPPERCASE: CharClass = CharClass(1 << 3);
    pub const WHITESPACE: CharClass = CharClass(1 << 4);
    pub const NEWLINE: CharClass = CharClass(1 << 5);
    pub const QUOTE: CharClass = CharClass(1 << 6);
    pub const NULL: CharClass = CharClass(1 << 7);
    /// Structural operators: `{ } [ ] ( ) = : ; , @ " '`
    pub const OPERATOR: CharClass = CharClass(1 << 8);

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns `true` if every flag in `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: CharClass) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any flag in `other` is set.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: CharClass) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    const fn union(self, other: CharClass) -> CharClass {
        CharClass(self.0 | other.0)
    }
}

impl BitOr for CharClass {
    type Output = CharClass;

    fn bitor(self, rhs: CharClass) -> CharClass {
        self.union(rhs)
    }
}

impl BitOrAssign for CharClass {
    fn bitor_assign(&mut self, rhs: CharClass) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CharClass {
    type Output = CharClass;

    fn bitand(self, rhs: CharClass) -> CharClass {
        CharClass(self.0 & rhs.0)
    }
}

impl fmt::Debug for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(CharClass, &str); 9] = [
            (CharClass::DIGIT, "DIGIT"),
            (CharClass::LETTER, "LETTER"),
            (CharClass::LOWERCASE, "LOWERCASE"),
            (CharClass::UPPERCASE, "UPPERCASE"),
            (CharClass::WHITESPACE, "WHITESPACE"),
            (CharClass::NEWLINE, "NEWLINE"),
            (CharClass::QUOTE, "QUOTE"),
            (CharClass::NULL, "NULL"),
            (CharClass::OPERATOR, "OPERATOR"),
        ];

        let mut set = f.debug_set();
        for (flag, name) in NAMES {
            if self.contains(flag) {
                set.entry(&format_args!("{}", name));
            }
        }
        set.finish()
    }
}

const CHAR_CLASS_TABLE: [CharClass; 128] = {
    let mut table = [CharClass::NONE; 128];
    let mut i = 0;

    while i < 128 {
        let c = i as u8;
        let mut flags = CharClass::NONE;

        if c.is_ascii_digit() {
            flags = flags.union(CharClass::DIGIT);
        }

        if c.is_ascii_lowercase() {
            flags = flags.union(CharClass::LETTER).union(CharClass::LOWERCASE);
        }

        if c.is_ascii_uppercase() {
            flags = flags.union(CharClass::LETTER).union(CharClass::UPPERCASE);
        }

        // vertical tab and form feed count as blanks too
        if matches!(c, b' ' | b'\t' | b'\r' | 0x0B | 0x0C) {
            flags = flags.union(CharClass::WHITESPACE);
        }

        if matches!(c, b'\n' | b'\r') {
            flags = flags.union(CharClass::NEWLINE).union(CharClass::WHITESPACE);
        }

        if matches!(c, b'"' | b'\'') {
            flags = flags.union(CharClass::QUOTE);
        }

        if c == 0 {
            flags = flags.union(CharClass::NULL);
        }

        if matches!(
            c,
            b'{' | b'}' | b'[' | b']' | b'(' | b')' | b'=' | b':' | b';' | b',' | b'@' | b'"' | b'\''
        ) {
            flags = flags.union(CharClass::OPERATOR);
        }

        table[i] = flags;
        i += 1;
    }

    table
};

/// Classifies a character. Total over `char`; non-ASCII characters have no flags.
#[inline]
#[must_use]
pub fn classify(c: char) -> CharClass {
    let code = c as u32;
    if code < 128 {
        CHAR_CLASS_TABLE[code as usize]
    } else {
        CharClass::NONE
    }
}

#[inline]
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    classify(c).contains(CharClass::WHITESPACE)
}

#[inline]
#[must_use]
pub fn is_operator(c: char) -> bool {
    classify(c).contains(CharClass::OPERATOR)
}

#[inline]
#[must_use]
pub fn is_quote(c: char) -> bool {
    classify(c).contains(CharClass::QUOTE)
}

#[inline]
#[must_use]
pub fn is_digit(c: char) -> bool {
    classify(c).contains(CharClass::DIGIT)
}

#[inline]
#[must_use]
pub fn is_letter(c: char) -> bool {
    classify(c).contains(CharClass::LETTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_and_letters() {
        for c in '0'..='9' {
            assert_eq!(classify(c), CharClass::DIGIT);
        }
        assert_eq!(
            classify('a'),
            CharClass::LETTER | CharClass::LOWERCASE
        );
        assert_eq!(
            classify('Z'),
            CharClass::LETTER | CharClass::UPPERCASE
        );
    }

    #[test]
    fn test_whitespace_and_newline() {
        assert!(is_whitespace(' '));
        assert!(is_whitespace('\t'));
        assert!(classify('\n').contains(CharClass::NEWLINE));
        assert!(classify('\r').contains(CharClass::NEWLINE | CharClass::WHITESPACE));
        assert!(!is_whitespace('x'));
    }

    #[test]
    fn test_operator_alphabet() {
        for c in "{}[]()=:;,@\"'".chars() {
            assert!(is_operator(c), "{c:?} should be an operator");
        }
        for c in "-./*+_#".chars() {
            assert!(!is_operator(c), "{c:?} should not be an operator");
        }
        assert!(is_quote('"') && is_quote('\''));
    }

    #[test]
    fn test_null_and_non_ascii() {
        assert_eq!(classify('\0'), CharClass::NULL);
        assert!(classify('ß').is_empty());
        assert!(classify('\u{7F}').is_empty());
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0u8..128).map(|b| classify(b as char)).collect::<Vec<_>>()))
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_debug_lists_flags() {
        let dbg = format!("{:?}", classify('a'));
        assert!(dbg.contains("LETTER"));
        assert!(dbg.contains("LOWERCASE"));
    }
}

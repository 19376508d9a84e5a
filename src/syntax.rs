//! The Skopik format, as accepted by this library.
//!
//! This module holds no code. It describes the text the parser reads and
//! the tree it builds.
//!
//! # Documents
//!
//! A document is a sequence of statements. The statements live in an
//! implicit root scope, which is named `<global>` by default, or after the
//! file stem when the document is loaded with [`parse_file`](crate::parse_file).
//!
//! ```text
//! name = value           // assignment
//! name:{ ... }           // named scope
//! name:[ ... ]           // named array
//! name:( ... )           // named tuple
//! name                   // declared with no value: null
//! ```
//!
//! A statement may end with `;` or `,`. A line break also ends it, so
//! separators are optional. Reusing a name replaces the earlier value but
//! keeps its original position.
//!
//! # Tokens
//!
//! Whitespace separates tokens. These characters are always tokens of
//! their own, even without surrounding whitespace:
//!
//! | Operator | Meaning |
//! |----------|---------|
//! | `{` `}` | open and close a scope |
//! | `[` `]` | open and close an array, or wrap an explicit index |
//! | `(` `)` | open and close a tuple |
//! | `=` | assignment |
//! | `:` | introduces a block, or follows an explicit index |
//! | `;` | scope separator |
//! | `,` | element separator |
//! | `@` | reserved for references |
//!
//! ## Comments
//!
//! `//` comments out the rest of the line. `/* ... */` comments out a
//! block and may span lines; block comments nest. When a block comment
//! spans lines, the tokens before and after it join into one logical line.
//! Comment markers inside a quoted string are plain text.
//!
//! # Values
//!
//! ## Keywords
//!
//! `true`, `false` and `null`, in any letter case.
//!
//! ## Strings
//!
//! A quoted string uses `"` or `'` and may contain operators, whitespace,
//! and line breaks, which are kept in the value. The escapes `\n`, `\t`,
//! `\r`, `\0`, `\\`, `\"` and `\'` are decoded; any other backslash
//! sequence is kept as written.
//!
//! Any other token that is not an operator, keyword or number is a
//! bare word and is read as a string: `host = db1`.
//!
//! ## Numbers
//!
//! A token starting with a digit, `-` or `.` is a number; a fraction needs
//! a digit on both sides of the point. Its kind comes from its spelling:
//!
//! | Spelling | Kind | Example |
//! |----------|------|---------|
//! | digits | 32-bit integer | `42`, `-7` |
//! | `u` / `U` suffix | unsigned 32-bit | `42u` |
//! | `L` suffix | 64-bit integer | `42L` |
//! | `uL` / `UL` suffix | unsigned 64-bit | `42uL` |
//! | `.` or exponent | 64-bit float | `1.5`, `1.5e3` |
//! | `f` suffix | 32-bit float | `1.5f` |
//! | `d` suffix | 64-bit float | `1d` |
//! | `0x` prefix | hexadecimal integer | `0xFF`, `0xFFuL` |
//! | `b` suffix | bit string, up to 32 digits | `1010b` |
//!
//! Hexadecimal integers without `u` are bit patterns, so `0xFFFFFFFF` is
//! `-1`. A hexadecimal literal cannot have a fraction or exponent, and an
//! unsigned literal cannot be negative. A bit string remembers how many
//! digits were written; a negative bit string holds the 32-bit two's
//! complement of its magnitude.
//!
//! A decimal integer that does not fit its kind is an error, as is any
//! malformed number such as `1..2` or `12x`. With
//! [`ParseOptions::lenient_numbers`](crate::ParseOptions::lenient_numbers)
//! such literals become `null` and a warning is logged instead.
//!
//! # Containers
//!
//! ## Scopes
//!
//! ```text
//! server:{
//!     host = db1
//!     port = 5432u
//! }
//! ```
//!
//! A scope holds named entries. A block written directly as a value is
//! anonymous: `point = { x = 1; y = 2 }`.
//!
//! ## Arrays
//!
//! ```text
//! ports = [80, 443, 8080]
//! sparse = [1, [4]: 5, 6]     // 1, null, null, null, 5, 6
//! ```
//!
//! Elements may be of any kind. `[n]:` before an element places it at
//! index `n`; the gap is filled with `null`. An explicit index must not be
//! lower than the number of elements already present, and must be a plain
//! decimal or hexadecimal integer.
//!
//! ## Tuples
//!
//! ```text
//! origin = (0.0f, 0.0f, 1.0f)
//! ```
//!
//! Every element of a tuple has the same kind as the first one. Bit
//! strings of different widths count as the same kind.
//!
//! ## Inline named blocks
//!
//! Inside an array or tuple, `name:{ ... }` produces a named container
//! element.
//!
//! # Degradation
//!
//! An operator found where a value belongs becomes `null` and a warning is
//! logged. A closing bracket in that position is left for the enclosing
//! block. Every other problem aborts the parse with an
//! [`Error`](crate::Error) naming the line.

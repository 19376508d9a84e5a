//! # skopik
//!
//! A parser and document model for the Skopik structured data format.
//!
//! ## What is Skopik?
//!
//! Skopik is a small, line-oriented text format for configuration and data
//! files. A document is a sequence of named statements inside an implicit
//! root scope. Values are scalars (booleans, null, strings, and numbers in
//! several widths and spellings) or one of three containers:
//!
//! - **Scope** `{ ... }`: named entries, last write wins
//! - **Array** `[ ... ]`: ordered elements of any kind, with optional
//!   explicit indices that may leave gaps
//! - **Tuple** `( ... )`: ordered elements that must all share one kind
//!
//! ```text
//! // a comment
//! name = "example";
//! retries = 3
//! mask = 0xFFu
//! flags = 1010b
//!
//! server:{
//!     host = db1
//!     ports = [80, 443, [5]: 8080]
//!     origin = (0.0f, 0.0f)
//! }
//! ```
//!
//! See the [`syntax`] module for the full description of the format.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! skopik = "0.1"
//! ```
//!
//! ### Reading a document
//!
//! ```rust
//! use skopik::{parse_str, Kind, Value};
//!
//! let root = parse_str(
//!     "server:{ host = db1; ports = [80, 443] }\nretries = 3",
//! ).unwrap();
//!
//! assert_eq!(root.name(), "<global>");
//! assert_eq!(root.get("retries").and_then(Value::as_i32), Some(3));
//!
//! let root = Value::Scope(root);
//! assert_eq!(root.lookup("server.host").and_then(Value::as_str), Some("db1"));
//! assert_eq!(root.lookup("server.ports.1").and_then(Value::as_u64), Some(443));
//! assert_eq!(root.lookup("server.ports").map(Value::kind), Some(Kind::Array));
//! ```
//!
//! ### Binding to Rust types
//!
//! ```rust
//! use serde::Deserialize;
//! use skopik::from_str;
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let point: Point = from_str("x = 1; y = 2").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! ## Errors and diagnostics
//!
//! Every parse error carries the 1-based line it was found on (see
//! [`Error::line`]). Non-fatal degradations, such as an operator where a
//! value was expected, become `null` and are reported through the [`log`]
//! facade at `warn` level; the library itself never prints.
//!
//! ## Limits
//!
//! Block nesting is bounded by [`ParseOptions::max_depth`] and the array
//! length an explicit index may produce by [`ParseOptions::max_array_len`].
//! A parse is single-threaded and synchronous. A finished tree is plain owned data and
//! may be shared freely.
//!
//! ## Examples
//!
//! The `demos/` directory contains runnable examples:
//!
//! - **`simple.rs`** - parse a document and read values out of it
//! - **`binding.rs`** - deserialize a document into typed structs
//! - **`dump.rs`** - parse a file repeatedly, print timings and the tree
//!
//! Run any example with: `cargo run --example <name>`

pub mod charclass;
pub mod de;
pub mod error;
pub mod literal;
pub mod map;
pub mod options;
pub mod parser;
pub mod reader;
pub mod reference;
pub mod syntax;
pub mod tokenizer;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use map::ScopeMap;
pub use options::ParseOptions;
pub use parser::{parse, parse_with_options, Parser};
pub use reader::{TokenReader, TokenSource};
pub use reference::Reference;
pub use value::{Array, Bits, IntFormat, Kind, Number, Scope, Tuple, Value};

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Parses a document held in a string.
///
/// The root scope is named `<global>`.
///
/// # Examples
///
/// ```rust
/// use skopik::parse_str;
///
/// let root = parse_str("a = 1; b:{ c = true }").unwrap();
/// assert_eq!(root.len(), 2);
/// assert_eq!(root.get("b").and_then(|b| b.get("c")).and_then(|c| c.as_bool()), Some(true));
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a well-formed document. The error
/// names the line where the problem was found.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(s: &str) -> Result<Scope> {
    parse_str_with_options(s, &ParseOptions::default())
}

/// Parses a document held in a string with custom options.
///
/// # Errors
///
/// Returns an error if the text is not a well-formed document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str_with_options(s: &str, options: &ParseOptions) -> Result<Scope> {
    parse_with_options(s.as_bytes(), options)
}

/// Parses a document from bytes of UTF-8 text.
///
/// # Examples
///
/// ```rust
/// use skopik::parse_slice;
///
/// let root = parse_slice(b"x = 0x10").unwrap();
/// assert_eq!(root.get("x").and_then(|v| v.as_i32()), Some(16));
///
/// assert!(parse_slice(b"x = \"\xFF\"").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not a well-formed
/// document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(v: &[u8]) -> Result<Scope> {
    parse_slice_with_options(v, &ParseOptions::default())
}

/// Parses a document from bytes of UTF-8 text with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not a well-formed
/// document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice_with_options(v: &[u8], options: &ParseOptions) -> Result<Scope> {
    parse_with_options(v, options)
}

/// Parses a document from an I/O stream. The stream is buffered
/// internally and read one line at a time.
///
/// # Examples
///
/// ```rust
/// use skopik::parse_reader;
/// use std::io::Cursor;
///
/// let root = parse_reader(Cursor::new("list = [1, 2, 3]")).unwrap();
/// assert_eq!(root.get("list").map(|v| v.len()), Some(3));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the input is not a well-formed
/// document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(reader: R) -> Result<Scope>
where
    R: io::Read,
{
    parse_reader_with_options(reader, &ParseOptions::default())
}

/// Parses a document from an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if reading fails or the input is not a well-formed
/// document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader_with_options<R>(reader: R, options: &ParseOptions) -> Result<Scope>
where
    R: io::Read,
{
    parse_with_options(BufReader::new(reader), options)
}

/// Parses a file. The root scope is named after the file stem, so
/// `config/server.skop` produces a root called `server`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, or a parse
/// error if its contents are not a well-formed document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file<P>(path: P) -> Result<Scope>
where
    P: AsRef<Path>,
{
    parse_file_with_options(path, &ParseOptions::default())
}

/// Parses a file with custom options. The root is still named after the
/// file stem; `options.name` is used only when the path has no stem.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, or a parse
/// error if its contents are not a well-formed document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file_with_options<P>(path: P, options: &ParseOptions) -> Result<Scope>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::io(&format!("{}: {}", path.display(), e)))?;

    let mut options = options.clone();
    if let Some(stem) = path.file_stem() {
        options.name = stem.to_string_lossy().into_owned();
    }
    log::debug!("loading '{}' from {}", options.name, path.display());
    parse_reader_with_options(file, &options)
}

/// Deserializes an instance of type `T` from a string of Skopik text.
///
/// The whole document is parsed first and its root scope is handed to
/// `T` as a map.
///
/// # Examples
///
/// ```rust
/// use skopik::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a well-formed document or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(Value::Scope(parse_str(s)?))
}

/// Deserializes an instance of type `T` from bytes of Skopik text.
///
/// # Examples
///
/// ```rust
/// use skopik::from_slice;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_slice(b"x = 1; y = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a well-formed
/// document, or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(Value::Scope(parse_slice(v)?))
}

/// Deserializes an instance of type `T` from an I/O stream of Skopik text.
///
/// # Examples
///
/// ```rust
/// use skopik::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x = 1\ny = 2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not a well-formed
/// document, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_value(Value::Scope(parse_reader(reader)?))
}

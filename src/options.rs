//! Configuration for parsing.
//!
//! ```rust
//! use skopik::{parse_str_with_options, ParseOptions};
//!
//! let options = ParseOptions::new()
//!     .with_name("settings")
//!     .with_lenient_numbers(true);
//!
//! let root = parse_str_with_options("a = 1..2; b = 3", &options).unwrap();
//! assert_eq!(root.name(), "settings");
//! assert!(root.get("a").unwrap().is_null());
//! assert_eq!(root.get("b").and_then(|v| v.as_i32()), Some(3));
//! ```

/// Name given to the root scope when the caller does not supply one.
pub const DEFAULT_ROOT_NAME: &str = "<global>";

/// Deepest block nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Longest array an explicit `[n]:` index may grow by default.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 20;

/// Options controlling a parse.
///
/// # Examples
///
/// ```rust
/// use skopik::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.name, "<global>");
/// assert!(!options.lenient_numbers);
/// assert_eq!(options.max_depth, 128);
/// assert_eq!(options.max_array_len, 1 << 20);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the implicit root scope.
    pub name: String,
    /// Turn malformed numeric literals into `null` with a warning instead of
    /// failing the parse.
    pub lenient_numbers: bool,
    /// Maximum block nesting depth.
    pub max_depth: usize,
    /// Upper bound on the length an explicit array index may produce. The
    /// gap before the index is filled with `null`, so this caps the memory a
    /// single `[n]:` can claim.
    pub max_array_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            name: DEFAULT_ROOT_NAME.to_string(),
            lenient_numbers: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that degrade malformed numbers to `null` rather than failing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::ParseOptions;
    ///
    /// assert!(ParseOptions::lenient().lenient_numbers);
    /// ```
    #[must_use]
    pub fn lenient() -> Self {
        ParseOptions {
            lenient_numbers: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_lenient_numbers(mut self, lenient: bool) -> Self {
        self.lenient_numbers = lenient;
        self
    }

    /// Sets the deepest block nesting accepted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::{parse_str_with_options, ParseOptions};
    ///
    /// let options = ParseOptions::new().with_max_depth(2);
    /// assert!(parse_str_with_options("a:{ b:{ c = 1 } }", &options).is_ok());
    /// assert!(parse_str_with_options("a:{ b:{ c:{ } } }", &options).is_err());
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the longest array an explicit index may produce.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::{parse_str_with_options, ParseOptions};
    ///
    /// let options = ParseOptions::new().with_max_array_len(4);
    /// assert!(parse_str_with_options("a = [ [3]: x ]", &options).is_ok());
    /// assert!(parse_str_with_options("a = [ [4]: x ]", &options).is_err());
    /// ```
    #[must_use]
    pub fn with_max_array_len(mut self, len: usize) -> Self {
        self.max_array_len = len;
        self
    }
}

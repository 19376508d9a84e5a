//! The Skopik document tree.
//!
//! A parse produces one root [`Scope`]. Every node in it is a [`Value`]:
//! a scalar (null, boolean, [`Number`], [`Bits`], string) or one of the three
//! containers:
//!
//! - [`Scope`]: named entries, last write wins, insertion order kept
//! - [`Array`]: dense, index-addressable elements; explicit indices back-fill gaps with `null`
//! - [`Tuple`]: elements that all share the [`Kind`] of the first one
//!
//! Containers own their children outright. The containers' own insertion
//! methods enforce the array and tuple invariants, so a tree built by hand
//! obeys the same rules as a parsed one.
//!
//! ## Reading values
//!
//! ```rust
//! use skopik::{parse_str, Kind};
//!
//! let root = skopik::Value::Scope(parse_str("port = 8080u; mask = 0xFFu; flags = 101b").unwrap());
//!
//! assert_eq!(root.get("port").and_then(|v| v.as_u32()), Some(8080));
//! assert_eq!(root.get("mask").map(|v| v.kind()), Some(Kind::UInt32));
//! assert_eq!(root.get("mask").map(|v| v.to_string()).as_deref(), Some("0xFFu"));
//! assert_eq!(root.get("flags").map(|v| v.to_string()).as_deref(), Some("101b"));
//! ```
//!
//! ## Building values
//!
//! ```rust
//! use skopik::{Array, Tuple, Value};
//!
//! let mut array = Array::named("slots");
//! array.push(Value::from(1));
//! array.insert_at(3, Value::from(4)).unwrap();
//! assert_eq!(array.len(), 4);
//! assert!(array.get(1).unwrap().is_null());
//!
//! let mut tuple = Tuple::new();
//! tuple.push(Value::from(1.5)).unwrap();
//! assert!(tuple.push(Value::from("no")).is_err());
//! ```

use crate::error::{Error, Result};
use crate::map::ScopeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The semantic kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// A raw bit pattern. Its width is part of the payload, not the kind.
    Binary,
    String,
    Scope,
    Array,
    Tuple,
}

impl Kind {
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Kind::Scope | Kind::Array | Kind::Tuple)
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Kind::Int32 | Kind::Int64 | Kind::UInt32 | Kind::UInt64)
    }

    #[inline]
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Kind::Float32 | Kind::Float64)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "Null",
            Kind::Boolean => "Boolean",
            Kind::Int32 => "Int32",
            Kind::Int64 => "Int64",
            Kind::UInt32 => "UInt32",
            Kind::UInt64 => "UInt64",
            Kind::Float32 => "Float32",
            Kind::Float64 => "Float64",
            Kind::Binary => "Binary",
            Kind::String => "String",
            Kind::Scope => "Scope",
            Kind::Array => "Array",
            Kind::Tuple => "Tuple",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an integer was spelled in the source. Only affects display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum IntFormat {
    #[default]
    Default,
    Binary,
    Hexadecimal,
}

/// A numeric scalar of one of the six numeric kinds.
///
/// # Examples
///
/// ```rust
/// use skopik::{Kind, Number};
///
/// let n = Number::UInt32(7);
/// assert_eq!(n.kind(), Kind::UInt32);
/// assert_eq!(n.as_i64(), Some(7));
/// assert_eq!(Number::Int32(-1).as_u64(), None);
/// assert_eq!(Number::Float64(2.5).as_i64(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

impl Number {
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Number::Int32(_) => Kind::Int32,
            Number::Int64(_) => Kind::Int64,
            Number::UInt32(_) => Kind::UInt32,
            Number::UInt64(_) => Kind::UInt64,
            Number::Float32(_) => Kind::Float32,
            Number::Float64(_) => Kind::Float64,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !self.is_float()
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float32(_) | Number::Float64(_))
    }

    /// The value as an `i128`, for integers only.
    fn as_wide(&self) -> Option<i128> {
        match *self {
            Number::Int32(v) => Some(v.into()),
            Number::Int64(v) => Some(v.into()),
            Number::UInt32(v) => Some(v.into()),
            Number::UInt64(v) => Some(v.into()),
            Number::Float32(_) | Number::Float64(_) => None,
        }
    }

    /// Converts an integer to `i32` if it fits. Floats return `None`.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        self.as_wide().and_then(|v| i32::try_from(v).ok())
    }

    /// Converts an integer to `i64` if it fits. Floats return `None`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_wide().and_then(|v| i64::try_from(v).ok())
    }

    /// Converts an integer to `u32` if it fits. Floats return `None`.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_wide().and_then(|v| u32::try_from(v).ok())
    }

    /// Converts an integer to `u64` if it fits. Floats return `None`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_wide().and_then(|v| u64::try_from(v).ok())
    }

    /// Converts any number to `f64`. Large 64-bit integers may lose precision.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int32(v) => v.into(),
            Number::Int64(v) => v as f64,
            Number::UInt32(v) => v.into(),
            Number::UInt64(v) => v as f64,
            Number::Float32(v) => v.into(),
            Number::Float64(v) => v,
        }
    }

    /// Converts any number to `f32`, with the precision loss that implies.
    #[must_use]
    pub fn as_f32(&self) -> f32 {
        match *self {
            Number::Float32(v) => v,
            other => other.as_f64() as f32,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Number::Int32(_) => "",
            Number::Int64(_) => "L",
            Number::UInt32(_) => "u",
            Number::UInt64(_) => "uL",
            Number::Float32(_) => "f",
            Number::Float64(_) => "d",
        }
    }

    /// The integer's bits at its own width, for hexadecimal and binary display.
    fn pattern(&self) -> Option<u64> {
        match *self {
            Number::Int32(v) => Some(u64::from(v as u32)),
            Number::Int64(v) => Some(v as u64),
            Number::UInt32(v) => Some(v.into()),
            Number::UInt64(v) => Some(v),
            Number::Float32(_) | Number::Float64(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int32(v) => write!(f, "{}", v),
            Number::Int64(v) => write!(f, "{}", v),
            Number::UInt32(v) => write!(f, "{}", v),
            Number::UInt64(v) => write!(f, "{}", v),
            Number::Float32(v) => write!(f, "{:?}", v),
            Number::Float64(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int32(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int64(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::UInt32(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::UInt64(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float32(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float64(value)
    }
}

/// A fixed-width bit pattern of 1 to 32 bits, as written by a binary literal.
///
/// # Examples
///
/// ```rust
/// use skopik::Bits;
///
/// let bits = Bits::new(0b101, 3);
/// assert_eq!(bits.to_string(), "101");
/// assert_eq!(Bits::new(0b1, 4).to_string(), "0001");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bits {
    bits: u32,
    width: u8,
}

impl Bits {
    /// Creates a bit pattern. `width` is clamped to `1..=32` and `bits` is
    /// masked to it.
    #[must_use]
    pub const fn new(bits: u32, width: u8) -> Self {
        let width = if width == 0 {
            1
        } else if width > 32 {
            32
        } else {
            width
        };
        let mask = if width == 32 {
            u32::MAX
        } else {
            (1u32 << width) - 1
        };
        Bits {
            bits: bits & mask,
            width,
        }
    }

    #[inline]
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = usize::from(self.width))
    }
}

/// A named, insertion-ordered map of entries.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scope {
    name: String,
    entries: ScopeMap,
}

impl Scope {
    /// Creates an anonymous, empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Scope {
            name: name.into(),
            entries: ScopeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry. An existing entry with the same key is replaced in
    /// place and returned.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &ScopeMap {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> ScopeMap {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Scope {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A dense sequence of values indexed from 0.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Array {
    name: String,
    items: Vec<Value>,
}

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Array {
            name: name.into(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends at the next free index.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Places `value` at an explicit `index`, filling any gap before it with
    /// nulls.
    ///
    /// Indices only move forward: an `index` that is already occupied is an
    /// [`Error::ArrayIndexOrder`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::{Array, Value};
    ///
    /// let mut array = Array::new();
    /// array.insert_at(2, Value::from(9)).unwrap();
    /// assert_eq!(array.len(), 3);
    /// assert!(array.insert_at(2, Value::Null).is_err());
    /// ```
    pub fn insert_at(&mut self, index: usize, value: Value) -> Result<()> {
        let next = self.items.len();
        if index < next {
            return Err(Error::ArrayIndexOrder {
                line: 0,
                index: i64::try_from(index).unwrap_or(i64::MAX),
                next,
            });
        }
        self.items.resize(index, Value::Null);
        self.items.push(value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A sequence whose elements all share one [`Kind`], fixed by the first element.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Tuple {
    name: String,
    tuple_type: Option<Kind>,
    items: Vec<Value>,
}

impl Tuple {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Tuple {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The element kind, once the first element is in.
    #[must_use]
    pub fn tuple_type(&self) -> Option<Kind> {
        self.tuple_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends `value`, which must have the tuple's kind.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let found = value.kind();
        match self.tuple_type {
            Some(expected) if expected != found => {
                return Err(Error::TupleTypeMismatch {
                    line: 0,
                    expected,
                    found,
                })
            }
            Some(_) => {}
            None => self.tuple_type = Some(found),
        }
        self.items.push(value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Any node of a Skopik document.
///
/// # Examples
///
/// ```rust
/// use skopik::{Kind, Value};
///
/// let value = Value::from(42u32);
/// assert_eq!(value.kind(), Kind::UInt32);
/// assert_eq!(value.as_i64(), Some(42));
/// assert!(!value.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number, IntFormat),
    Bits(Bits),
    String(String),
    Scope(Scope),
    Array(Array),
    Tuple(Tuple),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(n, _) => n.kind(),
            Value::Bits(_) => Kind::Binary,
            Value::String(_) => Kind::String,
            Value::Scope(_) => Kind::Scope,
            Value::Array(_) => Kind::Array,
            Value::Tuple(_) => Kind::Tuple,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(..))
    }

    #[inline]
    #[must_use]
    pub const fn is_bits(&self) -> bool {
        matches!(self, Value::Bits(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_scope(&self) -> bool {
        matches!(self, Value::Scope(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// The integer spelling hint of a number; `Binary` for bit patterns.
    #[must_use]
    pub const fn int_format(&self) -> Option<IntFormat> {
        match self {
            Value::Number(_, format) => Some(*format),
            Value::Bits(_) => Some(IntFormat::Binary),
            _ => None,
        }
    }

    /// The name of a container. Scalars have no name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Value::Scope(s) => Some(s.name()),
            Value::Array(a) => Some(a.name()),
            Value::Tuple(t) => Some(t.name()),
            _ => None,
        }
    }

    /// Number of children of a container. Scalars have none.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Value::Scope(s) => s.len(),
            Value::Array(a) => a.len(),
            Value::Tuple(t) => t.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as `i32`, converting from any integer kind (or bit
    /// pattern) that fits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::Value;
    ///
    /// assert_eq!(Value::from(5i64).as_i32(), Some(5));
    /// assert_eq!(Value::from(u32::MAX).as_i32(), None);
    /// assert_eq!(Value::from(1.0).as_i32(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        self.as_integer().and_then(|n| n.as_i32())
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|n| n.as_i64())
    }

    #[inline]
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_integer().and_then(|n| n.as_u32())
    }

    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(|n| n.as_u64())
    }

    fn as_integer(&self) -> Option<Number> {
        match self {
            Value::Number(n, _) if n.is_integer() => Some(*n),
            Value::Bits(bits) => Some(Number::UInt32(bits.bits())),
            _ => None,
        }
    }

    /// The value as `f64`, converting from any number.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n, _) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Number(n, _) => Some(n.as_f32()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n, _) => Some(n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bits(&self) -> Option<Bits> {
        match self {
            Value::Bits(bits) => Some(*bits),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Value::Scope(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_scope_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Value::Scope(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up an entry of a scope.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_scope().and_then(|s| s.get(key))
    }

    /// Looks up an element of an array or tuple.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(a) => a.get(index),
            Value::Tuple(t) => t.get(index),
            _ => None,
        }
    }

    /// Follows a dot-separated path of entry names and element indices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::{parse_str, Value};
    ///
    /// let root = Value::Scope(parse_str("server:{ ports = [80, 443]; }").unwrap());
    /// assert_eq!(root.lookup("server.ports.1").and_then(Value::as_i32), Some(443));
    /// assert!(root.lookup("server.missing").is_none());
    /// assert_eq!(root.lookup(""), Some(&root));
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| match node {
            Value::Scope(s) => s.get(segment),
            Value::Array(_) | Value::Tuple(_) => {
                segment.parse::<usize>().ok().and_then(|i| node.at(i))
            }
            _ => None,
        })
    }

    /// Adds an entry to a scope. Other kinds cannot hold entries.
    pub fn insert_entry(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        match self {
            Value::Scope(s) => Ok(s.insert(key, value)),
            other => Err(Error::UnsupportedParent {
                line: 0,
                kind: other.kind(),
                what: "named entries",
            }),
        }
    }

    /// Appends an element to an array or tuple. Other kinds cannot hold elements.
    pub fn push_element(&mut self, value: Value) -> Result<()> {
        match self {
            Value::Array(a) => {
                a.push(value);
                Ok(())
            }
            Value::Tuple(t) => t.push(value),
            other => Err(Error::UnsupportedParent {
                line: 0,
                kind: other.kind(),
                what: "elements",
            }),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\0' => f.write_str("\\0")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

fn write_summary(f: &mut fmt::Formatter<'_>, kind: Kind, len: usize, name: &str) -> fmt::Result {
    write!(f, "{}[{}]", kind, len)?;
    if !name.is_empty() {
        write!(f, "({})", name)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n, format) => match (format, n.pattern()) {
                (IntFormat::Hexadecimal, Some(bits)) => write!(f, "0x{:X}{}", bits, n.suffix()),
                (IntFormat::Binary, Some(bits)) => write!(f, "{:b}b", bits),
                (_, Some(_)) => write!(f, "{}{}", n, n.suffix()),
                (_, None) => match n {
                    Number::Float32(_) => write!(f, "{}f", n),
                    _ => write!(f, "{}", n),
                },
            },
            Value::Bits(bits) => write!(f, "{}b", bits),
            Value::String(s) => write_quoted(f, s),
            Value::Scope(s) => write_summary(f, Kind::Scope, s.len(), s.name()),
            Value::Array(a) => write_summary(f, Kind::Array, a.len(), a.name()),
            Value::Tuple(t) => write_summary(f, Kind::Tuple, t.len(), t.name()),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn serialize_items<S: Serializer>(items: &[Value], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for element in items {
        seq.serialize_element(element)?;
    }
    seq.end()
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int32(v), _) => serializer.serialize_i32(*v),
            Value::Number(Number::Int64(v), _) => serializer.serialize_i64(*v),
            Value::Number(Number::UInt32(v), _) => serializer.serialize_u32(*v),
            Value::Number(Number::UInt64(v), _) => serializer.serialize_u64(*v),
            Value::Number(Number::Float32(v), _) => serializer.serialize_f32(*v),
            Value::Number(Number::Float64(v), _) => serializer.serialize_f64(*v),
            Value::Bits(bits) => serializer.serialize_u32(bits.bits()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Scope(scope) => scope.serialize(serializer),
            Value::Array(a) => serialize_items(a.as_slice(), serializer),
            Value::Tuple(t) => serialize_items(t.as_slice(), serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value that fits a Skopik document")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i32<E>(self, value: i32) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(match i32::try_from(value) {
                    Ok(small) => Value::from(small),
                    Err(_) => Value::from(value),
                })
            }

            fn visit_u32<E>(self, value: u32) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                Ok(match i32::try_from(value) {
                    Ok(small) => Value::from(small),
                    Err(_) => Value::from(value),
                })
            }

            fn visit_f32<E>(self, value: f32) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut array = Array::new();
                while let Some(elem) = seq.next_element()? {
                    array.push(elem);
                }
                Ok(Value::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut scope = Scope::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    scope.insert(key, value);
                }
                Ok(Value::Scope(scope))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::custom(format!("expected an integer that fits i64, found {}", value.kind())))
    }
}

impl TryFrom<Value> for u64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_u64()
            .ok_or_else(|| Error::custom(format!("expected an integer that fits u64, found {}", value.kind())))
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::custom(format!("expected number, found {}", value.kind())))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::custom(format!("expected bool, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::custom(format!("expected string, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Value> for Scope {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Scope(s) => Ok(s),
            other => Err(Error::custom(format!("expected scope, found {}", other.kind()))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value, IntFormat::Default)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::from(Number::Int32(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::from(Number::Int64(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::from(Number::UInt32(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::from(Number::UInt64(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::from(Number::Float32(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::from(Number::Float64(value))
    }
}

impl From<Bits> for Value {
    fn from(value: Bits) -> Self {
        Value::Bits(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Scope> for Value {
    fn from(value: Scope) -> Self {
        Value::Scope(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Tuple> for Value {
    fn from(value: Tuple) -> Self {
        Value::Tuple(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_back_fills_gaps() {
        let mut array = Array::new();
        array.push(Value::from(1));
        array.push(Value::from(2));
        array.insert_at(5, Value::from(9)).unwrap();
        assert_eq!(array.len(), 6);
        assert!(array.iter().skip(2).take(3).all(Value::is_null));
        assert_eq!(array.get(5).and_then(Value::as_i32), Some(9));

        array.insert_at(6, Value::from(10)).unwrap();
        assert_eq!(array.len(), 7);
    }

    #[test]
    fn test_array_rejects_used_index() {
        let mut array = Array::new();
        array.insert_at(3, Value::Null).unwrap();
        let err = array.insert_at(3, Value::Null).unwrap_err();
        assert!(matches!(err, Error::ArrayIndexOrder { index: 3, next: 4, .. }));
        assert!(array.insert_at(0, Value::Null).is_err());
        assert_eq!(array.len(), 4);
    }

    #[test]
    fn test_tuple_type_is_fixed() {
        let mut tuple = Tuple::named("t");
        assert_eq!(tuple.tuple_type(), None);
        tuple.push(Value::from(1)).unwrap();
        tuple.push(Value::from(2)).unwrap();
        assert_eq!(tuple.tuple_type(), Some(Kind::Int32));

        let err = tuple.push(Value::from(3i64)).unwrap_err();
        assert!(matches!(
            err,
            Error::TupleTypeMismatch {
                expected: Kind::Int32,
                found: Kind::Int64,
                ..
            }
        ));
        assert_eq!(tuple.len(), 2);
        assert_eq!(tuple.tuple_type(), Some(Kind::Int32));
    }

    #[test]
    fn test_tuple_of_bits_ignores_width() {
        let mut tuple = Tuple::new();
        tuple.push(Value::Bits(Bits::new(1, 1))).unwrap();
        tuple.push(Value::Bits(Bits::new(0b1010, 4))).unwrap();
        assert_eq!(tuple.tuple_type(), Some(Kind::Binary));
    }

    #[test]
    fn test_scope_last_write_wins() {
        let mut scope = Scope::named("s");
        assert!(scope.insert("a", Value::from(1)).is_none());
        scope.insert("b", Value::from(2));
        let old = scope.insert("a", Value::from(3));
        assert_eq!(old, Some(Value::from(1)));
        assert_eq!(scope.len(), 2);
        assert_eq!(scope.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(scope.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_integer_accessors_convert_losslessly() {
        let v = Value::from(300u32);
        assert_eq!(v.as_i32(), Some(300));
        assert_eq!(v.as_i64(), Some(300));
        assert_eq!(v.as_u64(), Some(300));
        assert_eq!(v.as_f64(), Some(300.0));

        let v = Value::from(-1);
        assert_eq!(v.as_u32(), None);
        assert_eq!(v.as_u64(), None);

        let v = Value::from(u64::MAX);
        assert_eq!(v.as_i64(), None);
        assert_eq!(v.as_u64(), Some(u64::MAX));

        assert_eq!(Value::Bits(Bits::new(0b11, 2)).as_u32(), Some(3));
        assert_eq!(Value::from("3").as_i32(), None);
    }

    #[test]
    fn test_mutation_checks_parent_kind() {
        let mut v = Value::from(5);
        let err = v.insert_entry("x", Value::Null).unwrap_err();
        assert!(matches!(err, Error::UnsupportedParent { kind: Kind::Int32, .. }));

        let mut v = Value::Scope(Scope::new());
        assert!(v.push_element(Value::Null).is_err());
        v.insert_entry("x", Value::Null).unwrap();
        assert_eq!(v.len(), 1);

        let mut v = Value::Tuple(Tuple::new());
        v.push_element(Value::from(true)).unwrap();
        assert!(v.push_element(Value::from(1)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-5).to_string(), "-5");
        assert_eq!(Value::from(5u32).to_string(), "5u");
        assert_eq!(Value::from(5u64).to_string(), "5uL");
        assert_eq!(Value::from(5i64).to_string(), "5L");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(1.5f32).to_string(), "1.5f");
        assert_eq!(
            Value::Number(Number::Int32(-1), IntFormat::Hexadecimal).to_string(),
            "0xFFFFFFFF"
        );
        assert_eq!(Value::Bits(Bits::new(0b0101, 4)).to_string(), "0101b");
        assert_eq!(Value::from("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Value::Array(Array::named("xs")).to_string(), "Array[0](xs)");
        assert_eq!(Value::Scope(Scope::new()).to_string(), "Scope[0]");
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::from(42)).unwrap(), 42);
        assert!(i64::try_from(Value::from("x")).is_err());
        assert_eq!(f64::try_from(Value::from(2)).unwrap(), 2.0);
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert!(u64::try_from(Value::from(-3)).is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Kind::UInt64.to_string(), "UInt64");
        assert!(Kind::Tuple.is_container());
        assert!(Kind::Int64.is_integer());
        assert!(Kind::Float32.is_float());
        assert!(!Kind::Binary.is_integer());
    }

    #[test]
    fn test_const_is_methods() {
        const fn check_null(v: &Value) -> bool {
            v.is_null()
        }

        assert!(check_null(&Value::Null));
        assert_eq!(Value::Null.kind(), Kind::Null);
    }
}

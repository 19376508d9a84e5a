//! Recursive-descent parser building the document tree.
//!
//! The grammar, informally:
//!
//! ```text
//! document     := statement* EOF
//! statement    := NAME ( ':' block | '=' value )? (';' | ',')?
//! block        := '{' statement* '}'          Scope
//!               | '[' array_element* ']'      Array
//!               | '(' tuple_element* ')'      Tuple
//! value        := block | NAME ':' block | STRING | NUMBER | BOOL | 'null'
//! array_element := ('[' INDEX ']' ':')? value (',' | ';')?
//! tuple_element := value (',' | ';')?
//! ```
//!
//! A statement whose name is followed by neither `:` nor `=` on the same
//! line is `null`. Structural problems abort the parse. A single operator
//! found where a value belongs is the only thing that degrades to `null`,
//! with a warning logged; [`ParseOptions::lenient_numbers`] extends that to
//! malformed numbers.

use crate::error::{Error, Result};
use crate::literal::{self, BlockKind, Operator, TokenClass};
use crate::options::ParseOptions;
use crate::reader::TokenReader;
use crate::value::{Array, IntFormat, Kind, Scope, Tuple, Value};
use log::{debug, warn};
use std::io::BufRead;

/// Pattern that follows the index token of an explicit array index.
const INDEX_PATTERN: [&str; 2] = ["]", ":"];

/// Parses a whole document into a root scope named `name`.
///
/// # Examples
///
/// ```rust
/// use skopik::parse;
///
/// let root = parse("x = 5".as_bytes(), "inline").unwrap();
/// assert_eq!(root.name(), "inline");
/// assert_eq!(root.get("x").and_then(|v| v.as_i32()), Some(5));
/// ```
pub fn parse<R: BufRead>(reader: R, name: &str) -> Result<Scope> {
    parse_with_options(reader, &ParseOptions::new().with_name(name))
}

/// Parses a whole document with explicit options.
pub fn parse_with_options<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Scope> {
    Parser::new(reader, options).parse_document()
}

/// One in-progress parse. Owns its token reader and is consumed by
/// [`parse_document`](Self::parse_document).
pub struct Parser<'o, R> {
    reader: TokenReader<R>,
    options: &'o ParseOptions,
    depth: usize,
}

impl<'o, R: BufRead> Parser<'o, R> {
    #[must_use]
    pub fn new(reader: R, options: &'o ParseOptions) -> Self {
        Parser {
            reader: TokenReader::new(reader),
            options,
            depth: 0,
        }
    }

    /// Reads statements until input runs out.
    pub fn parse_document(mut self) -> Result<Scope> {
        debug!("parsing document '{}'", self.options.name);
        let mut root = Scope::named(self.options.name.as_str());

        while let Some(token) = self.reader.read_token()? {
            match Operator::from_token(&token) {
                Some(op) if op.is_separator() => {}
                Some(_) => {
                    return Err(Error::unexpected_token(
                        self.reader.line(),
                        &token,
                        "a statement name",
                    ))
                }
                None => self.read_statement(token, &mut root)?,
            }
        }

        debug!(
            "parsed document '{}': {} top-level entries over {} lines",
            root.name(),
            root.len(),
            self.reader.line()
        );
        Ok(root)
    }

    /// Reads the rest of the statement named by `name_token` into `scope`.
    fn read_statement(&mut self, name_token: String, scope: &mut Scope) -> Result<()> {
        let line = self.reader.line();
        let name = literal::unquote(&name_token).unwrap_or(name_token);

        let value = match self.reader.peek_on_line(0).and_then(Operator::from_token) {
            Some(Operator::Block) => self.read_named_block(line, name.clone())?,
            Some(Operator::Assign) => {
                self.reader.pop_token(0)?;
                self.read_value()?
            }
            // `name;` and `name` alone at the end of a line
            _ => Value::Null,
        };
        scope.insert(name, value);

        if self
            .reader
            .peek_on_line(0)
            .and_then(Operator::from_token)
            .is_some_and(Operator::is_separator)
        {
            self.reader.pop_token(0)?;
        }
        Ok(())
    }

    /// Consumes the next token if it opens a block.
    fn read_block_opener(&mut self) -> Result<Option<BlockKind>> {
        let Some(token) = self.reader.read_token()? else {
            return Ok(None);
        };
        match Operator::from_token(&token).and_then(Operator::opens) {
            Some(kind) => Ok(Some(kind)),
            None => {
                self.reader.seek(-1)?;
                Ok(None)
            }
        }
    }

    /// Reads `: block` after `name`. The opener may sit on a later line.
    fn read_named_block(&mut self, line: usize, name: String) -> Result<Value> {
        self.reader.pop_token(0)?;
        match self.read_block_opener()? {
            Some(kind) => self.read_block(kind, name),
            None => Err(Error::malformed_statement(
                line,
                format!("':' after '{name}' must be followed by '{{', '[' or '('"),
            )),
        }
    }

    fn read_value(&mut self) -> Result<Value> {
        let Some(token) = self.reader.read_token()? else {
            return Err(Error::unexpected_eof(self.reader.line(), "a value"));
        };
        let line = self.reader.line();

        let class = match literal::classify(&token) {
            Ok(class) => class,
            Err(err) => return self.recover_literal(err.at_line(line), &token),
        };

        match class {
            TokenClass::Operator(op) => {
                if let Some(kind) = op.opens() {
                    return self.read_block(kind, String::new());
                }
                if op.closes().is_some() {
                    // leave it for the enclosing block
                    self.reader.seek(-1)?;
                }
                warn!("line {}: expected a value, found '{}'; using null", line, token);
                Ok(Value::Null)
            }
            TokenClass::Bool(b) => Ok(Value::Bool(b)),
            TokenClass::Null => Ok(Value::Null),
            TokenClass::Quoted | TokenClass::Word => {
                let text = literal::unquote(&token).unwrap_or(token);
                match self.reader.peek_on_line(0).and_then(Operator::from_token) {
                    Some(Operator::Block) => self.read_named_block(line, text),
                    _ => Ok(Value::String(text)),
                }
            }
            TokenClass::Number(number) => match number.decode() {
                Ok(value) => Ok(value),
                Err(err) => self.recover_literal(err.at_line(line), &token),
            },
        }
    }

    fn recover_literal(&self, err: Error, token: &str) -> Result<Value> {
        if self.options.lenient_numbers && matches!(err, Error::MalformedNumber { .. }) {
            warn!("{}; using null for '{}'", err, token);
            Ok(Value::Null)
        } else {
            Err(err)
        }
    }

    fn read_block(&mut self, kind: BlockKind, name: String) -> Result<Value> {
        let line = self.reader.line();
        if self.depth >= self.options.max_depth {
            return Err(Error::malformed_statement(
                line,
                format!("blocks nested deeper than {}", self.options.max_depth),
            ));
        }

        self.depth += 1;
        let value = match kind {
            BlockKind::Scope => self.read_scope_body(name).map(Value::Scope),
            BlockKind::Array => self.read_array_body(name).map(Value::Array),
            BlockKind::Tuple => self.read_tuple_body(name).map(Value::Tuple),
        };
        self.depth -= 1;
        value
    }

    fn unclosed(&self, kind: BlockKind, opened: usize) -> Error {
        Error::unexpected_eof(
            self.reader.line(),
            &format!(
                "'{}' to close the {} opened on line {}",
                kind.close_token(),
                kind.kind(),
                opened
            ),
        )
    }

    fn read_scope_body(&mut self, name: String) -> Result<Scope> {
        let opened = self.reader.line();
        let mut scope = Scope::named(name);

        loop {
            let Some(token) = self.reader.read_token()? else {
                return Err(self.unclosed(BlockKind::Scope, opened));
            };
            match Operator::from_token(&token) {
                Some(Operator::ScopeClose) => return Ok(scope),
                Some(op) if op.is_separator() => {}
                Some(_) => {
                    return Err(Error::unexpected_token(
                        self.reader.line(),
                        &token,
                        "'}' or a statement",
                    ))
                }
                None => self.read_statement(token, &mut scope)?,
            }
        }
    }

    fn read_array_body(&mut self, name: String) -> Result<Array> {
        let opened = self.reader.line();
        let mut array = Array::named(name);

        loop {
            let Some(token) = self.reader.read_token()? else {
                return Err(self.unclosed(BlockKind::Array, opened));
            };
            let line = self.reader.line();

            match Operator::from_token(&token) {
                Some(Operator::ArrayClose) => return Ok(array),
                Some(op) if op.is_separator() => {}
                Some(Operator::ArrayOpen) if self.reader.find_next_pattern(&INDEX_PATTERN) == Some(1) => {
                    let index = self.read_explicit_index(array.len())?;
                    self.reader.pop_token(1)?;
                    let value = self.read_value()?;
                    array.insert_at(index, value).map_err(|err| err.at_line(line))?;
                }
                Some(op) if op.closes().is_some() => {
                    return Err(Error::unexpected_token(line, &token, "']' or an element"))
                }
                _ => {
                    self.reader.seek(-1)?;
                    let value = self.read_value()?;
                    array.push(value);
                }
            }
        }
    }

    /// Reads the `n` of `[n]:`; the cursor is left on the `]`.
    fn read_explicit_index(&mut self, next: usize) -> Result<usize> {
        let line = self.reader.line();
        let Some(token) = self.reader.read_token()? else {
            return Err(Error::unexpected_eof(line, "an array index"));
        };

        let number = match literal::classify(&token) {
            Ok(TokenClass::Number(number))
                if number.kind() == Kind::Int32 && number.format() != IntFormat::Binary =>
            {
                number
            }
            Ok(_) => {
                return Err(Error::malformed_statement(
                    line,
                    format!("array index must be a plain integer, found '{token}'"),
                ))
            }
            Err(err) => return Err(err.at_line(line)),
        };

        let index = number
            .decode()
            .map_err(|err| err.at_line(line))?
            .as_i64()
            .unwrap_or_default();
        let index =
            usize::try_from(index).map_err(|_| Error::ArrayIndexOrder { line, index, next })?;
        if index >= self.options.max_array_len {
            return Err(Error::malformed_statement(
                line,
                format!(
                    "array index {} exceeds the limit of {} elements",
                    index, self.options.max_array_len
                ),
            ));
        }
        Ok(index)
    }

    fn read_tuple_body(&mut self, name: String) -> Result<Tuple> {
        let opened = self.reader.line();
        let mut tuple = Tuple::named(name);

        loop {
            let Some(token) = self.reader.read_token()? else {
                return Err(self.unclosed(BlockKind::Tuple, opened));
            };
            let line = self.reader.line();

            match Operator::from_token(&token) {
                Some(Operator::TupleClose) => return Ok(tuple),
                Some(op) if op.is_separator() => {}
                Some(op) if op.closes().is_some() => {
                    return Err(Error::unexpected_token(line, &token, "')' or an element"))
                }
                _ => {
                    self.reader.seek(-1)?;
                    let value = self.read_value()?;
                    tuple.push(value).map_err(|err| err.at_line(line))?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn parse_ok(src: &str) -> Scope {
        parse(src.as_bytes(), "test").unwrap()
    }

    fn parse_err(src: &str) -> Error {
        parse(src.as_bytes(), "test").unwrap_err()
    }

    #[test]
    fn test_assignment() {
        let root = parse_ok("x = 5");
        assert_eq!(root.len(), 1);
        assert_eq!(
            root.get("x"),
            Some(&Value::Number(Number::Int32(5), IntFormat::Default))
        );
    }

    #[test]
    fn test_named_scope_statement() {
        let root = parse_ok(r#""A":{ y = true; }"#);
        let a = root.get("A").and_then(Value::as_scope).unwrap();
        assert_eq!(a.name(), "A");
        assert_eq!(a.get("y"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_name_without_value_is_null() {
        let root = parse_ok("a\nb;\nc = 1");
        assert!(root.get("a").unwrap().is_null());
        assert!(root.get("b").unwrap().is_null());
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn test_statements_share_a_line() {
        let root = parse_ok("a = 1; b = 2, c = 3 d = 4");
        assert_eq!(root.keys().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_values_may_follow_on_next_line() {
        let root = parse_ok("a =\n  5\nb :\n{ c = 1 }");
        assert_eq!(root.get("a").and_then(Value::as_i32), Some(5));
        let c = root.get("b").and_then(|b| b.get("c"));
        assert_eq!(c.and_then(Value::as_i32), Some(1));
    }

    #[test]
    fn test_explicit_array_index() {
        let root = parse_ok("nums = [ 1, 2, [5]: 9 ]");
        let nums = root.get("nums").and_then(Value::as_array).unwrap();
        assert_eq!(nums.len(), 6);
        assert_eq!(nums.get(1).and_then(Value::as_i32), Some(2));
        assert!(nums.iter().skip(2).take(3).all(Value::is_null));
        assert_eq!(nums.get(5).and_then(Value::as_i32), Some(9));
    }

    #[test]
    fn test_hex_array_index() {
        let root = parse_ok("a = [ [0x2]: x ]");
        assert_eq!(root.get("a").map(Value::len), Some(3));
    }

    #[test]
    fn test_array_index_must_increase() {
        let err = parse_err("a = [ 1, 2,\n [1]: 3 ]");
        assert!(matches!(err, Error::ArrayIndexOrder { line: 2, index: 1, next: 2 }));

        let err = parse_err("a = [ [3]: 1, [3]: 2 ]");
        assert!(matches!(err, Error::ArrayIndexOrder { index: 3, .. }));

        let err = parse_err("a = [ [-1]: 1 ]");
        assert!(matches!(err, Error::ArrayIndexOrder { index: -1, .. }));
    }

    #[test]
    fn test_bad_array_index() {
        assert!(matches!(parse_err("a = [ [x]: 1 ]"), Error::MalformedStatement { .. }));
        assert!(matches!(parse_err("a = [ [2L]: 1 ]"), Error::MalformedStatement { .. }));
        assert!(matches!(parse_err("a = [ [1.5]: 1 ]"), Error::MalformedStatement { .. }));
    }

    #[test]
    fn test_array_index_limit() {
        let err = parse_err("a = [ [2147483647]: 1 ]");
        assert!(matches!(err, Error::MalformedStatement { line: 1, .. }));

        let options = ParseOptions::new().with_max_array_len(3);
        let root = parse_with_options("a = [ [2]: 1 ]".as_bytes(), &options).unwrap();
        assert_eq!(root.get("a").map(Value::len), Some(3));
        let err = parse_with_options("a = [ 1,\n [3]: 2 ]".as_bytes(), &options).unwrap_err();
        assert!(matches!(err, Error::MalformedStatement { line: 2, .. }));
    }

    #[test]
    fn test_nested_arrays_are_not_indices() {
        let root = parse_ok("m = [[1, 2], [3]]");
        let m = root.get("m").unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.lookup("0.1").and_then(Value::as_i32), Some(2));
    }

    #[test]
    fn test_tuple_homogeneity() {
        let root = parse_ok("pair = ( 1, 2, 3 )");
        let pair = root.get("pair").and_then(Value::as_tuple).unwrap();
        assert_eq!(pair.len(), 3);
        assert_eq!(pair.tuple_type(), Some(Kind::Int32));

        let err = parse_err("pair = (\n 1,\n \"x\" )");
        assert!(matches!(
            err,
            Error::TupleTypeMismatch {
                line: 3,
                expected: Kind::Int32,
                found: Kind::String
            }
        ));
    }

    #[test]
    fn test_malformed_number_aborts() {
        let err = parse_err("ok = 1\nbad = 1..2");
        assert!(matches!(err, Error::MalformedNumber { line: 2, ref token, .. } if token == "1..2"));
    }

    #[test]
    fn test_lenient_numbers() {
        let options = ParseOptions::lenient();
        let root = parse_with_options("bad = 1..2; ok = 3".as_bytes(), &options).unwrap();
        assert!(root.get("bad").unwrap().is_null());
        assert_eq!(root.get("ok").and_then(Value::as_i32), Some(3));
        // a degraded element still has to match the tuple kind
        assert!(parse_with_options("t = (1, 0x)".as_bytes(), &ParseOptions::lenient()).is_err());
    }

    #[test]
    fn test_inline_named_block_value() {
        let root = parse_ok(r#"a = "B":{ y = 1 }; list = [ first:[1], "second":(true) ]"#);
        let a = root.get("a").and_then(Value::as_scope).unwrap();
        assert_eq!(a.name(), "B");
        assert_eq!(a.get("y").and_then(Value::as_i32), Some(1));

        let list = root.get("list").unwrap();
        assert_eq!(list.at(0).and_then(Value::name), Some("first"));
        assert_eq!(list.at(1).map(Value::kind), Some(Kind::Tuple));
        assert_eq!(list.at(1).and_then(Value::name), Some("second"));
    }

    #[test]
    fn test_block_operator_needs_a_block() {
        let err = parse_err("x: 5");
        assert!(matches!(err, Error::MalformedStatement { line: 1, .. }));
        let err = parse_err("x:");
        assert!(matches!(err, Error::MalformedStatement { .. }));
    }

    #[test]
    fn test_inline_block_operator_needs_a_block() {
        let err = parse_err("a = [ x : 5 ]");
        assert!(matches!(err, Error::MalformedStatement { line: 1, .. }));
        let err = parse_err("a = x : 5");
        assert!(matches!(err, Error::MalformedStatement { line: 1, .. }));
        let err = parse_err("t = ( \"x\": )");
        assert!(matches!(err, Error::MalformedStatement { .. }));
    }

    #[test]
    fn test_inline_block_opener_on_next_line() {
        let root = parse_ok("a = [ x :\n { y = 1 } ]");
        let a = root.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(a.len(), 1);
        let x = a.get(0).and_then(Value::as_scope).unwrap();
        assert_eq!(x.name(), "x");
        assert_eq!(x.get("y").and_then(Value::as_i32), Some(1));
    }

    #[test]
    fn test_mismatched_closers() {
        assert!(matches!(parse_err("s:{ a = 1 ]"), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_err("a = [ 1 }"), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_err("t = ( 1 ]"), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_err("}"), Error::UnexpectedToken { line: 1, .. }));
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_err("s:{\n a = [1,\n 2");
        assert!(matches!(err, Error::UnexpectedEof { line: 3, .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_operator_in_value_position_is_null() {
        let root = parse_ok("s:{ a = } b = @");
        assert!(root.get("s").unwrap().get("a").unwrap().is_null());
        assert!(root.get("b").unwrap().is_null());
    }

    #[test]
    fn test_scope_key_overwrite() {
        let root = parse_ok("s:{ a = 1; b = 2; a = 3 }");
        let s = root.get("s").unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.get("a").and_then(Value::as_i32), Some(3));
    }

    #[test]
    fn test_empty_elements_are_skipped() {
        let root = parse_ok("a = [1,,2,]; t = (,)");
        assert_eq!(root.get("a").map(Value::len), Some(2));
        assert_eq!(root.get("t").map(Value::len), Some(0));
    }

    #[test]
    fn test_max_depth() {
        let options = ParseOptions::new().with_max_depth(3);
        let deep = "a = [[[[1]]]]";
        let err = parse_with_options(deep.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, Error::MalformedStatement { .. }));
        assert!(parse_with_options("a = [[[1]]]".as_bytes(), &options).is_ok());
    }

    #[test]
    fn test_anonymous_blocks() {
        let root = parse_ok("a = { b = 1 }");
        assert_eq!(root.get("a").and_then(Value::name), Some(""));
    }
}

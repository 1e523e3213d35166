//! Recursive descent compiler from path expressions to [`Path`]s.
//!
//! Grammar, left to right with one byte of lookahead:
//!
//! ```text
//! path      = step+
//! step      = ("." | "..") selector filter?
//!           | "[" range? "]" filter?
//! selector  = "*" | name
//! range     = "*" | bound (":" bound?)? | ":" bound?
//! filter    = "(" "!"? name "(" (argument ("," argument)*)? ")" ")"
//! argument  = "@" path | string | number
//! ```
//!
//! Spaces are allowed around the pieces of a filter group and nowhere else.
//! A nested `@` path ends at the first byte that cannot start a step, which
//! leaves the enclosing argument list intact.

mod cursor;
mod error;

use std::sync::Arc;

use obp_stack::ensure_sufficient_stack;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::context::{Condition, Context};
use crate::path::{Argument, Expression, Path, Selector, Slice, Step, Target};

use cursor::Cursor;
pub use error::SyntaxError;

/// Compile `expression` against the conditions and options in `context`.
///
/// The returned [`Path`] holds its resolved conditions, so it stays valid
/// and unchanged however `context` is modified afterwards.
///
/// # Errors
///
/// Returns a [`SyntaxError`] carrying the expression, the byte offset of
/// the problem and a description when the expression is malformed.
#[tracing::instrument(level = "debug", skip(context))]
pub fn compile(expression: &str, context: &Context) -> Result<Path, SyntaxError> {
    if expression.is_empty() {
        return Err(SyntaxError::new(expression, 0, "empty path"));
    }

    let result = Parser::new(expression, context).parse_path(Nesting::TopLevel);
    match &result {
        Ok(path) => debug!(steps = path.steps.len(), "compiled path"),
        Err(error) => debug!(offset = error.offset(), message = error.message(), "rejected path"),
    }
    result
}

/// Compile `expression`, panicking if it is malformed.
///
/// For expressions written into the program itself, where a syntax error
/// is a bug rather than bad input.
///
/// # Panics
///
/// Panics with the [`SyntaxError`] message if compilation fails.
pub fn compile_or_abort(expression: &str, context: &Context) -> Path {
    match compile(expression, context) {
        Ok(path) => path,
        Err(error) => panic!("{error}"),
    }
}

/// Where a path is being parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Nesting {
    /// The whole expression; must consume everything.
    TopLevel,
    /// An `@` argument; stops at the first byte that can't start a step.
    Argument,
}

struct Parser<'src, 'ctx> {
    source: &'src str,
    cursor: Cursor<'src>,
    context: &'ctx Context,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    fn new(source: &'src str, context: &'ctx Context) -> Self {
        Parser {
            source,
            cursor: Cursor::new(source),
            context,
        }
    }

    fn parse_path(&mut self, nesting: Nesting) -> Result<Path, SyntaxError> {
        let start = self.cursor.pos();
        let mut steps = Vec::new();

        loop {
            let step = match self.cursor.current() {
                b'.' => self.parse_member_step()?,
                b'[' => self.parse_item_step()?,
                _ => break,
            };
            trace!(target_kind = ?step.target, filtered = step.condition.is_some(), "parsed step");
            steps.push(step);
        }

        match nesting {
            Nesting::TopLevel if !self.cursor.is_eof() => {
                return Err(self.unexpected(Some("'.' or '['")));
            }
            Nesting::Argument if steps.is_empty() => {
                return Err(self.unexpected(Some("a path after '@'")));
            }
            _ => {}
        }

        Ok(Path {
            source: self.cursor.slice_from(start).to_owned(),
            steps,
        })
    }

    // Steps

    /// `.name`, `.*`, `..name` or `..*`, plus an optional filter.
    fn parse_member_step(&mut self) -> Result<Step, SyntaxError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        let descendant = self.cursor.eat(b'.');
        if descendant && !self.context.descendants_allowed() {
            return Err(self.error_at(start, "descendant selectors are not enabled"));
        }

        let selector = self.parse_selector()?;
        let target = if descendant {
            Target::Descendant(selector)
        } else {
            Target::Child(selector)
        };
        let condition = self.parse_filter()?;
        Ok(Step { target, condition })
    }

    fn parse_selector(&mut self) -> Result<Selector, SyntaxError> {
        if self.cursor.eat(b'*') {
            return Ok(Selector::Wildcard);
        }
        let name = self.parse_name();
        if name.is_empty() {
            return Err(self.unexpected(Some("a field name or '*'")));
        }
        Ok(Selector::Name(name.to_owned()))
    }

    /// `[...]` plus an optional filter.
    fn parse_item_step(&mut self) -> Result<Step, SyntaxError> {
        self.cursor.advance();

        let range = if self.cursor.eat(b'*') {
            Some(Slice::FULL)
        } else if let Some(start) = self.parse_bound()? {
            if self.cursor.eat(b':') {
                let end = self.parse_bound()?.unwrap_or(Slice::FULL.end);
                Some(Slice { start, end })
            } else {
                Some(Slice::index(start))
            }
        } else if self.cursor.eat(b':') {
            let end = self.parse_bound()?.unwrap_or(Slice::FULL.end);
            Some(Slice { start: 0, end })
        } else {
            None
        };
        self.expect(b']')?;

        let condition = self.parse_filter()?;
        Ok(Step {
            target: Target::Item(range),
            condition,
        })
    }

    /// An optionally signed integer range bound, or `None` if there is none.
    fn parse_bound(&mut self) -> Result<Option<i64>, SyntaxError> {
        let start = self.cursor.pos();
        self.cursor.eat_sign();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.pos() == start {
            return Ok(None);
        }
        self.cursor
            .slice_from(start)
            .parse::<i64>()
            .map(Some)
            .map_err(|_| self.error_at(start, "failed to parse range bound"))
    }

    // Filters

    fn parse_filter(&mut self) -> Result<Option<Expression>, SyntaxError> {
        if !self.cursor.eat(b'(') {
            return Ok(None);
        }
        self.cursor.eat_spaces();
        let inverse = self.cursor.eat(b'!');
        self.cursor.eat_spaces();

        let name_start = self.cursor.pos();
        let name = self.parse_name();
        if name.is_empty() {
            return Err(self.unexpected(Some("a condition name")));
        }
        let Some(condition) = self.context.condition(name).map(Arc::clone) else {
            return Err(self.error_at(
                name_start,
                format!(
                    "unknown condition {name:?}, expected one of: {}",
                    self.context.condition_names().join(", ")
                ),
            ));
        };

        self.cursor.eat_spaces();
        self.expect(b'(')?;
        let arguments = self.parse_arguments(&condition)?;
        self.expect(b')')?;
        self.cursor.eat_spaces();
        self.expect(b')')?;

        Ok(Some(Expression {
            condition,
            inverse,
            arguments,
        }))
    }

    /// Comma-separated arguments up to (not including) the closing `)`,
    /// checked against `condition`'s signature.
    fn parse_arguments(
        &mut self,
        condition: &Condition,
    ) -> Result<SmallVec<[Argument; 3]>, SyntaxError> {
        let mut arguments = SmallVec::new();
        self.cursor.eat_spaces();

        if self.cursor.current() != b')' {
            loop {
                self.cursor.eat_spaces();
                let offset = self.cursor.pos();
                let position = arguments.len();
                let Some(&accepted) = condition.signature().get(position) else {
                    return Err(self.error_at(
                        offset,
                        format!(
                            "too many arguments to {:?}, expected {}",
                            condition.name(),
                            condition.arity()
                        ),
                    ));
                };

                let argument = self.parse_argument()?;
                if !accepted.intersects(argument.kind()) {
                    return Err(self.error_at(
                        offset,
                        format!(
                            "argument {} to {:?} must be {accepted}, found {}",
                            position + 1,
                            condition.name(),
                            argument.kind()
                        ),
                    ));
                }
                arguments.push(argument);

                self.cursor.eat_spaces();
                if !self.cursor.eat(b',') {
                    break;
                }
            }
        }

        if arguments.len() < condition.arity() {
            return Err(self.error_at(
                self.cursor.pos(),
                format!(
                    "too few arguments to {:?}, expected {}, found {}",
                    condition.name(),
                    condition.arity(),
                    arguments.len()
                ),
            ));
        }
        Ok(arguments)
    }

    fn parse_argument(&mut self) -> Result<Argument, SyntaxError> {
        match self.cursor.current() {
            b'@' => {
                self.cursor.advance();
                let nested = ensure_sufficient_stack(|| self.parse_path(Nesting::Argument))?;
                Ok(Argument::Path(nested))
            }
            quote @ (b'"' | b'\'' | b'`') => self.parse_string(quote).map(Argument::Str),
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.parse_number(),
            _ => Err(self.unexpected(Some("an argument"))),
        }
    }

    /// A string literal closed by the same quote that opened it. No escapes.
    fn parse_string(&mut self, quote: u8) -> Result<String, SyntaxError> {
        let open = self.cursor.pos();
        self.cursor.advance();
        let start = self.cursor.pos();
        if !self.cursor.eat_until(quote) {
            return Err(self.error_at(
                open,
                format!("missing closing {:?}", char::from(quote)),
            ));
        }
        let text = self.cursor.slice_from(start).to_owned();
        self.cursor.advance();
        Ok(text)
    }

    /// `[+-]digits` for an integer, `[+-]digits.digits` for a float.
    fn parse_number(&mut self) -> Result<Argument, SyntaxError> {
        let start = self.cursor.pos();
        self.cursor.eat_sign();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        let is_float = self.cursor.eat(b'.');
        if is_float {
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }

        let text = self.cursor.slice_from(start);
        if is_float {
            text.parse::<f64>()
                .map(Argument::Float)
                .map_err(|_| self.error_at(start, "failed to parse float literal"))
        } else {
            text.parse::<i64>()
                .map(Argument::Int)
                .map_err(|_| self.error_at(start, "failed to parse integer literal"))
        }
    }

    // Tokens

    fn parse_name(&mut self) -> &'src str {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_name_byte);
        self.cursor.slice_from(start)
    }

    fn expect(&mut self, byte: u8) -> Result<(), SyntaxError> {
        if self.cursor.eat(byte) {
            Ok(())
        } else {
            Err(self.unexpected(Some(&format!("{:?}", char::from(byte)))))
        }
    }

    // Errors

    fn error_at(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.source, offset, message)
    }

    /// An error quoting whatever is at the cursor.
    fn unexpected(&self, expected: Option<&str>) -> SyntaxError {
        let mut message = match self.cursor.current_char() {
            Some(c) => format!("unexpected {c:?}"),
            None => "unexpected end of path".to_owned(),
        };
        if let Some(expected) = expected {
            message.push_str(", expected ");
            message.push_str(expected);
        }
        self.error_at(self.cursor.pos(), message)
    }
}

/// Letters, digits, `_`, `-` and any byte of a non-ASCII character.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b >= 0x80
}

#[cfg(test)]
mod tests;

//! obpath: a compiled path language for querying tree-shaped data.
//!
//! An expression such as `.books[*](between(@.Price, 8, 10)).Title` is
//! compiled once against a [`Context`] into an immutable [`Path`], which
//! can then be evaluated against any number of [`Value`] trees.
//!
//! ```text
//! let mut context = Context::new();
//! context.allow_descendants(true);
//!
//! let path = compile("..Author", &context)?;
//! for author in path.evaluate(&store) {
//!     println!("{author}");
//! }
//! ```
//!
//! # Architecture
//!
//! - [`value`]: the closed data model paths are evaluated against
//! - [`context`]: the condition registry and compile options
//! - `parse`: recursive descent from expression text to [`Path`]
//! - [`path`]: the compiled step representation
//! - `eval`: the lazy, stack-based match iterator
//!
//! Compilation errors are [`SyntaxError`]s carrying a byte offset.
//! Evaluation never fails; data of the wrong shape just doesn't match.

mod conditions;
pub mod context;
mod eval;
mod parse;
pub mod path;
pub mod value;

pub use context::{ArgKind, Condition, Context, ResolvedArg, TestFn};
pub use eval::Matches;
pub use parse::{compile, compile_or_abort, SyntaxError};
pub use path::{Argument, Expression, Path, Selector, Slice, Step, Target};
pub use value::Value;

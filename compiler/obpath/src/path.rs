//! Compiled path representation.
//!
//! A [`Path`] is an immutable sequence of [`Step`]s. It owns everything it
//! needs to run, including the conditions its filters resolved at compile
//! time, and refers to no particular data instance.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::context::{ArgKind, Condition};

/// A compiled path expression.
#[derive(Clone, Debug)]
pub struct Path {
    pub(crate) source: String,
    pub(crate) steps: Vec<Step>,
}

impl Path {
    /// The exact text this path was compiled from.
    ///
    /// For a nested path-reference this is the slice after the `@`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled steps, in application order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// One traversal instruction, optionally filtered.
#[derive(Clone, Debug)]
pub struct Step {
    pub target: Target,
    /// Must hold for a candidate before the next step is applied to it.
    pub condition: Option<Expression>,
}

/// What a step selects from the current candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// `.name` / `.*`: one level down.
    Child(Selector),
    /// `..name` / `..*`: any depth below.
    Descendant(Selector),
    /// `[...]`: sequence elements. `None` is the bare `[]`, which selects nothing.
    Item(Option<Slice>),
}

/// Field selector for child and descendant steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// `*`: every field value or sequence element.
    Wildcard,
    /// A key looked up in keyed collections.
    Name(String),
}

/// Inclusive element range. Negative bounds count back from the end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    pub start: i64,
    pub end: i64,
}

impl Slice {
    /// `[*]`: every element.
    pub const FULL: Slice = Slice { start: 0, end: -1 };

    /// `[n]`: a single element.
    pub const fn index(n: i64) -> Self {
        Slice { start: n, end: n }
    }

    /// Resolve against a sequence length to an inclusive index range.
    ///
    /// Returns `None` when nothing is selected: an empty sequence, or a
    /// start that clamps past the end.
    pub fn resolve(self, len: usize) -> Option<(usize, usize)> {
        if len == 0 {
            return None;
        }
        let start = clamp(self.start, len);
        let end = clamp(self.end, len);
        (start <= end).then_some((start, end))
    }
}

/// Negative bounds count from `len`; the result is clamped to `0..len`.
fn clamp(bound: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let bound = if bound < 0 { len_i.saturating_add(bound) } else { bound };
    if bound <= 0 {
        0
    } else {
        usize::try_from(bound).map_or(len - 1, |b| b.min(len - 1))
    }
}

/// A condition invocation attached to a step: `(!name(args...))`.
#[derive(Clone)]
pub struct Expression {
    pub condition: Arc<Condition>,
    pub inverse: bool,
    pub arguments: SmallVec<[Argument; 3]>,
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("condition", &self.condition.name())
            .field("inverse", &self.inverse)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// A compiled condition argument.
#[derive(Clone, Debug)]
pub enum Argument {
    /// `@...`, evaluated against the candidate being tested.
    Path(Path),
    Str(String),
    Int(i64),
    Float(f64),
}

impl Argument {
    /// The kind checked against the condition's signature.
    pub fn kind(&self) -> ArgKind {
        match self {
            Argument::Path(_) => ArgKind::PATH,
            Argument::Str(_) => ArgKind::STRING,
            Argument::Int(_) => ArgKind::INTEGER,
            Argument::Float(_) => ArgKind::FLOAT,
        }
    }
}

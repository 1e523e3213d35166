//! Lazy evaluation of compiled paths.
//!
//! [`Matches`] walks the data with an explicit stack of pending frames
//! instead of recursing, so every match is produced on demand and dropping
//! the iterator releases all traversal state at once. Frames are pushed in
//! reverse so that popping them reproduces a depth-first pre-order walk:
//! for each node, the values a step selects are finished before a
//! descendant step searches deeper below that node.

use std::iter::FusedIterator;

use obp_stack::ensure_sufficient_stack;
use smallvec::SmallVec;
use tracing::trace;

use crate::context::ResolvedArg;
use crate::path::{Argument, Expression, Path, Selector, Step, Target};
use crate::value::Value;

impl Path {
    /// Lazily yield every value this path selects below `root`.
    ///
    /// Evaluation never fails. A step that doesn't fit the shape of the data
    /// (a name on a sequence, an index on a scalar, a missing key) simply
    /// selects nothing. The path and the data are only read, so any number
    /// of evaluations may run at once.
    pub fn evaluate<'p, 'v>(&'p self, root: &'v Value) -> Matches<'p, 'v> {
        trace!(path = %self, root = root.type_name(), "evaluating path");
        Matches {
            path: self,
            stack: vec![Frame::Step {
                index: 0,
                value: root,
            }],
        }
    }
}

/// Iterator over the matches of one [`Path::evaluate`] call.
#[derive(Debug)]
pub struct Matches<'p, 'v> {
    path: &'p Path,
    stack: Vec<Frame<'v>>,
}

#[derive(Copy, Clone, Debug)]
enum Frame<'v> {
    /// Apply step `index` to `value`; past the last step, `value` matches.
    Step { index: usize, value: &'v Value },
    /// Step `index` selected `value`: test its filter, then continue with
    /// the next step.
    Candidate { index: usize, value: &'v Value },
}

impl<'v> Matches<'_, 'v> {
    fn expand(&mut self, step: &Step, index: usize, value: &'v Value) {
        let stack = &mut self.stack;

        // Deeper search runs after this level's candidates, so it goes in first.
        if let Target::Descendant(_) = step.target {
            push_children(stack, value, |child| Frame::Step {
                index,
                value: child,
            });
        }

        let candidate = |child| Frame::Candidate {
            index,
            value: child,
        };
        match &step.target {
            Target::Child(Selector::Wildcard) | Target::Descendant(Selector::Wildcard) => {
                push_children(stack, value, candidate);
            }
            Target::Child(Selector::Name(name)) | Target::Descendant(Selector::Name(name)) => {
                if let Some(child) = value.get(name) {
                    stack.push(candidate(child));
                }
            }
            Target::Item(Some(slice)) => {
                let Value::List(items) = value else {
                    return;
                };
                if let Some(selected) = slice
                    .resolve(items.len())
                    .and_then(|(start, end)| items.get(start..=end))
                {
                    stack.extend(selected.iter().rev().map(candidate));
                }
            }
            Target::Item(None) => {}
        }
    }
}

impl<'v> Iterator for Matches<'_, 'v> {
    type Item = &'v Value;

    fn next(&mut self) -> Option<&'v Value> {
        let path = self.path;
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Step { index, value } => match path.steps.get(index) {
                    Some(step) => self.expand(step, index, value),
                    None => return Some(value),
                },
                Frame::Candidate { index, value } => {
                    let condition = path.steps.get(index).and_then(|s| s.condition.as_ref());
                    if passes(condition, value) {
                        self.stack.push(Frame::Step {
                            index: index + 1,
                            value,
                        });
                    }
                }
            }
        }
        None
    }
}

impl FusedIterator for Matches<'_, '_> {}

/// Push a frame for every map value or list element of `value`, last first.
fn push_children<'v>(
    stack: &mut Vec<Frame<'v>>,
    value: &'v Value,
    frame: impl Fn(&'v Value) -> Frame<'v>,
) {
    match value {
        Value::Map(fields) => stack.extend(fields.values().rev().map(frame)),
        Value::List(items) => stack.extend(items.iter().rev().map(frame)),
        _ => {}
    }
}

/// Whether `candidate` satisfies the step's filter, if it has one.
fn passes(expression: Option<&Expression>, candidate: &Value) -> bool {
    let Some(expression) = expression else {
        return true;
    };
    let arguments: SmallVec<[ResolvedArg<'_>; 3]> = expression
        .arguments
        .iter()
        .map(|argument| resolve(argument, candidate))
        .collect();
    expression.condition.test(&arguments) != expression.inverse
}

/// Path arguments are drained against the candidate, not the root.
fn resolve<'a>(argument: &'a Argument, candidate: &'a Value) -> ResolvedArg<'a> {
    match argument {
        Argument::Path(path) => {
            ResolvedArg::Candidates(ensure_sufficient_stack(|| path.evaluate(candidate).collect()))
        }
        Argument::Str(s) => ResolvedArg::Str(s),
        Argument::Int(n) => ResolvedArg::Int(*n),
        Argument::Float(f) => ResolvedArg::Float(*f),
    }
}

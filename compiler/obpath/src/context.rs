//! Condition registry and compile-time configuration.
//!
//! A [`Context`] maps condition names to their [`Condition`] (a typed
//! signature plus a test function) and carries the flag that enables the
//! `..` descendant selector. The caller owns it, may register conditions
//! on it, and passes it to [`compile`](crate::compile). Compiled paths
//! hold their resolved conditions directly, so later registrations never
//! change a path that has already been compiled.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::conditions;
use crate::value::Value;

bitflags! {
    /// Argument types a condition accepts at one position.
    ///
    /// A literal argument is accepted when its own kind intersects the
    /// mask declared for its position.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct ArgKind: u8 {
        /// A path-reference (`@.field`), resolved to its candidate set.
        const PATH = 1 << 0;
        /// A number literal with a fractional part.
        const FLOAT = 1 << 1;
        /// A number literal without a fractional part.
        const INTEGER = 1 << 2;
        /// A string literal bounded by `"`, `'` or a backtick.
        const STRING = 1 << 3;
    }
}

impl ArgKind {
    /// Any number literal.
    pub const NUMBER: Self = Self::FLOAT.union(Self::INTEGER);

    /// Any literal.
    pub const LITERAL: Self = Self::STRING.union(Self::NUMBER);

    /// Names of the kinds in this mask, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| kind_name(name)).collect()
    }
}

fn kind_name(flag: &str) -> &'static str {
    match flag {
        "PATH" => "path",
        "FLOAT" => "float",
        "INTEGER" => "integer",
        _ => "string",
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" or "))
    }
}

/// An argument as a test function receives it.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedArg<'a> {
    /// Every value a path-reference produced, in emission order.
    Candidates(Vec<&'a Value>),
    /// A string literal.
    Str(&'a str),
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
}

impl<'a> ResolvedArg<'a> {
    /// The candidate set, or an empty slice for literal arguments.
    pub fn candidates(&self) -> &[&'a Value] {
        match self {
            ResolvedArg::Candidates(values) => values,
            _ => &[],
        }
    }

    /// The string literal, if this is one.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            ResolvedArg::Str(s) => Some(*s),
            _ => None,
        }
    }

    /// The numeric literal coerced to `f64`, if this is one.
    #[allow(
        clippy::cast_precision_loss,
        reason = "numeric predicates compare in f64 by definition"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ResolvedArg::Int(n) => Some(*n as f64),
            ResolvedArg::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Signature of a condition's test function.
///
/// The argument slice always has exactly as many entries as the
/// condition's signature, each of a kind the signature accepts.
pub type TestFn = dyn Fn(&[ResolvedArg<'_>]) -> bool + Send + Sync;

/// A named predicate: accepted argument kinds plus its test.
pub struct Condition {
    name: String,
    signature: SmallVec<[ArgKind; 3]>,
    test: Arc<TestFn>,
}

impl Condition {
    /// The name the condition was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accepted argument kinds, one mask per position.
    pub fn signature(&self) -> &[ArgKind] {
        &self.signature
    }

    /// Number of arguments the condition takes.
    pub fn arity(&self) -> usize {
        self.signature.len()
    }

    /// Run the test function.
    pub fn test(&self, arguments: &[ResolvedArg<'_>]) -> bool {
        (self.test)(arguments)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Caller-owned configuration for compiling paths.
#[derive(Clone)]
pub struct Context {
    conditions: FxHashMap<String, Arc<Condition>>,
    allow_descendants: bool,
}

impl Context {
    /// Create a context with the built-in conditions registered and
    /// descendant selectors disabled.
    pub fn new() -> Self {
        let mut context = Context {
            conditions: FxHashMap::default(),
            allow_descendants: false,
        };
        conditions::register_builtins(&mut context);
        context
    }

    /// Register a condition, replacing any previous one with the same name.
    ///
    /// ```text
    /// context.register("nonfiction", [ArgKind::PATH], |args| {
    ///     args[0].candidates().iter().any(|v| v.as_str() != Some("fiction"))
    /// });
    /// ```
    pub fn register<S, F>(&mut self, name: impl Into<String>, signature: S, test: F) -> &mut Self
    where
        S: IntoIterator<Item = ArgKind>,
        F: Fn(&[ResolvedArg<'_>]) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::trace!(%name, "registering condition");
        let condition = Condition {
            name: name.clone(),
            signature: signature.into_iter().collect(),
            test: Arc::new(test),
        };
        self.conditions.insert(name, Arc::new(condition));
        self
    }

    /// Enable or disable the `..` descendant selector.
    pub fn allow_descendants(&mut self, allow: bool) -> &mut Self {
        self.allow_descendants = allow;
        self
    }

    /// Whether `..` is accepted by the compiler.
    pub fn descendants_allowed(&self) -> bool {
        self.allow_descendants
    }

    /// Look up a condition by name.
    pub fn condition(&self, name: &str) -> Option<&Arc<Condition>> {
        self.conditions.get(name)
    }

    /// Names of every registered condition, sorted.
    pub fn condition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.conditions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("conditions", &self.condition_names())
            .field("allow_descendants", &self.allow_descendants)
            .finish()
    }
}

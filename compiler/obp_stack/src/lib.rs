//! Stack safety for recursive path handling.
//!
//! Two places in obpath recurse on input the caller controls: the compiler
//! descends into every nested `@` path-reference, and the evaluator drains
//! a nested path for every condition argument it resolves. A hostile
//! expression such as `.a(has(@.a(has(@.a(...)))))` can nest arbitrarily
//! deep, so both wrap their recursive call in [`ensure_sufficient_stack`].
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).
//!
//! # Configuration
//!
//! - **Red zone**: 100KB - If less than this remains, we grow the stack
//! - **Growth size**: 1MB - Each growth allocates this much additional space

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, a new stack
/// segment is allocated before calling `f`.
///
/// ```text
/// Argument::Path(nested) => ensure_sufficient_stack(|| self.parse_path(Nesting::Argument))
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

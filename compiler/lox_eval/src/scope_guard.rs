//! RAII-style scope guards for `Environment`.
//!
//! [`ScopedEnvironment`] pops the scope it pushed when dropped, so block and
//! call bodies can bail out with `?` (or panic) without leaving a stale
//! scope on the stack.
//!
//! # Usage
//!
//! ```text
//! // Block statement
//! {
//!     let mut scoped = env.scoped();
//!     scoped.define("i", Value::number(0.0));
//!     exec_block(&mut scoped, body)?;
//! } // pop_scope called here
//!
//! // Function call: the frame hangs off the closure's captured scope
//! env.with_scope_in(&closure.scope, |frame| {
//!     frame.define(param, arg);
//!     exec_block(frame, body)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use crate::environment::{Environment, ScopeRef};

/// Guard that pops one environment scope on drop.
///
/// Derefs to the [`Environment`], so it can be used anywhere the
/// environment itself is expected.
pub struct ScopedEnvironment<'env> {
    env: &'env mut Environment,
}

impl Drop for ScopedEnvironment<'_> {
    fn drop(&mut self) {
        self.env.pop_scope();
    }
}

impl Deref for ScopedEnvironment<'_> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl DerefMut for ScopedEnvironment<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

impl Environment {
    /// Push a block scope and return a guard that pops it.
    pub fn scoped(&mut self) -> ScopedEnvironment<'_> {
        self.push_scope();
        ScopedEnvironment { env: self }
    }

    /// Push a scope enclosed by `parent` and return a guard that pops it.
    pub fn scoped_in(&mut self, parent: &ScopeRef) -> ScopedEnvironment<'_> {
        self.push_scope_in(parent);
        ScopedEnvironment { env: self }
    }

    /// Run `f` inside a new block scope.
    ///
    /// The scope is popped when `f` returns, even on panic.
    pub fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedEnvironment<'_>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` inside a new scope enclosed by `parent`.
    pub fn with_scope_in<T, F>(&mut self, parent: &ScopeRef, f: F) -> T
    where
        F: FnOnce(&mut ScopedEnvironment<'_>) -> T,
    {
        let mut scoped = self.scoped_in(parent);
        f(&mut scoped)
    }
}

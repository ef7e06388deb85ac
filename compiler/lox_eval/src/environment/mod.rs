//! Environment for variable scoping in the interpreter.
//!
//! Each `Scope` owns the bindings of one lexical region and a handle to the
//! scope that encloses it. Scopes are shared through `ScopeRef`, so a scope
//! stays alive for as long as any child scope, closure, or the environment
//! stack still points at it.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use lox_ir::Token;
use lox_value::{undefined_variable, EvalResult, Value};

/// A single-threaded handle to shared, mutable state.
///
/// Wraps `Rc<RefCell<T>>` so every scope allocation goes through
/// `LocalScope::new()`. Cloning the handle shares the allocation; it never
/// copies the bindings.
///
/// Not thread-safe: the interpreter evaluates on one thread.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether two handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Shared handle to a `Scope`.
pub type ScopeRef = LocalScope<Scope>;

/// A single scope containing variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Variable bindings declared in this scope.
    bindings: FxHashMap<String, Value>,
    /// Enclosing scope. Fixed at construction.
    parent: Option<ScopeRef>,
}

impl Scope {
    /// Create a root scope with no parent.
    pub fn new() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    /// Create a scope enclosed by `parent`.
    pub fn with_parent(parent: ScopeRef) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Bind `name` in this scope, replacing any existing local binding.
    ///
    /// Never looks at or touches enclosing scopes.
    #[inline]
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Resolve `name` to the nearest binding on the chain.
    ///
    /// # Errors
    /// `UndefinedVariable` if no scope up to the root binds the name.
    pub fn get(&self, name: &Token) -> EvalResult {
        if let Some(value) = self.bindings.get(name.lexeme()) {
            return Ok(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().get(name);
        }
        tracing::debug!(name = %name, line = name.line, "lookup of undefined variable");
        Err(undefined_variable(name))
    }

    /// Overwrite the nearest existing binding of `name`.
    ///
    /// Only the scope that already owns the name is mutated; no new
    /// binding is ever created.
    ///
    /// # Errors
    /// `UndefinedVariable` if no scope up to the root binds the name.
    pub fn assign(&mut self, name: &Token, value: Value) -> EvalResult<()> {
        if let Some(slot) = self.bindings.get_mut(name.lexeme()) {
            *slot = value;
            return Ok(());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        tracing::debug!(name = %name, line = name.line, "assignment to undefined variable");
        Err(undefined_variable(name))
    }

    /// Check if a variable is defined in this scope (not parents).
    #[inline]
    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    #[inline]
    pub fn parent(&self) -> Option<&ScopeRef> {
        self.parent.as_ref()
    }

    /// Number of scopes from this one up to the root, inclusive.
    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.borrow().depth().saturating_add(1),
            None => 1,
        }
    }

    /// Number of bindings declared directly in this scope.
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl LocalScope<Scope> {
    /// Allocate a new root scope.
    pub fn root() -> Self {
        LocalScope::new(Scope::new())
    }

    /// Allocate a new scope enclosed by `parent`.
    pub fn child(parent: &ScopeRef) -> Self {
        LocalScope::new(Scope::with_parent(parent.clone()))
    }

    /// See [`Scope::define`].
    #[inline]
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.borrow_mut().define(name, value);
    }

    /// See [`Scope::get`].
    ///
    /// # Errors
    /// `UndefinedVariable` if no scope on the chain binds the name.
    #[inline]
    pub fn get(&self, name: &Token) -> EvalResult {
        self.borrow().get(name)
    }

    /// See [`Scope::assign`].
    ///
    /// # Errors
    /// `UndefinedVariable` if no scope on the chain binds the name.
    #[inline]
    pub fn assign(&self, name: &Token, value: Value) -> EvalResult<()> {
        self.borrow_mut().assign(name, value)
    }
}

/// Environment for the interpreter using a scope stack.
///
/// The top of the stack is the current scope. The global scope sits at
/// the bottom and is never popped.
pub struct Environment {
    scopes: Vec<ScopeRef>,
    global: ScopeRef,
}

impl Environment {
    /// Create a new environment with an empty global scope.
    pub fn new() -> Self {
        let global = ScopeRef::root();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// The global scope.
    pub fn global(&self) -> ScopeRef {
        self.global.clone()
    }

    /// Get the current scope depth.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    fn top(&self) -> &ScopeRef {
        self.scopes.last().unwrap_or(&self.global)
    }

    /// The innermost active scope.
    pub fn current(&self) -> ScopeRef {
        self.top().clone()
    }

    /// Enter a block: push a scope enclosed by the current one.
    #[inline]
    pub fn push_scope(&mut self) {
        let scope = ScopeRef::child(self.top());
        self.scopes.push(scope);
        tracing::debug!(depth = self.scopes.len(), "push scope");
    }

    /// Enter a call frame: push a scope enclosed by `parent`.
    ///
    /// `parent` is usually a scope a closure captured, which need not be
    /// anywhere on the stack.
    pub fn push_scope_in(&mut self, parent: &ScopeRef) {
        self.scopes.push(ScopeRef::child(parent));
        tracing::debug!(depth = self.scopes.len(), "push call scope");
    }

    /// Pop the current scope. The global scope stays.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            tracing::debug!(depth = self.scopes.len(), "pop scope");
        }
    }

    /// Define a variable in the current scope.
    #[inline]
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        tracing::trace!(name = %name, depth = self.scopes.len(), "define");
        self.top().define(name, value);
    }

    /// Look up a variable from the current scope outward.
    ///
    /// # Errors
    /// `UndefinedVariable` if no active scope binds the name.
    #[inline]
    pub fn get(&self, name: &Token) -> EvalResult {
        self.top().get(name)
    }

    /// Assign to the nearest existing binding.
    ///
    /// # Errors
    /// `UndefinedVariable` if no active scope binds the name.
    #[inline]
    pub fn assign(&mut self, name: &Token, value: Value) -> EvalResult<()> {
        tracing::trace!(name = %name, line = name.line, "assign");
        self.top().assign(name, value)
    }

    /// Define a variable in the global scope, whatever scope is current.
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        self.global.define(name, value);
    }

    /// Capture the current scope for a closure.
    ///
    /// The handle refers to the live scope, not a snapshot: assignments
    /// made through it and through the environment are visible to both.
    pub fn capture(&self) -> ScopeRef {
        self.current()
    }

    /// Create an environment that shares the global scope but has its own
    /// scope stack.
    #[must_use]
    pub fn child(&self) -> Self {
        let global = self.global.clone();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.scopes.len())
            .field("current", self.top())
            .finish()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

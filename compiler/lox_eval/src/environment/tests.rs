use super::*;
use lox_value::EvalErrorKind;
use pretty_assertions::assert_eq;

fn tok(name: &str) -> Token {
    Token::identifier(name, 1)
}

fn is_undefined<T>(result: &EvalResult<T>, name: &str) -> bool {
    let expected = EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    };
    matches!(result, Err(e) if e.kind == expected)
}

#[test]
fn test_scope_define_get() {
    let mut scope = Scope::new();
    scope.define("x", Value::number(42.0));
    assert_eq!(scope.get(&tok("x")).unwrap(), Value::number(42.0));
}

#[test]
fn test_scope_redefine_last_write_wins() {
    let mut scope = Scope::new();
    scope.define("x", Value::number(1.0));
    scope.define("x", Value::string("two"));
    assert_eq!(scope.get(&tok("x")).unwrap(), Value::string("two"));
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_scope_shadowing() {
    let parent = ScopeRef::root();
    parent.define("x", Value::number(1.0));

    let mut child = Scope::with_parent(parent.clone());
    child.define("x", Value::number(2.0));

    // Child's binding shadows parent's
    assert_eq!(child.get(&tok("x")).unwrap(), Value::number(2.0));
    assert_eq!(parent.get(&tok("x")).unwrap(), Value::number(1.0));
}

#[test]
fn test_scope_fallback_to_parent() {
    let parent = ScopeRef::root();
    parent.define("y", Value::number(5.0));

    let child = ScopeRef::child(&parent);
    assert_eq!(child.get(&tok("y")).unwrap(), Value::number(5.0));
    assert!(!child.borrow().has_local("y"));
}

#[test]
fn test_scope_get_undefined() {
    let scope = Scope::new();
    let result = scope.get(&Token::identifier("z", 4));
    assert!(is_undefined(&result, "z"));
    assert_eq!(result.unwrap_err().line, 4);
}

#[test]
fn test_scope_define_does_not_touch_parent() {
    let parent = ScopeRef::root();
    let child = ScopeRef::child(&parent);
    child.define("local", Value::bool(true));

    assert!(child.borrow().has_local("local"));
    assert!(parent.borrow().is_empty());
    assert!(is_undefined(&parent.get(&tok("local")), "local"));
}

#[test]
fn test_scope_assign_finds_owner() {
    let parent = ScopeRef::root();
    parent.define("x", Value::number(1.0));
    let child = ScopeRef::child(&parent);

    child.assign(&tok("x"), Value::number(9.0)).unwrap();

    assert_eq!(parent.get(&tok("x")).unwrap(), Value::number(9.0));
    assert_eq!(child.get(&tok("x")).unwrap(), Value::number(9.0));
    assert!(!child.borrow().has_local("x"));
}

#[test]
fn test_scope_assign_prefers_shadowing_binding() {
    let parent = ScopeRef::root();
    parent.define("x", Value::number(1.0));
    let child = ScopeRef::child(&parent);
    child.define("x", Value::number(2.0));

    child.assign(&tok("x"), Value::number(3.0)).unwrap();

    assert_eq!(child.get(&tok("x")).unwrap(), Value::number(3.0));
    assert_eq!(parent.get(&tok("x")).unwrap(), Value::number(1.0));
}

#[test]
fn test_scope_assign_stops_at_middle_owner() {
    let root = ScopeRef::root();
    root.define("x", Value::number(1.0));
    let mid = ScopeRef::child(&root);
    mid.define("x", Value::number(2.0));
    let leaf = ScopeRef::child(&mid);

    leaf.assign(&tok("x"), Value::number(9.0)).unwrap();

    assert_eq!(mid.get(&tok("x")).unwrap(), Value::number(9.0));
    assert_eq!(root.get(&tok("x")).unwrap(), Value::number(1.0));
    assert_eq!(leaf.get(&tok("x")).unwrap(), Value::number(9.0));
    assert!(!leaf.borrow().has_local("x"));
}

#[test]
fn test_scope_assign_undeclared() {
    let mut scope = Scope::new();
    let result = scope.assign(&tok("w"), Value::number(1.0));
    assert!(is_undefined(&result, "w"));
    assert!(scope.is_empty());
}

#[test]
fn test_scope_assign_undeclared_through_chain() {
    let root = ScopeRef::root();
    let mid = ScopeRef::child(&root);
    let leaf = ScopeRef::child(&mid);

    assert!(is_undefined(&leaf.assign(&tok("w"), Value::nil()), "w"));
    assert!(root.borrow().is_empty());
    assert!(mid.borrow().is_empty());
    assert!(leaf.borrow().is_empty());
}

#[test]
fn test_scope_depth_and_parent() {
    let root = ScopeRef::root();
    let child = ScopeRef::child(&root);
    let grandchild = ScopeRef::child(&child);

    assert_eq!(root.borrow().depth(), 1);
    assert_eq!(grandchild.borrow().depth(), 3);
    assert!(root.borrow().parent().is_none());
    assert!(grandchild.borrow().parent().unwrap().ptr_eq(&child));
}

#[test]
fn test_parent_outlives_its_creator() {
    let child = {
        let parent = ScopeRef::root();
        parent.define("kept", Value::number(1.0));
        ScopeRef::child(&parent)
    };
    // The only handle to the parent now lives inside the child.
    assert_eq!(child.get(&tok("kept")).unwrap(), Value::number(1.0));
}

#[test]
fn test_local_scope_new() {
    let scope = LocalScope::new(42);
    assert_eq!(*scope.borrow(), 42);
}

#[test]
fn test_local_scope_clone() {
    let scope1 = LocalScope::new(42);
    let scope2 = scope1.clone();

    // Both point to the same allocation
    *scope1.borrow_mut() = 100;
    assert_eq!(*scope2.borrow(), 100);
    assert!(scope1.ptr_eq(&scope2));
    assert!(!scope1.ptr_eq(&LocalScope::new(100)));
}

#[test]
fn test_local_scope_default() {
    let scope: LocalScope<i32> = LocalScope::default();
    assert_eq!(*scope.borrow(), 0);
}

#[test]
fn test_local_scope_deref() {
    let scope = LocalScope::new(42);
    // Deref returns &RefCell<T>
    let cell: &RefCell<i32> = &scope;
    assert_eq!(*cell.borrow(), 42);
}

#[test]
fn test_environment_push_pop() {
    let mut env = Environment::new();
    env.define("x", Value::number(1.0));

    env.push_scope();
    env.define("x", Value::number(2.0));
    assert_eq!(env.get(&tok("x")).unwrap(), Value::number(2.0));
    assert_eq!(env.depth(), 2);

    env.pop_scope();
    assert_eq!(env.get(&tok("x")).unwrap(), Value::number(1.0));
    assert_eq!(env.depth(), 1);
}

#[test]
fn test_environment_never_pops_global() {
    let mut env = Environment::new();
    env.define("x", Value::number(1.0));
    env.pop_scope();
    env.pop_scope();
    assert_eq!(env.depth(), 1);
    assert!(env.current().ptr_eq(&env.global()));
    assert_eq!(env.get(&tok("x")).unwrap(), Value::number(1.0));
}

#[test]
fn test_environment_assign_reaches_outer_scope() {
    let mut env = Environment::new();
    env.define("count", Value::number(0.0));
    env.push_scope();
    env.assign(&tok("count"), Value::number(1.0)).unwrap();
    env.pop_scope();
    assert_eq!(env.get(&tok("count")).unwrap(), Value::number(1.0));
}

#[test]
fn test_environment_define_global_from_inner_scope() {
    let mut env = Environment::new();
    env.push_scope();
    env.define_global("clock", Value::string("<native fn>"));
    assert!(env.global().borrow().has_local("clock"));
    assert!(!env.current().borrow().has_local("clock"));
    assert_eq!(env.get(&tok("clock")).unwrap(), Value::string("<native fn>"));
}

#[test]
fn test_environment_capture_is_by_reference() {
    let mut env = Environment::new();
    env.push_scope();
    env.define("n", Value::number(1.0));
    let captured = env.capture();
    env.pop_scope();

    // The block is gone from the stack but the closure keeps it alive.
    assert!(is_undefined(&env.get(&tok("n")), "n"));
    captured.assign(&tok("n"), Value::number(2.0)).unwrap();
    assert_eq!(captured.get(&tok("n")).unwrap(), Value::number(2.0));
}

#[test]
fn test_environment_call_scope_uses_captured_parent() {
    let mut env = Environment::new();
    env.push_scope();
    env.define("counter", Value::number(0.0));
    let closure_scope = env.capture();
    env.pop_scope();

    // Calling from an unrelated block still resolves through the capture.
    env.push_scope();
    env.define("counter", Value::string("caller's own"));
    env.push_scope_in(&closure_scope);
    env.assign(&tok("counter"), Value::number(1.0)).unwrap();
    env.pop_scope();

    assert_eq!(closure_scope.get(&tok("counter")).unwrap(), Value::number(1.0));
    assert_eq!(
        env.get(&tok("counter")).unwrap(),
        Value::string("caller's own")
    );
}

#[test]
fn test_environment_child_preserves_global_bindings() {
    let mut env = Environment::new();
    env.define_global("x", Value::number(42.0));
    env.define_global("y", Value::string("hello"));
    env.push_scope();
    env.define("local", Value::nil());

    // child() shares the global scope but not the caller's locals
    let child = env.child();

    assert_eq!(child.depth(), 1);
    assert_eq!(child.get(&tok("x")).unwrap(), Value::number(42.0));
    assert_eq!(child.get(&tok("y")).unwrap(), Value::string("hello"));
    assert!(is_undefined(&child.get(&tok("local")), "local"));
}

//! Unit tests for the compiler module.
//!
//! This module contains tests for:
//! - Scope shadowing and restoring
//! - Evaluation of every expression form
//! - User-defined operators and native externs
//! - Lowering errors and what they leave behind in the context

use super::{
    backend::Backend,
    evaluator::{Evaluator, Lowered},
    scope::ScopeStack,
};
use crate::{
    ast::ast::{Expr, FunctionDef, Item, Prototype},
    context::CompilationContext,
    errors::errors::Error,
    parser::parser::parse,
};

/// Parses `source`, then lowers every item in order.
fn lower_all(evaluator: &mut Evaluator<Vec<u8>>, source: &str) -> (CompilationContext, Vec<Result<Lowered, Error>>) {
    let (parser, items) = parse(source, None);
    let items = items.unwrap();
    let mut context = parser.into_context();

    let results = items
        .iter()
        .map(|item| evaluator.lower_item(item, &mut context))
        .collect();

    (context, results)
}

/// Value of the last top-level expression in `source`.
fn eval(source: &str) -> f64 {
    let mut evaluator = Evaluator::new(vec![]);
    let (_, results) = lower_all(&mut evaluator, source);

    match results.into_iter().last() {
        Some(Ok(Lowered::Evaluated(value))) => value,
        other => panic!("expected an evaluated expression, got {:?}", other),
    }
}

fn eval_err(source: &str) -> Error {
    let mut evaluator = Evaluator::new(vec![]);
    let (_, results) = lower_all(&mut evaluator, source);

    match results.into_iter().last() {
        Some(Err(error)) => error,
        other => panic!("expected an error, got {:?}", other),
    }
}

fn output(source: &str) -> String {
    let mut evaluator = Evaluator::new(vec![]);
    let (_, results) = lower_all(&mut evaluator, source);
    for result in results {
        result.unwrap();
    }

    String::from_utf8(evaluator.into_output()).unwrap()
}

#[test]
fn test_scope_shadows_and_restores() {
    let mut scopes = ScopeStack::new();

    {
        let mut outer = scopes.enter();
        outer.bind("a", 1.0);
        {
            let mut inner = outer.enter();
            inner.bind("a", 2.0);
            inner.bind("b", 3.0);

            assert_eq!(inner.lookup("a"), Some(&2.0));
            assert_eq!(inner.depth(), 2);
        }

        assert_eq!(outer.lookup("a"), Some(&1.0));
        assert_eq!(outer.lookup("b"), None);
        assert_eq!(outer.depth(), 1);
    }

    assert_eq!(scopes.lookup("a"), None);
    assert_eq!(scopes.depth(), 0);
}

#[test]
fn test_scope_rebinding_in_same_frame() {
    let mut scopes = ScopeStack::new();

    {
        let mut outer = scopes.enter();
        outer.bind("x", 1);
        {
            let mut inner = outer.enter();
            inner.bind("x", 2);
            inner.bind("x", 3);
            assert_eq!(inner.lookup("x"), Some(&3));
        }
        assert_eq!(outer.lookup("x"), Some(&1));
    }
}

#[test]
fn test_scope_restores_on_early_exit() {
    fn bind_then_fail(scopes: &mut ScopeStack<i32>) -> Result<(), String> {
        let mut scope = scopes.enter();
        scope.bind("x", 99);

        match scope.lookup("x") {
            Some(&99) => Err(String::from("failed")),
            _ => Ok(()),
        }
    }

    let mut scopes = ScopeStack::new();
    let mut outer = scopes.enter();
    outer.bind("x", 1);

    assert!(bind_then_fail(&mut outer).is_err());
    assert_eq!(outer.lookup("x"), Some(&1));
    assert_eq!(outer.depth(), 1);
}

#[test]
fn test_scope_assignment_through_lookup_mut() {
    let mut scopes = ScopeStack::new();
    let mut scope = scopes.enter();
    scope.bind("x", 1.0);

    if let Some(x) = scope.lookup_mut("x") {
        *x = 5.0;
    }
    assert_eq!(scope.lookup("x"), Some(&5.0));
    assert!(scope.lookup_mut("y").is_none());
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1+2*3"), 7.0);
    assert_eq!(eval("(1+2)*3"), 9.0);
    assert_eq!(eval("10-4-3"), 3.0);
    assert_eq!(eval("2.5*2"), 5.0);
}

#[test]
fn test_comparison_yields_one_or_zero() {
    assert_eq!(eval("1 < 2"), 1.0);
    assert_eq!(eval("2 < 1"), 0.0);
    assert_eq!(eval("2 < 2"), 0.0);
}

#[test]
fn test_if_expression() {
    assert_eq!(eval("if 1 then 2 else 3"), 2.0);
    assert_eq!(eval("if 0 then 2 else 3"), 3.0);
    assert_eq!(eval("if 0.5 then 2 else 3"), 2.0);
}

#[test]
fn test_recursive_function() {
    let source = "
        def fib(x)
          if x < 3 then
            1
          else
            fib(x-1)+fib(x-2)

        fib(10)
    ";

    assert_eq!(eval(source), 55.0);
}

#[test]
fn test_definition_results() {
    let mut evaluator = Evaluator::new(vec![]);
    let (context, results) = lower_all(&mut evaluator, "extern sin(x) def id(x) x id(4)");

    assert_eq!(
        results,
        vec![
            Ok(Lowered::Declared("sin".to_string())),
            Ok(Lowered::Defined("id".to_string())),
            Ok(Lowered::Evaluated(4.0)),
        ]
    );
    assert!(evaluator.is_defined("id"));
    assert!(context.lookup_prototype("sin").is_some());
    assert!(context.lookup_prototype("id").is_some());
    assert_eq!(evaluator.call("id", &[7.0], &context), Ok(7.0));
}

#[test]
fn test_redefinition_overwrites() {
    assert_eq!(eval("def f() 1 def f() 2 f()"), 2.0);
}

#[test]
fn test_user_binary_operator() {
    let source = "
        def binary| 5 (LHS RHS)
          if LHS then 1 else if RHS then 1 else 0

        def binary> 10 (LHS RHS) RHS < LHS;

        (0 | 0) + (0 | 1) + (3 > 2)
    ";

    assert_eq!(eval(source), 2.0);
}

#[test]
fn test_user_unary_operator() {
    let source = "
        def unary!(v) if v then 0 else 1
        def unary-(v) 0-v

        !0 + !1 + -3
    ";

    assert_eq!(eval(source), -2.0);
}

#[test]
fn test_sequencing_operator() {
    let source = "
        extern putchard(char)
        def binary : 1 (x y) y

        putchard(72) : putchard(105) : 7
    ";

    assert_eq!(eval(source), 7.0);
    assert_eq!(output(source), "Hi");
}

#[test]
fn test_var_binds_sequentially() {
    assert_eq!(eval("var a = 1, b = a in a+b"), 2.0);
    assert_eq!(eval("var x in x"), 0.0);
}

#[test]
fn test_var_initializer_sees_outer_binding() {
    assert_eq!(eval("def f(a) var a = a + 1, b = a * 2 in a + b f(1)"), 6.0);
    assert_eq!(eval("def f(a) var a = a in a f(3)"), 3.0);
}

#[test]
fn test_var_restores_shadowed_binding() {
    assert_eq!(eval("def g(x) (var x = 10 in x) + x g(1)"), 11.0);
}

#[test]
fn test_assignment() {
    assert_eq!(eval("def f(x) (x = x + 1) * 0 + x f(1)"), 2.0);
    assert_eq!(eval("var a = 1 in (a = 5) + a"), 10.0);
}

#[test]
fn test_for_loop_runs_body_before_checking() {
    let counter = "
        def count(n)
          var c = 0 in
            (for i = 0, i < n in c = c + 1) + c
    ";

    // end condition is checked against the value before the increment
    assert_eq!(eval(&format!("{counter} count(5)")), 6.0);
    assert_eq!(eval(&format!("{counter} count(0)")), 1.0);
}

#[test]
fn test_for_loop_with_step() {
    let source = "
        def sum(n)
          var total = 0 in
            (for i = 0, i < n, 2 in total = total + i) + total

        sum(6)
    ";

    // i = 0, 2, 4, 6
    assert_eq!(eval(source), 12.0);
}

#[test]
fn test_for_loop_value_and_scope() {
    assert_eq!(eval("for i = 1, i < 3 in i"), 0.0);
    assert_eq!(eval("def f(i) (for i = 0, i < 10 in 0) + i f(42)"), 42.0);
}

#[test]
fn test_natives_write_output() {
    let source = "
        extern putchard(c)
        extern printd(x)

        for i = 65, i < 67 in putchard(i)
        printd(1.5)
    ";

    assert_eq!(output(source), "ABC1.500000\n");
}

#[test]
fn test_natives_require_extern() {
    let error = eval_err("putchard(65)");

    assert_eq!(error.get_error_name(), "UnknownFunction");
}

#[test]
fn test_unknown_names() {
    assert_eq!(eval_err("x + 1").get_error_name(), "UnknownVariable");
    assert_eq!(eval_err("foo(1)").get_error_name(), "UnknownFunction");
    assert_eq!(eval_err("!1").get_error_name(), "UnknownUnaryOperator");
    assert_eq!(eval_err("def f(x) ~x").get_error_name(), "UnknownUnaryOperator");
    assert_eq!(eval_err("def f(x) x = y").get_error_name(), "UnknownVariable");
}

#[test]
fn test_unknown_binary_operator() {
    // `%` has a precedence, but no function implements it
    let mut context = CompilationContext::new();
    context.operators.define('%', 40);
    let item = Item::Expression(FunctionDef::new(
        Prototype::anonymous(),
        Expr::binary('%', Expr::number(1.0), Expr::number(2.0)),
    ));

    let mut evaluator = Evaluator::new(vec![]);
    let error = evaluator.lower_item(&item, &mut context).unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownBinaryOperator");
}

#[test]
fn test_assignment_target_must_be_variable() {
    assert_eq!(
        eval_err("def f(x) (x + 1) = 2").get_error_name(),
        "InvalidAssignmentTarget"
    );
}

#[test]
fn test_argument_count_checked() {
    let error = eval_err("def f(a b) a + b f(1)");

    assert_eq!(error.get_error_name(), "ArgumentCountMismatch");
    assert!(error.to_string().contains("expected 2, received 1"));
}

#[test]
fn test_redefinition_with_new_arity_caught_at_call() {
    let error = eval_err("def f(a) a def g(x) f(x) def f(a b) a g(1)");

    assert_eq!(error.get_error_name(), "ArgumentCountMismatch");
}

#[test]
fn test_call_depth_limit() {
    let mut evaluator = Evaluator::new(vec![]).with_max_call_depth(32);
    let (_, results) = lower_all(&mut evaluator, "def forever(x) forever(x + 1) forever(0)");

    let error = results.last().cloned().unwrap().unwrap_err();
    assert_eq!(error.get_error_name(), "CallDepthExceeded");

    // the evaluator stays usable after unwinding
    let (_, results) = lower_all(&mut evaluator, "def one() 1 one()");
    assert_eq!(results.last().cloned().unwrap(), Ok(Lowered::Evaluated(1.0)));
}

#[test]
fn test_failed_definition_is_withdrawn() {
    let mut evaluator = Evaluator::new(vec![]);
    let (context, results) = lower_all(&mut evaluator, "def binary% 50 (a b) a + c");

    assert_eq!(results[0].as_ref().unwrap_err().get_error_name(), "UnknownVariable");
    assert!(!evaluator.is_defined("{binary%}"));
    assert!(context.lookup_prototype("{binary%}").is_none());
    assert_eq!(context.operators.lookup('%'), None);
}

#[test]
fn test_failed_redefinition_keeps_previous() {
    let mut evaluator = Evaluator::new(vec![]);
    let (context, results) = lower_all(&mut evaluator, "def binary% 50 (a b) a - b def binary% 70 (a b) z 7 % 2");

    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(results[2], Ok(Lowered::Evaluated(5.0)));
    assert_eq!(context.operators.lookup('%'), Some(50));
    assert_eq!(context.lookup_prototype("{binary%}").and_then(|p| p.binary_precedence()), Some(50));
}

#[test]
fn test_less_than_is_unordered() {
    let nan = format!("{} * 0", "9".repeat(400));

    assert_eq!(eval(&format!("var n = {} in n < 1", nan)), 1.0);
    assert_eq!(eval(&format!("var n = {} in 1 < n", nan)), 1.0);
    assert_eq!(eval(&format!("var n = {} in n < n", nan)), 1.0);
    assert_eq!(eval("2 < 1"), 0.0);
    assert_eq!(eval("1 < 1"), 0.0);
}

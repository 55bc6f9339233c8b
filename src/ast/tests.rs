//! Unit tests for the AST module: prototypes, operator naming and dumps.

use super::{
    ast::{
        binary_function_name, unary_function_name, Expr, FunctionDef, Item, OperatorKind,
        Prototype, ANONYMOUS_FUNCTION_NAME,
    },
    display::pretty_print,
};

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_operator_function_names() {
    assert_eq!(unary_function_name('!'), "{unary!}");
    assert_eq!(binary_function_name('~'), "{binary~}");
}

#[test]
fn test_binary_operator_prototype() {
    let prototype = Prototype::operator(
        OperatorKind::Binary {
            operator: '|',
            precedence: 5,
        },
        params(&["a", "b"]),
    )
    .unwrap();

    assert_eq!(prototype.name, "{binary|}");
    assert!(prototype.is_binary_op());
    assert!(!prototype.is_unary_op());
    assert_eq!(prototype.operator_name(), Some('|'));
    assert_eq!(prototype.binary_precedence(), Some(5));
}

#[test]
fn test_operator_prototype_arity() {
    assert!(Prototype::operator(OperatorKind::Unary('-'), params(&["a", "b"])).is_none());
    assert!(Prototype::operator(OperatorKind::Unary('-'), params(&[])).is_none());
    assert!(Prototype::operator(
        OperatorKind::Binary {
            operator: ':',
            precedence: 1
        },
        params(&["a"])
    )
    .is_none());
    assert!(Prototype::operator(OperatorKind::None, params(&["a"])).is_none());

    let unary = Prototype::operator(OperatorKind::Unary('-'), params(&["v"])).unwrap();
    assert!(unary.is_unary_op());
    assert_eq!(unary.binary_precedence(), None);
}

#[test]
fn test_plain_prototype() {
    let prototype = Prototype::new("fib", params(&["n"]));

    assert_eq!(prototype.kind, OperatorKind::None);
    assert_eq!(prototype.operator_name(), None);
    assert_eq!(OperatorKind::None.operand_count(), None);
}

#[test]
fn test_anonymous_function() {
    let function = FunctionDef::new(Prototype::anonymous(), Expr::number(1.0));

    assert!(function.is_anonymous());
    assert_eq!(function.prototype.name, ANONYMOUS_FUNCTION_NAME);
    assert!(function.prototype.params.is_empty());
    assert!(!FunctionDef::new(Prototype::new("f", vec![]), Expr::number(1.0)).is_anonymous());
}

#[test]
fn test_expr_display() {
    let expr = Expr::binary(
        '+',
        Expr::number(1.0),
        Expr::binary('*', Expr::number(2.5), Expr::variable("x")),
    );
    assert_eq!(expr.to_string(), "(+ 1 (* 2.5 x))");

    let expr = Expr::If {
        condition: Box::new(Expr::binary('<', Expr::variable("n"), Expr::number(3.0))),
        then_branch: Box::new(Expr::number(1.0)),
        else_branch: Box::new(Expr::call("fib", vec![Expr::variable("n")])),
    };
    assert_eq!(expr.to_string(), "(if (< n 3) 1 (call fib n))");

    let expr = Expr::For {
        variable: "i".to_string(),
        start: Box::new(Expr::number(1.0)),
        end: Box::new(Expr::variable("n")),
        step: Some(Box::new(Expr::number(2.0))),
        body: Box::new(Expr::unary('!', Expr::variable("i"))),
    };
    assert_eq!(expr.to_string(), "(for (i 1 n 2) (! i))");

    let expr = Expr::Var {
        bindings: vec![("a".to_string(), Some(Expr::number(1.0))), ("b".to_string(), None)],
        body: Box::new(Expr::variable("a")),
    };
    assert_eq!(expr.to_string(), "(var ((a 1) (b)) a)");
}

#[test]
fn test_item_display() {
    let item = Item::Extern(Prototype::new("sin", params(&["x"])));
    assert_eq!(item.to_string(), "(extern sin [x])");

    let item = Item::Definition(FunctionDef::new(
        Prototype::new("id", params(&["x"])),
        Expr::variable("x"),
    ));
    assert_eq!(item.to_string(), "(def id [x] x)");
}

#[test]
fn test_pretty_print() {
    assert_eq!(pretty_print("(+ 1 (* 2 3))"), "(+ 1\n  (* 2 3))");
    assert_eq!(
        pretty_print("(def f [x] (if x (call g x) 0))"),
        "(def f [x]\n  (if x\n    (call g x) 0))"
    );
    assert_eq!(pretty_print("x"), "x");
}

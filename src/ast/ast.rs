/// Name given to the function wrapped around a bare top-level expression.
pub const ANONYMOUS_FUNCTION_NAME: &str = "{__anon_expr}";

/// Precedence of a `binary` operator declared without an explicit number.
pub const DEFAULT_BINARY_PRECEDENCE: i32 = 30;

/// Name under which a unary operator's function is defined and looked up.
pub fn unary_function_name(operator: char) -> String {
    format!("{{unary{}}}", operator)
}

/// Name under which a binary operator's function is defined and looked up.
pub fn binary_function_name(operator: char) -> String {
    format!("{{binary{}}}", operator)
}

/// Expression nodes.
///
/// The grammar is closed: every consumer matches on all variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary {
        operator: char,
        operand: Box<Expr>,
    },
    Binary {
        operator: char,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    For {
        variable: String,
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        body: Box<Expr>,
    },
    /// `var` bindings in source order; each initializer sees only the bindings
    /// before it.
    Var {
        bindings: Vec<(String, Option<Expr>)>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    pub fn variable(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }

    pub fn unary(operator: char, operand: Expr) -> Self {
        Expr::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn binary(operator: char, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(callee: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.to_string(),
            args,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorKind {
    None,
    Unary(char),
    Binary { operator: char, precedence: i32 },
}

impl OperatorKind {
    /// Number of parameters an operator of this kind must declare.
    pub fn operand_count(&self) -> Option<usize> {
        match self {
            OperatorKind::None => None,
            OperatorKind::Unary(_) => Some(1),
            OperatorKind::Binary { .. } => Some(2),
        }
    }
}

/// The signature of a callable: its name and parameter names, and for
/// operator functions the operator they implement.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
    pub kind: OperatorKind,
}

impl Prototype {
    pub fn new(name: &str, params: Vec<String>) -> Self {
        Prototype {
            name: name.to_string(),
            params,
            kind: OperatorKind::None,
        }
    }

    /// Builds an operator prototype, naming it after its operator. Returns
    /// `None` when `params` does not match the operator's arity.
    pub fn operator(kind: OperatorKind, params: Vec<String>) -> Option<Self> {
        let name = match kind {
            OperatorKind::None => return None,
            OperatorKind::Unary(operator) => unary_function_name(operator),
            OperatorKind::Binary { operator, .. } => binary_function_name(operator),
        };

        if kind.operand_count() != Some(params.len()) {
            return None;
        }

        Some(Prototype { name, params, kind })
    }

    pub fn anonymous() -> Self {
        Prototype::new(ANONYMOUS_FUNCTION_NAME, vec![])
    }

    pub fn is_unary_op(&self) -> bool {
        matches!(self.kind, OperatorKind::Unary(_))
    }

    pub fn is_binary_op(&self) -> bool {
        matches!(self.kind, OperatorKind::Binary { .. })
    }

    pub fn operator_name(&self) -> Option<char> {
        match self.kind {
            OperatorKind::None => None,
            OperatorKind::Unary(operator) | OperatorKind::Binary { operator, .. } => Some(operator),
        }
    }

    pub fn binary_precedence(&self) -> Option<i32> {
        match self.kind {
            OperatorKind::Binary { precedence, .. } => Some(precedence),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub prototype: Prototype,
    pub body: Expr,
}

impl FunctionDef {
    pub fn new(prototype: Prototype, body: Expr) -> Self {
        FunctionDef { prototype, body }
    }

    pub fn is_anonymous(&self) -> bool {
        self.prototype.name == ANONYMOUS_FUNCTION_NAME
    }
}

/// A top-level construct as the driver sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Definition(FunctionDef),
    Extern(Prototype),
    /// A bare expression wrapped in an anonymous nullary function.
    Expression(FunctionDef),
}

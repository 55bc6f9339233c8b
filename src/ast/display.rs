//! S-expression rendering of the tree, used by `--dump-ast` and by tests.

use std::fmt::{Display, Formatter, Result};

use super::ast::{Expr, FunctionDef, Item, Prototype};

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Unary { operator, operand } => write!(f, "({} {})", operator, operand),
            Expr::Binary { operator, lhs, rhs } => write!(f, "({} {} {})", operator, lhs, rhs),
            Expr::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "(if {} {} {})", condition, then_branch, else_branch),
            Expr::For {
                variable,
                start,
                end,
                step,
                body,
            } => {
                write!(f, "(for ({} {} {}", variable, start, end)?;
                if let Some(step) = step {
                    write!(f, " {}", step)?;
                }
                write!(f, ") {})", body)
            }
            Expr::Var { bindings, body } => {
                write!(f, "(var (")?;
                for (i, (name, init)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    match init {
                        Some(init) => write!(f, "({} {})", name, init)?,
                        None => write!(f, "({})", name)?,
                    }
                }
                write!(f, ") {})", body)
            }
        }
    }
}

impl Display for Prototype {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} [{}]", self.name, self.params.join(" "))
    }
}

impl Display for FunctionDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "(def {} {})", self.prototype, self.body)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Item::Definition(function) | Item::Expression(function) => write!(f, "{}", function),
            Item::Extern(prototype) => write!(f, "(extern {})", prototype),
        }
    }
}

/// Breaks a rendered S-expression into one nested form per line.
pub fn pretty_print(string: &str) -> String {
    let mut result = String::new();
    let mut indent: usize = 0;

    for c in string.chars() {
        match c {
            '(' => {
                if !result.is_empty() {
                    result.truncate(result.trim_end().len());
                    result.push('\n');
                    result.push_str(&"  ".repeat(indent));
                }
                indent += 1;
                result.push(c);
            }
            ')' => {
                indent = indent.saturating_sub(1);
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

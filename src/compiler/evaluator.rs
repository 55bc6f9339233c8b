//! Tree-walking backend.
//!
//! The evaluator lowers items by running them: definitions are checked and
//! stored, externs are recorded, and anonymous top-level functions are
//! evaluated on the spot. Every value is an `f64`.

use std::{cmp::Ordering, collections::HashMap, io::Write, rc::Rc};

use crate::{
    ast::ast::{binary_function_name, unary_function_name, Expr, FunctionDef, OperatorKind, Prototype},
    context::CompilationContext,
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{backend::Backend, scope::ScopeStack};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// What lowering one item produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Lowered {
    /// An extern was recorded.
    Declared(String),
    /// A named function was stored.
    Defined(String),
    /// An anonymous top-level function ran and returned this.
    Evaluated(f64),
}

/// Functions the evaluator provides itself. They are only callable once a
/// matching `extern` has been seen.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Native {
    /// Writes its argument as a single byte.
    PutCharD,
    /// Writes its argument with six decimals and a newline.
    PrintD,
}

impl Native {
    fn from_name(name: &str) -> Option<Native> {
        match name {
            "putchard" => Some(Native::PutCharD),
            "printd" => Some(Native::PrintD),
            _ => None,
        }
    }
}

enum Callee {
    User(Rc<FunctionDef>),
    Native(Native),
}

impl Callee {
    fn arity(&self) -> usize {
        match self {
            Callee::User(function) => function.prototype.params.len(),
            Callee::Native(_) => 1,
        }
    }
}

fn fail(error: ErrorImpl) -> Error {
    Error::new(error, Position::null())
}

fn truthy(value: f64) -> bool {
    // NaN compares unequal to everything, zero included
    value != 0.0 && !value.is_nan()
}

fn is_builtin_binary(operator: char) -> bool {
    matches!(operator, '=' | '+' | '-' | '*' | '<')
}

pub struct Evaluator<W: Write> {
    functions: HashMap<String, Rc<FunctionDef>>,
    /// Where native functions write
    output: W,
    max_call_depth: usize,
    call_depth: usize,
}

impl<W: Write> Evaluator<W> {
    pub fn new(output: W) -> Self {
        Evaluator {
            functions: HashMap::new(),
            output,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            call_depth: 0,
        }
    }

    pub fn with_max_call_depth(mut self, limit: usize) -> Self {
        self.max_call_depth = limit;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Calls a stored or native function by name.
    pub fn call(&mut self, name: &str, args: &[f64], context: &CompilationContext) -> Result<f64, Error> {
        let callee = self.find_callee(name, context)?;
        check_arity(name, callee.arity(), args.len())?;

        self.invoke(&callee, args, context)
    }

    fn find_callee(&self, name: &str, context: &CompilationContext) -> Result<Callee, Error> {
        if let Some(function) = self.functions.get(name) {
            return Ok(Callee::User(Rc::clone(function)));
        }

        match Native::from_name(name) {
            Some(native) if context.lookup_prototype(name).is_some() => Ok(Callee::Native(native)),
            _ => Err(fail(ErrorImpl::UnknownFunction {
                function: name.to_string(),
            })),
        }
    }

    fn invoke(&mut self, callee: &Callee, args: &[f64], context: &CompilationContext) -> Result<f64, Error> {
        match callee {
            Callee::User(function) => self.call_function(function, args, context),
            Callee::Native(native) => self.call_native(*native, args[0]),
        }
    }

    fn call_function(
        &mut self,
        function: &FunctionDef,
        args: &[f64],
        context: &CompilationContext,
    ) -> Result<f64, Error> {
        if self.call_depth >= self.max_call_depth {
            return Err(fail(ErrorImpl::CallDepthExceeded {
                limit: self.max_call_depth,
            }));
        }

        self.call_depth += 1;
        let mut scopes = ScopeStack::new();
        let result = {
            let mut scope = scopes.enter();
            for (param, value) in function.prototype.params.iter().zip(args) {
                scope.bind(param, *value);
            }

            self.eval(&function.body, &mut scope, context)
        };
        self.call_depth -= 1;

        result
    }

    fn call_native(&mut self, native: Native, value: f64) -> Result<f64, Error> {
        let written = match native {
            Native::PutCharD => self.output.write_all(&[value as u8]),
            Native::PrintD => writeln!(self.output, "{:.6}", value),
        };

        written
            .and_then(|_| self.output.flush())
            .map_err(|error| {
                fail(ErrorImpl::Output {
                    message: error.to_string(),
                })
            })?;

        Ok(0.0)
    }

    fn eval(&mut self, expr: &Expr, scopes: &mut ScopeStack<f64>, context: &CompilationContext) -> Result<f64, Error> {
        match expr {
            Expr::Number(value) => Ok(*value),
            Expr::Variable(name) => scopes.lookup(name).copied().ok_or_else(|| {
                fail(ErrorImpl::UnknownVariable {
                    variable: name.clone(),
                })
            }),
            Expr::Unary { operator, operand } => {
                let value = self.eval(operand, scopes, context)?;

                let name = unary_function_name(*operator);
                let callee = self
                    .find_callee(&name, context)
                    .map_err(|_| fail(ErrorImpl::UnknownUnaryOperator { operator: *operator }))?;
                check_arity(&name, callee.arity(), 1)?;

                self.invoke(&callee, &[value], context)
            }
            Expr::Binary { operator: '=', lhs, rhs } => {
                let Expr::Variable(name) = lhs.as_ref() else {
                    return Err(fail(ErrorImpl::InvalidAssignmentTarget));
                };
                let value = self.eval(rhs, scopes, context)?;

                match scopes.lookup_mut(name) {
                    Some(slot) => {
                        *slot = value;
                        Ok(value)
                    }
                    None => Err(fail(ErrorImpl::UnknownVariable {
                        variable: name.clone(),
                    })),
                }
            }
            Expr::Binary { operator, lhs, rhs } => {
                let lhs = self.eval(lhs, scopes, context)?;
                let rhs = self.eval(rhs, scopes, context)?;

                match operator {
                    '+' => Ok(lhs + rhs),
                    '-' => Ok(lhs - rhs),
                    '*' => Ok(lhs * rhs),
                    // unordered: NaN on either side compares as less
                    '<' => Ok(match lhs.partial_cmp(&rhs) {
                        Some(Ordering::Less) | None => 1.0,
                        _ => 0.0,
                    }),
                    _ => {
                        let name = binary_function_name(*operator);
                        let callee = self
                            .find_callee(&name, context)
                            .map_err(|_| fail(ErrorImpl::UnknownBinaryOperator { operator: *operator }))?;
                        check_arity(&name, callee.arity(), 2)?;

                        self.invoke(&callee, &[lhs, rhs], context)
                    }
                }
            }
            Expr::Call { callee: name, args } => {
                let callee = self.find_callee(name, context)?;
                check_arity(name, callee.arity(), args.len())?;

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, scopes, context)?);
                }

                self.invoke(&callee, &values, context)
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if truthy(self.eval(condition, scopes, context)?) {
                    self.eval(then_branch, scopes, context)
                } else {
                    self.eval(else_branch, scopes, context)
                }
            }
            Expr::For {
                variable,
                start,
                end,
                step,
                body,
            } => {
                let start = self.eval(start, scopes, context)?;

                let mut scope = scopes.enter();
                scope.bind(variable, start);

                // The body runs before the end condition is first checked
                loop {
                    self.eval(body, &mut scope, context)?;

                    let step = match step {
                        Some(step) => self.eval(step, &mut scope, context)?,
                        None => 1.0,
                    };
                    let end = self.eval(end, &mut scope, context)?;

                    if let Some(current) = scope.lookup_mut(variable) {
                        *current += step;
                    }

                    if !truthy(end) {
                        break;
                    }
                }

                Ok(0.0)
            }
            Expr::Var { bindings, body } => {
                let mut scope = scopes.enter();

                for (name, init) in bindings {
                    let value = match init {
                        Some(init) => self.eval(init, &mut scope, context)?,
                        None => 0.0,
                    };
                    scope.bind(name, value);
                }

                self.eval(body, &mut scope, context)
            }
        }
    }
}

impl<W: Write> Backend for Evaluator<W> {
    type Value = Lowered;

    fn lower_prototype(&mut self, prototype: &Prototype, context: &mut CompilationContext) -> Result<Lowered, Error> {
        context.insert_prototype(prototype.clone());

        Ok(Lowered::Declared(prototype.name.clone()))
    }

    /// Checks the body against what is declared, then stores the function or,
    /// for an anonymous one, runs it.
    ///
    /// A body that does not check leaves the context as it was before the
    /// definition: an operator declared earlier gets its old precedence back,
    /// and a binary operator nobody implements loses its precedence.
    fn lower_function(&mut self, function: &FunctionDef, context: &mut CompilationContext) -> Result<Lowered, Error> {
        if function.is_anonymous() {
            resolve_function(function, context)?;
            let value = self.call_function(function, &[], context)?;

            return Ok(Lowered::Evaluated(value));
        }

        let name = function.prototype.name.clone();
        let previous = context.insert_prototype(function.prototype.clone());

        if let Err(error) = resolve_function(function, context) {
            let restored = previous.as_ref().and_then(|prototype| prototype.binary_precedence());

            if let OperatorKind::Binary { operator, .. } = function.prototype.kind {
                match restored {
                    Some(precedence) => {
                        context.operators.define(operator, precedence);
                    }
                    None if !self.functions.contains_key(&name) => {
                        context.operators.remove(operator);
                    }
                    None => {}
                }
            }

            match previous {
                Some(prototype) => context.insert_prototype(prototype),
                None => context.remove_prototype(&name),
            };

            return Err(error);
        }

        self.functions.insert(name.clone(), Rc::new(function.clone()));

        Ok(Lowered::Defined(name))
    }
}

fn check_arity(function: &str, expected: usize, received: usize) -> Result<(), Error> {
    if expected != received {
        return Err(fail(ErrorImpl::ArgumentCountMismatch {
            function: function.to_string(),
            expected,
            received,
        }));
    }

    Ok(())
}

/// Checks that every name the body uses is bound or declared, and that calls
/// pass as many arguments as the callee's prototype takes.
fn resolve_function(function: &FunctionDef, context: &CompilationContext) -> Result<(), Error> {
    let mut scopes = ScopeStack::new();
    let mut scope = scopes.enter();
    for param in &function.prototype.params {
        scope.bind(param, ());
    }

    resolve(&function.body, &mut scope, context)
}

fn resolve(expr: &Expr, scopes: &mut ScopeStack<()>, context: &CompilationContext) -> Result<(), Error> {
    match expr {
        Expr::Number(_) => Ok(()),
        Expr::Variable(name) => {
            if !scopes.contains(name) {
                return Err(fail(ErrorImpl::UnknownVariable {
                    variable: name.clone(),
                }));
            }

            Ok(())
        }
        Expr::Unary { operator, operand } => {
            resolve(operand, scopes, context)?;

            if context.lookup_prototype(&unary_function_name(*operator)).is_none() {
                return Err(fail(ErrorImpl::UnknownUnaryOperator { operator: *operator }));
            }

            Ok(())
        }
        Expr::Binary { operator: '=', lhs, rhs } => {
            let Expr::Variable(name) = lhs.as_ref() else {
                return Err(fail(ErrorImpl::InvalidAssignmentTarget));
            };
            resolve(rhs, scopes, context)?;

            if !scopes.contains(name) {
                return Err(fail(ErrorImpl::UnknownVariable {
                    variable: name.clone(),
                }));
            }

            Ok(())
        }
        Expr::Binary { operator, lhs, rhs } => {
            resolve(lhs, scopes, context)?;
            resolve(rhs, scopes, context)?;

            if !is_builtin_binary(*operator) && context.lookup_prototype(&binary_function_name(*operator)).is_none() {
                return Err(fail(ErrorImpl::UnknownBinaryOperator { operator: *operator }));
            }

            Ok(())
        }
        Expr::Call { callee, args } => {
            let prototype = context.lookup_prototype(callee).ok_or_else(|| {
                fail(ErrorImpl::UnknownFunction {
                    function: callee.clone(),
                })
            })?;
            check_arity(callee, prototype.params.len(), args.len())?;

            for arg in args {
                resolve(arg, scopes, context)?;
            }

            Ok(())
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            resolve(condition, scopes, context)?;
            resolve(then_branch, scopes, context)?;
            resolve(else_branch, scopes, context)
        }
        Expr::For {
            variable,
            start,
            end,
            step,
            body,
        } => {
            resolve(start, scopes, context)?;

            let mut scope = scopes.enter();
            scope.bind(variable, ());

            resolve(end, &mut scope, context)?;
            if let Some(step) = step {
                resolve(step, &mut scope, context)?;
            }
            resolve(body, &mut scope, context)
        }
        Expr::Var { bindings, body } => {
            let mut scope = scopes.enter();

            for (name, init) in bindings {
                if let Some(init) = init {
                    resolve(init, &mut scope, context)?;
                }
                scope.bind(name, ());
            }

            resolve(body, &mut scope, context)
        }
    }
}

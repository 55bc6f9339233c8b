use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error} at {position}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Moves the error to `position`. Lowering errors are raised without a
    /// source location and get the one of the item that failed.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Whether the error came out of the parser rather than out of lowering.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::ExpectedExpression { .. }
                | ErrorImpl::ExpectedToken { .. }
                | ErrorImpl::ExpectedIdentifier { .. }
                | ErrorImpl::ExpectedFunctionName { .. }
                | ErrorImpl::ExpectedOperator { .. }
                | ErrorImpl::InvalidPrecedence { .. }
                | ErrorImpl::InvalidOperandCount { .. }
                | ErrorImpl::MalformedNumber { .. }
                | ErrorImpl::NestingTooDeep { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::ExpectedIdentifier { .. } => "ExpectedIdentifier",
            ErrorImpl::ExpectedFunctionName { .. } => "ExpectedFunctionName",
            ErrorImpl::ExpectedOperator { .. } => "ExpectedOperator",
            ErrorImpl::InvalidPrecedence { .. } => "InvalidPrecedence",
            ErrorImpl::InvalidOperandCount { .. } => "InvalidOperandCount",
            ErrorImpl::MalformedNumber { .. } => "MalformedNumber",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::UnknownVariable { .. } => "UnknownVariable",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::UnknownUnaryOperator { .. } => "UnknownUnaryOperator",
            ErrorImpl::UnknownBinaryOperator { .. } => "UnknownBinaryOperator",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::CallDepthExceeded { .. } => "CallDepthExceeded",
            ErrorImpl::Output { .. } => "Output",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::ExpectedExpression { token } => ErrorTip::Suggestion(format!(
                "Unknown token `{}` when expecting an expression",
                token
            )),
            ErrorImpl::ExpectedToken { expected, token } => {
                ErrorTip::Suggestion(format!("Expected {}, found `{}`", expected, token))
            }
            ErrorImpl::ExpectedIdentifier { context, token } => ErrorTip::Suggestion(format!(
                "Expected identifier {}, found `{}`",
                context, token
            )),
            ErrorImpl::ExpectedFunctionName { token } => ErrorTip::Suggestion(format!(
                "Expected function name in prototype, found `{}`",
                token
            )),
            ErrorImpl::ExpectedOperator { kind, token } => ErrorTip::Suggestion(format!(
                "Expected {} operator character, found `{}`",
                kind, token
            )),
            ErrorImpl::InvalidPrecedence { value } => ErrorTip::Suggestion(format!(
                "Invalid precedence `{}`, must be 1..100",
                value
            )),
            ErrorImpl::InvalidOperandCount { expected, received } => ErrorTip::Suggestion(format!(
                "Operator takes {} operands, prototype names {}",
                expected, received
            )),
            ErrorImpl::MalformedNumber { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, does it contain more than one `.`?",
                token
            )),
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Expression nests deeper than {} levels",
                limit
            )),
            ErrorImpl::UnknownVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::UnknownFunction { function } => ErrorTip::Suggestion(format!(
                "Function `{}` not defined, is it missing an `extern`?",
                function
            )),
            ErrorImpl::UnknownUnaryOperator { operator } => ErrorTip::Suggestion(format!(
                "Unary operator `{}` not defined, declare it with `def unary{}`",
                operator, operator
            )),
            ErrorImpl::UnknownBinaryOperator { operator } => ErrorTip::Suggestion(format!(
                "Binary operator `{}` not defined, declare it with `def binary{}`",
                operator, operator
            )),
            ErrorImpl::ArgumentCountMismatch { function, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "`{}` expects {} arguments, received {}",
                    function, expected, received
                ))
            }
            ErrorImpl::InvalidAssignmentTarget => {
                ErrorTip::Suggestion(String::from("Destination of `=` must be a variable"))
            }
            ErrorImpl::CallDepthExceeded { limit } => ErrorTip::Suggestion(format!(
                "Calls nest deeper than {}, is there unbounded recursion?",
                limit
            )),
            ErrorImpl::Output { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unknown token when expecting an expression: {token:?}")]
    ExpectedExpression { token: String },
    #[error("expected {expected}, found {token:?}")]
    ExpectedToken { expected: String, token: String },
    #[error("expected identifier {context}, found {token:?}")]
    ExpectedIdentifier { context: String, token: String },
    #[error("expected function name in prototype, found {token:?}")]
    ExpectedFunctionName { token: String },
    #[error("expected {kind} operator, found {token:?}")]
    ExpectedOperator { kind: String, token: String },
    #[error("invalid precedence {value}: must be 1..100")]
    InvalidPrecedence { value: f64 },
    #[error("invalid number of operands for operator: expected {expected}, received {received}")]
    InvalidOperandCount { expected: usize, received: usize },
    #[error("malformed number literal {token:?}")]
    MalformedNumber { token: String },
    #[error("expression nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("unknown variable name {variable:?}")]
    UnknownVariable { variable: String },
    #[error("unknown function referenced {function:?}")]
    UnknownFunction { function: String },
    #[error("unknown unary operator {operator:?}")]
    UnknownUnaryOperator { operator: char },
    #[error("unknown binary operator {operator:?}")]
    UnknownBinaryOperator { operator: char },
    #[error("incorrect number of arguments passed to {function:?}: expected {expected}, received {received}")]
    ArgumentCountMismatch { function: String, expected: usize, received: usize },
    #[error("destination of '=' must be a variable")]
    InvalidAssignmentTarget,
    #[error("call depth exceeds {limit}")]
    CallDepthExceeded { limit: usize },
    #[error("failed to write output: {message}")]
    Output { message: String },
}

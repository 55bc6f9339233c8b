//! Utility macros for the front end.
//!
//! This module defines helper macros used throughout the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's source text
/// * `$number` - Optional numeric payload, only given for number tokens
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Identifier, "foo".to_string(), span);
/// let number = MK_TOKEN!(TokenKind::Number, "4.5".to_string(), 4.5, span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            number: None,
            span: $span,
        }
    };
    ($kind:expr, $value:expr, $number:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            number: Some($number),
            span: $span,
        }
    };
}

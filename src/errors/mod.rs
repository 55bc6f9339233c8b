//! Error types and error handling for the front end.
//!
//! This module defines the error types used throughout parsing and
//! lowering. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for parsing and lowering failures
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;

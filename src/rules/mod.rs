//! Rule implementations for apiusage.
//!
//! This module contains pure functions that turn a finished usage report into
//! issues. Each function takes only the specific inputs it needs (not a full
//! run report) and returns a specific issue type.
//!
//! ## Module Structure
//!
//! - `unused`: Declared endpoints with no references
//! - `unmatched`: Path literals in code that match no declaration
//! - `malformed`: Templates with invalid placeholder syntax
//! - `duplicate`: Declarations structurally equal to an earlier one
//! - `read_error`: Source files that could not be read

pub mod duplicate;
pub mod malformed;
pub mod read_error;
pub mod unmatched;
pub mod unused;

//! apiusage - API endpoint usage checker
//!
//! apiusage is a CLI tool and library for finding which endpoints declared in
//! an OpenAPI document (or a plain endpoint list) are referenced by one or more
//! client codebases, where each reference occurs, and which endpoints are never
//! used.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Matching and aggregation engine plus its loader and extractors
//! - `issues`: Issue type definitions and reporting
//! - `rules`: Detection rules turning a usage report into issues

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;

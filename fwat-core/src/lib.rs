//! Core compiler pipeline for the fwat expression language.
//!
//! The pipeline is:
//!
//!   source text
//!     -> parser       (ordered-choice, backtracking; surface AST)
//!     -> pretty       (canonical source text)
//!      | codegen_wat  (WebAssembly text-format module)
//!
//! Both renderers are pure functions over the same tree and never fail.
//! Tools (CLI, tests) should depend on this crate rather than
//! reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod error;
pub mod limits;

// ---------------------------------------------------------------------
// Front-end: syntax tree and parsing
// ---------------------------------------------------------------------

pub mod ast;
pub mod parser;

// ---------------------------------------------------------------------
// Back-ends and compiler orchestration
// ---------------------------------------------------------------------

pub mod pretty;
pub mod codegen_wat;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::{CaseArm, Expr, Operator};
pub use compiler::{EmitFormat, UnsupportedFormat, compile};
pub use error::ParseError;
pub use parser::parse;
pub use span::Location;

//! Implementation limits.
//!
//! The parser and both renderers recurse once per level of expression
//! nesting. Bounding nesting at parse time keeps every tree the parser
//! hands out within a call-stack depth the renderers can always handle.

/// Maximum expression nesting accepted by the parser.
///
/// Each parenthesised group, infix right operand, case result, call
/// argument and declaration body counts as one level.
pub const MAX_NESTING_DEPTH: usize = 256;

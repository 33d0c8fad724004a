use core::fmt;
use core::str::FromStr;

use crate::codegen_wat;
use crate::error::ParseError;
use crate::parser::parse;
use crate::pretty;

/// Output produced by [`compile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitFormat {
    /// WebAssembly text format module.
    Wat,
    /// Canonical re-rendering of the source.
    Pretty,
}

impl FromStr for EmitFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wat" => Ok(EmitFormat::Wat),
            "pretty" => Ok(EmitFormat::Pretty),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for EmitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitFormat::Wat => f.write_str("wat"),
            EmitFormat::Pretty => f.write_str("pretty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported emit format: {0} (expected `wat` or `pretty`)")]
pub struct UnsupportedFormat(pub String);

/// Parse `source` and render it in the requested format.
pub fn compile(source: &str, format: EmitFormat) -> Result<String, ParseError> {
    let program = parse(source)?;
    Ok(match format {
        EmitFormat::Wat => codegen_wat::emit(&program),
        EmitFormat::Pretty => pretty::render(&program),
    })
}

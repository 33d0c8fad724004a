use std::collections::BTreeSet;

use thiserror::Error;

use crate::span::Location;

/// Why a source text could not be turned into an AST.
///
/// Parsing is all-or-nothing: whichever variant is returned, no partial
/// tree is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse error at {location}: expected {}", describe_expected(.expected))]
    Unexpected {
        location: Location,
        expected: BTreeSet<&'static str>,
    },
    #[error("parse error at {location}: expressions nested deeper than {limit} levels")]
    NestingTooDeep { location: Location, limit: usize },
    #[error("parse error at {location}: integer literal does not fit in 32 bits")]
    LiteralOutOfRange { location: Location },
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            ParseError::Unexpected { location, .. }
            | ParseError::NestingTooDeep { location, .. }
            | ParseError::LiteralOutOfRange { location } => *location,
        }
    }

    /// Byte offset of the failure in the source text.
    pub fn position(&self) -> usize {
        self.location().offset
    }
}

fn describe_expected(expected: &BTreeSet<&'static str>) -> String {
    match expected.len() {
        0 => "nothing".to_string(),
        1 => expected.iter().copied().collect(),
        _ => {
            let items: Vec<&str> = expected.iter().copied().collect();
            format!("one of {}", items.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_expected_tokens_in_message() {
        let err = ParseError::Unexpected {
            location: Location::locate("f x = ", 6),
            expected: ["\"(\"", "digit"].into_iter().collect(),
        };
        assert_eq!(
            err.to_string(),
            "parse error at line 1, column 7: expected one of \"(\", digit"
        );
        assert_eq!(err.position(), 6);
    }

    #[test]
    fn single_expectation_is_not_a_list() {
        let err = ParseError::Unexpected {
            location: Location::locate("(1", 2),
            expected: ["\")\""].into_iter().collect(),
        };
        assert!(err.to_string().ends_with("expected \")\""));
    }
}

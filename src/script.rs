//! Script error classification
//!
//! Errors found while interpreting a test script are collected per element.
//! One bad element never stops the validation of its siblings.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::Error;

/// Kinds of script error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScriptErrorKind {
    IdentifierUndefined,
    InvalidExpression,
    InvalidStatement,
    InvalidType,
}

impl ScriptErrorKind {
    pub const ALL: [ScriptErrorKind; 4] = [
        ScriptErrorKind::IdentifierUndefined,
        ScriptErrorKind::InvalidExpression,
        ScriptErrorKind::InvalidStatement,
        ScriptErrorKind::InvalidType,
    ];

    /// Wire code of the kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::IdentifierUndefined => "IDENTIFIER_UNDEFINED",
            Self::InvalidExpression => "INVALID_EXPRESSION",
            Self::InvalidStatement => "INVALID_STATEMENT",
            Self::InvalidType => "INVALID_TYPE",
        }
    }

    /// Human-readable description of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdentifierUndefined => "identifier undefined",
            Self::InvalidExpression => "invalid expression",
            Self::InvalidStatement => "invalid statement",
            Self::InvalidType => "invalid type",
        }
    }
}

impl fmt::Display for ScriptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptErrorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownScriptErrorKind(s.to_string()))
    }
}

/// An error raised while interpreting a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind}: {message} (status {status})")]
pub struct ScriptError {
    kind: ScriptErrorKind,
    /// Caller-defined status, passed through untouched
    status: i32,
    message: String,
}

impl ScriptError {
    pub fn new(kind: ScriptErrorKind, message: impl Into<String>, status: i32) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    /// Build an error from a raw kind code, failing on an unknown code
    pub fn from_code(code: &str, message: impl Into<String>, status: i32) -> crate::Result<Self> {
        Ok(Self::new(code.parse()?, message, status))
    }

    pub fn kind(&self) -> ScriptErrorKind {
        self.kind
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A script error attached to the element it was raised on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedElement {
    pub element: String,
    pub error: ScriptError,
}

/// Collects script errors during a validation pass
#[derive(Debug, Default)]
pub struct ScriptErrorHandler {
    flagged: Vec<FlaggedElement>,
}

impl ScriptErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against an element and keep going
    pub fn flag(&mut self, element: impl Into<String>, error: ScriptError) {
        self.flagged.push(FlaggedElement {
            element: element.into(),
            error,
        });
    }

    /// Run `check` over every element, flagging each failure
    ///
    /// Returns every error collected so far, including earlier flags.
    pub fn validate<E, F>(
        &mut self,
        elements: impl IntoIterator<Item = E>,
        mut check: F,
    ) -> &[FlaggedElement]
    where
        E: fmt::Display,
        F: FnMut(&E) -> std::result::Result<(), ScriptError>,
    {
        for element in elements {
            if let Err(error) = check(&element) {
                self.flag(element.to_string(), error);
            }
        }
        &self.flagged
    }

    pub fn errors(&self) -> &[FlaggedElement] {
        &self.flagged
    }

    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }

    pub fn into_errors(self) -> Vec<FlaggedElement> {
        self.flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_round_trip() {
        for kind in ScriptErrorKind::ALL {
            assert_eq!(kind.code().parse::<ScriptErrorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_fails() {
        let err = ScriptError::from_code("SEGFAULT", "boom", 1).unwrap_err();
        assert!(matches!(err, Error::UnknownScriptErrorKind(ref code) if code == "SEGFAULT"));
    }

    #[test]
    fn test_error_display() {
        let error = ScriptError::new(ScriptErrorKind::InvalidType, "expected int", 7);
        assert_eq!(error.to_string(), "invalid type: expected int (status 7)");
        assert_eq!(error.status(), 7);
        assert_eq!(error.message(), "expected int");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut handler = ScriptErrorHandler::new();
        let lines = ["sta_reset", "$undefined", "ap_config", "if (", "sniffer_stop"];

        let errors = handler.validate(lines, |line| {
            if line.starts_with('$') {
                Err(ScriptError::new(
                    ScriptErrorKind::IdentifierUndefined,
                    format!("{} is not defined", line),
                    1,
                ))
            } else if line.ends_with('(') {
                Err(ScriptError::new(ScriptErrorKind::InvalidStatement, "unclosed", 2))
            } else {
                Ok(())
            }
        });

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].element, "$undefined");
        assert_eq!(errors[1].error.kind(), ScriptErrorKind::InvalidStatement);
    }

    #[test]
    fn test_clean_handler() {
        let mut handler = ScriptErrorHandler::new();
        handler.validate(["a", "b"], |_| Ok(()));
        assert!(handler.is_clean());
        assert!(handler.into_errors().is_empty());
    }
}

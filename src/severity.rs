use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Diagnostic levels, least serious first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Message,
    Warning,
    Error,
    Fatal,
}

/// Reports at or above this level count as errors.
pub const ERROR_THRESHOLD: Severity = Severity::Error;

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Message,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn is_error(self) -> bool {
        self >= ERROR_THRESHOLD
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Message => "message",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity \"{0}\" (expected debug, message, warning, error or fatal)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "message" => Ok(Severity::Message),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Debug < Severity::Message);
        assert!(Severity::Message < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_is_error() {
        let errors: Vec<Severity> = Severity::ALL
            .iter()
            .copied()
            .filter(|s| s.is_error())
            .collect();

        assert_eq!(vec![Severity::Error, Severity::Fatal], errors);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Ok(Severity::Warning), "Warning".parse());
        assert_eq!(Ok(Severity::Warning), "warn".parse());
        assert_eq!(Ok(Severity::Fatal), " fatal ".parse());

        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(ParseSeverityError(String::from("loud")), err);
        assert!(err.to_string().contains("\"loud\""));
    }

    #[test]
    fn test_display_parses_back() {
        for severity in Severity::ALL {
            assert_eq!(Ok(severity), severity.to_string().parse());
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            "\"warning\"",
            serde_json::to_string(&Severity::Warning).unwrap()
        );
        let severity: Severity = serde_json::from_str("\"fatal\"").unwrap();
        assert_eq!(Severity::Fatal, severity);
    }
}

//! Semantic checks on a loaded configuration.

use crate::schema::CourierConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "messages.max_caption_length"
    pub path: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn push(&mut self, severity: Severity, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

/// Caption length above the size the delivery subsystem accepts for a single
/// message.
const CAPTION_LENGTH_CEILING: usize = 16_384;

pub fn validate(config: &CourierConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    let max = config.messages.max_caption_length;
    if max == 0 {
        result.push(
            Severity::Error,
            "messages.max_caption_length",
            "must be greater than zero; every caption would be rejected",
        );
    } else if max > CAPTION_LENGTH_CEILING {
        result.push(
            Severity::Warning,
            "messages.max_caption_length",
            format!("{max} exceeds {CAPTION_LENGTH_CEILING}"),
        );
    }

    for (key, _) in &config.metrics.labels {
        if key.is_empty() {
            result.push(Severity::Error, "metrics.labels", "label name is empty");
        }
    }

    result
}

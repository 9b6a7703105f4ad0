//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Script-level error: everything the CLI or a host can see
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {message}")]
    Io { message: String },

    /// Malformed program document (the JSON statement tree)
    #[error("Program error: {message}")]
    Program { message: String },
}

impl ScriptError {
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn program_error(message: impl Into<String>) -> Self {
        Self::Program {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Runtime(e) => e.span,
            Self::Io { .. } | Self::Program { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Runtime(e) => e.message.clone(),
            Self::Io { message } | Self::Program { message } => message.clone(),
        }
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for ScriptError {
    fn from(e: serde_json::Error) -> Self {
        Self::program_error(e.to_string())
    }
}

/// Render an error report over the original script source. The source is
/// host-provided: this crate consumes pre-parsed trees, but the spans in
/// them point back into the text the host parsed.
pub fn format_error_report(filename: &str, source: &str, error: &ScriptError) -> String {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let span = error.span().unwrap_or(Span::none());
    let mut buf = Vec::new();
    Report::build(ReportKind::Error, (filename, span.start..span.end))
        .with_config(Config::default().with_color(false))
        .with_message("Runtime error")
        .with_label(
            Label::new((filename, span.start..span.end)).with_message(error.message()),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf)
        .unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &ScriptError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span().unwrap_or(Span::none());
    Report::build(ReportKind::Error, (filename, span.start..span.end))
        .with_message("Runtime error")
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(error.message())
                .with_color(Color::Red),
        )
        .finish()
        .print((filename, Source::from(source)))
        .unwrap();
}

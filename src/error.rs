//! Error types for loading template catalogs

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },

    #[error("invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("template '{name}' names unknown alternate '{alternate}'")]
    UnknownAlternate { name: String, alternate: String },

    #[error("template not found: {name}")]
    NotFound { name: String },
}

impl CatalogError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InvalidTemplate {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        CatalogError::NotFound { name: name.into() }
    }

    /// Format the error with source context using ariadne. Errors without a
    /// source position fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (span, message): (Range<usize>, String) = match self {
            CatalogError::Toml(err) => match err.span() {
                Some(span) => (span, err.message().to_string()),
                None => return self.to_string(),
            },
            _ => return self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(false))
            .with_message("invalid template catalog")
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, message),
        }
    }
}

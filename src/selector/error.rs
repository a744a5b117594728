//! Error types for template selection and layout planning

use thiserror::Error;

use crate::error::CatalogError;

/// Errors that can occur while choosing and materialising a layout.
///
/// A template that cannot be sized or a box that cannot be placed is not an
/// error at the selection level; those come back as `None` values. These
/// variants cover bad input and the final seating step.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A template name that the registry does not hold
    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },

    #[error("invalid selector configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("a layout needs at least one player")]
    NoPlayers,

    /// Not even the emergency retry found a usable cell size
    #[error("template '{template}' has no usable cell size in a {width}x{height} window")]
    Unsized {
        template: String,
        width: i32,
        height: i32,
    },

    #[error("seats for template '{template}' do not fit at cell size {cell}")]
    SeatingFailed { template: String, cell: i32 },

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl PlanError {
    pub fn unknown_template(name: impl Into<String>) -> Self {
        PlanError::UnknownTemplate { name: name.into() }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        PlanError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

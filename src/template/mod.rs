//! Seating templates
//!
//! A template names an [`Arrangement`] of player panels around the board.
//! The arrangement yields both the sizing formula ([`TemplateSpec`]) the
//! selector scores, and the seat positions carved out of the allocator once
//! a cell size is chosen. Templates are collected in a
//! [`TemplateRegistry`], loaded from TOML:
//!
//! ```toml
//! [[template]]
//! name = "portrait"
//! arrangement = "strip"
//! edge = "bottom"
//! columns = 1
//! alternate = "portrait-2x"
//! ```

mod arrangement;
mod registry;
mod spec;

pub use arrangement::{Arrangement, Seat};
pub use registry::{TemplateDefinition, TemplateRegistry};
pub use spec::{LinearPanel, PanelSizer, PanelUnits, TemplateSpec};

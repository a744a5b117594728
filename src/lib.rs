//! Seat Layout - window layout for board games with player panels
//!
//! This library provides a free-rectangle allocator and a template-driven
//! selector that decides where player panels sit around a game board.
//!
//! # Example
//!
//! ```rust
//! use seat_layout::geometry::Size;
//! use seat_layout::plan_layout;
//! use seat_layout::template::LinearPanel;
//!
//! let mut plan = plan_layout(4, Size::new(1280, 800), None, &LinearPanel::new(5.0, 3.0)).unwrap();
//! assert_eq!(plan.seats.len(), 4);
//! assert!(plan.board().is_some());
//! ```

pub mod allocator;
pub mod error;
pub mod geometry;
pub mod selector;
pub mod template;

pub use allocator::{Allocator, AllocatorConfig, Placement, PlacementRequest, Shape};
pub use error::CatalogError;
pub use geometry::{Rect, Size};
pub use selector::{LayoutPlan, LayoutResult, LayoutSelector, PlanError, SelectorConfig};
pub use template::{PanelSizer, TemplateRegistry};

/// Configuration for a complete layout pass
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Sizing and selection tunables
    pub selector: SelectorConfig,
    /// Templates to choose from
    pub registry: TemplateRegistry,
    /// Template currently on screen, favoured by the hysteresis factor
    pub active: Option<String>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            selector: SelectorConfig::default(),
            registry: TemplateRegistry::builtin(),
            active: None,
        }
    }
}

impl PlanConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selector(mut self, config: SelectorConfig) -> Self {
        self.selector = config;
        self
    }

    /// Replace the built-in templates
    pub fn with_registry(mut self, registry: TemplateRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_active(mut self, name: impl Into<String>) -> Self {
        self.active = Some(name.into());
        self
    }
}

/// Plan a layout with the built-in templates and default configuration
///
/// This is the main entry point for the library. It chooses a template,
/// sizes it and seats every player; the returned plan still holds the
/// board, ready for [`LayoutPlan::board`].
pub fn plan_layout(
    players: usize,
    window: Size,
    seating: Option<&str>,
    panel: &dyn PanelSizer,
) -> Result<LayoutPlan, PlanError> {
    plan_layout_with_config(players, window, seating, panel, &PlanConfig::default())
}

/// Plan a layout with a custom configuration
///
/// # Example
///
/// ```rust
/// use seat_layout::{plan_layout_with_config, PlanConfig, SelectorConfig, Size};
/// use seat_layout::template::LinearPanel;
///
/// let config = PlanConfig::new()
///     .with_selector(SelectorConfig::new().with_hysteresis(1.2))
///     .with_active("landscape");
///
/// let plan = plan_layout_with_config(2, Size::new(1000, 600), None, &LinearPanel::new(4.0, 3.0), &config).unwrap();
/// assert_eq!(plan.seats.len(), 2);
/// ```
pub fn plan_layout_with_config(
    players: usize,
    window: Size,
    seating: Option<&str>,
    panel: &dyn PanelSizer,
    config: &PlanConfig,
) -> Result<LayoutPlan, PlanError> {
    let mut selector = LayoutSelector::new(&config.registry, config.selector.clone());
    if let Some(active) = &config.active {
        selector = selector.with_active(active.as_str());
    }
    selector.plan(players, window, seating, panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::check;
    use crate::template::LinearPanel;

    #[test]
    fn test_plan_simple_layout() {
        let mut plan = plan_layout(2, Size::new(1024, 768), None, &LinearPanel::new(4.0, 3.0)).unwrap();
        assert_eq!(plan.seats.len(), 2);
        let board = plan.board().unwrap();
        assert!(!board.is_empty());
        for seat in &plan.seats {
            assert!(!seat.cell.intersects(&board));
        }
    }

    #[test]
    fn test_plan_requested_seating() {
        let plan = plan_layout(
            3,
            Size::new(1280, 800),
            Some("landscape"),
            &LinearPanel::new(5.0, 3.0),
        )
        .unwrap();
        assert_eq!(plan.seats.len(), 3);
        assert!(plan.result.cell_size.is_some());
        assert!(check(&plan.allocator).is_empty());
    }

    #[test]
    fn test_plan_then_place_extra_box() {
        let mut plan = plan_layout(2, Size::new(1200, 900), None, &LinearPanel::new(4.0, 2.0)).unwrap();
        let placed = plan.place(&PlacementRequest::new(Shape::new(20, 10, 40, 20)));
        assert!(placed.is_some());
        assert!(plan.board().is_some());
        assert!(check(&plan.allocator).is_empty());
    }

    #[test]
    fn test_plan_unknown_seating_error() {
        let result = plan_layout(2, Size::new(800, 600), Some("nowhere"), &LinearPanel::new(1.0, 1.0));
        assert!(matches!(result, Err(PlanError::UnknownTemplate { .. })));
    }

    #[test]
    fn test_plan_without_players() {
        let result = plan_layout(0, Size::new(800, 600), None, &LinearPanel::new(1.0, 1.0));
        assert!(matches!(result, Err(PlanError::NoPlayers)));
    }

    #[test]
    fn test_plan_with_active_template() {
        let config = PlanConfig::new()
            .with_selector(SelectorConfig::new().with_hysteresis(100.0))
            .with_active("portrait");
        let plan = plan_layout_with_config(
            2,
            Size::new(1000, 700),
            None,
            &LinearPanel::new(4.0, 3.0),
            &config,
        )
        .unwrap();
        assert_eq!(plan.result.template, "portrait");
    }
}

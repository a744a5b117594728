//! Template selection
//!
//! Sizes every candidate template for the window and player count, scores
//! each by board share times cell size and picks the best. The template that
//! is already active gets a hysteresis bonus so that a marginally better
//! alternative does not make the layout flip back and forth while a window
//! is being resized.
//!
//! ```rust
//! use seat_layout::geometry::Size;
//! use seat_layout::selector::{LayoutSelector, SelectorConfig};
//! use seat_layout::template::{LinearPanel, TemplateRegistry};
//!
//! let registry = TemplateRegistry::builtin();
//! let mut selector = LayoutSelector::new(&registry, SelectorConfig::default());
//! let panel = LinearPanel::new(5.0, 3.0);
//! let result = selector.select(4, Size::new(1280, 800), Some("portrait"), &panel).unwrap();
//! assert!(result.cell_size.is_some());
//! assert_eq!(selector.active(), Some(result.template.as_str()));
//! ```

mod config;
mod error;
mod sizing;

pub use config::SelectorConfig;
pub use error::PlanError;
pub use sizing::{board_share, size_spec, SizingParams, TemplateSizing};

use serde::Serialize;
use tracing::{debug, warn};

use crate::allocator::{Allocator, AllocatorConfig, Placement, PlacementRequest};
use crate::error::CatalogError;
use crate::geometry::{Rect, Size};
use crate::template::{
    PanelSizer, PanelUnits, Seat, TemplateDefinition, TemplateRegistry, TemplateSpec,
};

/// Cell sizes at or below this never win a selection
pub const MIN_USABLE_CELL: i32 = 1;

/// A sized candidate template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'t> {
    pub name: &'t str,
    pub sizing: TemplateSizing,
}

/// Index of the best scored template, or `None` if none has a usable cell
/// size. The score of `active` is multiplied by `hysteresis`; ties keep the
/// earlier entry.
pub fn choose(scored: &[Scored<'_>], active: Option<&str>, hysteresis: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, entry) in scored.iter().enumerate() {
        if !entry.sizing.cell_size.is_some_and(|cell| cell > MIN_USABLE_CELL) {
            continue;
        }
        let mut score = entry.sizing.score();
        if active == Some(entry.name) {
            score *= hysteresis;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// The chosen template and its size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub template: String,
    pub cell_size: Option<i32>,
    pub board_share: f64,
    pub score: f64,
    /// The cell size comes from the relaxed emergency retry
    pub emergency: bool,
}

/// A chosen template with its seats carved out of a fresh allocator.
///
/// The allocator still owns the main rectangle, so extra boxes can be
/// placed around the seats before the board is taken.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub result: LayoutResult,
    pub seats: Vec<Seat>,
    pub allocator: Allocator,
    /// Rendered panel size at the chosen cell size
    pub panel: Size,
}

impl LayoutPlan {
    pub fn place(&mut self, request: &PlacementRequest) -> Option<Placement> {
        self.allocator.place(request)
    }

    /// Hand the remaining main rectangle over as the board
    pub fn board(&mut self) -> Option<Rect> {
        self.allocator.take_main()
    }
}

/// Chooses seating templates from a registry
#[derive(Debug, Clone)]
pub struct LayoutSelector<'a> {
    registry: &'a TemplateRegistry,
    config: SelectorConfig,
    active: Option<String>,
}

impl<'a> LayoutSelector<'a> {
    pub fn new(registry: &'a TemplateRegistry, config: SelectorConfig) -> Self {
        Self {
            registry,
            config,
            active: None,
        }
    }

    /// Start with `name` as the active template
    pub fn with_active(mut self, name: impl Into<String>) -> Self {
        self.active = Some(name.into());
        self
    }

    /// The template chosen by the last selection
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Size one template for `players` panels in `window`
    pub fn size_template(
        &self,
        def: &TemplateDefinition,
        players: usize,
        panel: &dyn PanelSizer,
        window: Size,
    ) -> TemplateSizing {
        self.size_with(def, players, panel, window, &SizingParams::from(&self.config))
    }

    /// Size a formula with this selector's parameters
    pub fn size_spec(
        &self,
        spec: &TemplateSpec,
        units: PanelUnits,
        panel: &dyn PanelSizer,
        window: Size,
    ) -> TemplateSizing {
        size_spec(spec, units, panel, window, &SizingParams::from(&self.config))
    }

    fn size_with(
        &self,
        def: &TemplateDefinition,
        players: usize,
        panel: &dyn PanelSizer,
        window: Size,
        params: &SizingParams,
    ) -> TemplateSizing {
        let units = PanelUnits::measure(panel, self.config.max_cell);
        let spec = def.arrangement.spec(players, units, self.config.margin);
        let sizing = size_spec(&spec, units, panel, window, params);
        debug!(
            template = %def.name,
            cell = ?sizing.cell_size,
            share = sizing.board_share,
            "sized template"
        );
        sizing
    }

    /// Templates to try: the requested one and its alternates, then the
    /// fallback list, without repeats. Fallbacks missing from the registry
    /// are skipped.
    fn candidates(&self, seating: Option<&str>) -> Result<Vec<&'a TemplateDefinition>, PlanError> {
        let mut list: Vec<&'a TemplateDefinition> = Vec::new();
        if let Some(name) = seating {
            list = self.registry.alternates(name).map_err(|err| match err {
                CatalogError::NotFound { name } => PlanError::UnknownTemplate { name },
                other => PlanError::Catalog(other),
            })?;
        }
        for name in &self.config.fallback {
            match self.registry.get(name) {
                Some(def) if !list.iter().any(|d| d.name == def.name) => list.push(def),
                Some(_) => {}
                None => debug!(template = %name, "fallback template not in catalog"),
            }
        }
        Ok(list)
    }

    /// Choose a template and cell size for `players` panels in `window`.
    ///
    /// `seating` is the template the caller asked for; its alternates and the
    /// configured fallbacks compete with it. If nothing produces a usable
    /// cell size the default template is used, retried once with relaxed
    /// limits when even that does not fit. The winner becomes the active
    /// template.
    pub fn select(
        &mut self,
        players: usize,
        window: Size,
        seating: Option<&str>,
        panel: &dyn PanelSizer,
    ) -> Result<LayoutResult, PlanError> {
        self.config.validate()?;
        if players == 0 {
            return Err(PlanError::NoPlayers);
        }

        let candidates = self.candidates(seating)?;
        let scored: Vec<Scored<'a>> = candidates
            .into_iter()
            .map(|def| Scored {
                name: def.name.as_str(),
                sizing: self.size_template(def, players, panel, window),
            })
            .collect();

        let result = match choose(&scored, self.active.as_deref(), self.config.hysteresis) {
            Some(index) => {
                let winner = scored[index];
                LayoutResult {
                    template: winner.name.to_string(),
                    cell_size: winner.sizing.cell_size,
                    board_share: winner.sizing.board_share,
                    score: winner.sizing.score(),
                    emergency: false,
                }
            }
            None => self.size_default(players, window, panel)?,
        };

        debug!(
            template = %result.template,
            cell = ?result.cell_size,
            share = result.board_share,
            "selected template"
        );
        self.active = Some(result.template.clone());
        Ok(result)
    }

    fn size_default(
        &self,
        players: usize,
        window: Size,
        panel: &dyn PanelSizer,
    ) -> Result<LayoutResult, PlanError> {
        let name = &self.config.default_template;
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| PlanError::unknown_template(name.as_str()))?;

        let mut emergency = false;
        let mut sizing = self.size_template(def, players, panel, window);
        if sizing.cell_size.is_none() {
            warn!(template = %name, %window, "no cell size fits, retrying with relaxed limits");
            let params = SizingParams {
                min_cell: 1.0,
                min_board_share: self.config.emergency_board_share,
                ..SizingParams::from(&self.config)
            };
            sizing = self.size_with(def, players, panel, window, &params);
            emergency = true;
        }
        Ok(LayoutResult {
            template: def.name.clone(),
            cell_size: sizing.cell_size,
            board_share: sizing.board_share,
            score: sizing.score(),
            emergency,
        })
    }

    /// Select a template and seat every player in a new allocator covering
    /// `window`
    pub fn plan(
        &mut self,
        players: usize,
        window: Size,
        seating: Option<&str>,
        panel: &dyn PanelSizer,
    ) -> Result<LayoutPlan, PlanError> {
        let result = self.select(players, window, seating, panel)?;
        let Some(cell) = result.cell_size else {
            return Err(PlanError::Unsized {
                template: result.template,
                width: window.width,
                height: window.height,
            });
        };
        let def = self
            .registry
            .get(&result.template)
            .ok_or_else(|| PlanError::unknown_template(result.template.as_str()))?;

        let mut allocator = Allocator::new(
            Rect::new(0, 0, window.width, window.height),
            AllocatorConfig::new()
                .with_margin(self.config.margin)
                .with_preferred_aspect(self.config.preferred_aspect),
        );
        let panel_size = panel.panel_size(cell);
        let seats = def
            .arrangement
            .seat(&mut allocator, players, panel_size)
            .ok_or_else(|| PlanError::SeatingFailed {
                template: result.template.clone(),
                cell,
            })?;

        Ok(LayoutPlan {
            result,
            seats,
            allocator,
            panel: panel_size,
        })
    }
}

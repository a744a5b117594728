//! Cell size search for one template

use serde::Serialize;
use tracing::trace;

use crate::geometry::{aspect_efficiency, Size};
use crate::template::{PanelSizer, PanelUnits, TemplateSpec};

use super::config::SelectorConfig;

/// Parameters of one size search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingParams {
    pub min_board_share: f64,
    pub preferred_aspect: f64,
    pub min_cell: f64,
    pub max_cell: f64,
    pub strict: bool,
}

impl From<&SelectorConfig> for SizingParams {
    fn from(config: &SelectorConfig) -> Self {
        Self {
            min_board_share: config.min_board_share,
            preferred_aspect: config.preferred_aspect,
            min_cell: config.min_cell,
            max_cell: config.max_cell,
            strict: config.strict_board_size,
        }
    }
}

/// Outcome of sizing one template
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplateSizing {
    /// Chosen cell size, or `None` if no size fits
    pub cell_size: Option<i32>,
    /// Fraction of the window left for the board at that cell size
    pub board_share: f64,
}

impl TemplateSizing {
    /// Board share times cell size; 0 without a cell size
    pub fn score(&self) -> f64 {
        match self.cell_size {
            Some(cell) => self.board_share * cell as f64,
            None => 0.0,
        }
    }
}

/// Board share at cell size `cell`, or `None` if the panels do not fit.
///
/// In strict mode the board counts only the largest rectangle of the
/// preferred aspect that fits in it; otherwise its whole area counts,
/// weighted by how close its shape is to the preferred aspect.
pub fn board_share(spec: &TemplateSpec, cell: f64, window: Size, params: &SizingParams) -> Option<f64> {
    let width = window.width as f64;
    let height = window.height as f64;
    let board_w = width - spec.edge_units_x * cell;
    let board_h = height - spec.edge_units_y * cell;
    let used_w = spec.units_x * cell + spec.fixed_margin_w;
    let used_h = spec.units_y * cell + spec.fixed_margin_h;
    if !(board_w >= 0.0 && board_h >= 0.0 && used_w < width && used_h < height) {
        return None;
    }
    let aspect = params.preferred_aspect;
    let share = if params.strict {
        let fit_w = board_w * (board_w / aspect).min(board_h);
        let fit_h = board_h * (board_h * aspect).min(board_w);
        fit_w.min(fit_h) / (width * height)
    } else {
        aspect_efficiency(board_w / board_h, aspect) * board_w * board_h / (width * height)
    };
    Some(if share.is_finite() { share } else { 0.0 })
}

/// Find the cell size for `spec` in `window`.
///
/// Walks down from just above the maximum cell size, keeping each size that
/// improves the board share, and stops at the first size that does not
/// improve it, or once the cell is below the minimum and the board share
/// goal is met. The result is then shrunk until the panel, as actually
/// rendered by `panel`, fits the space the formula reserved for it.
pub fn size_spec(
    spec: &TemplateSpec,
    units: PanelUnits,
    panel: &dyn PanelSizer,
    window: Size,
    params: &SizingParams,
) -> TemplateSizing {
    let mut cell = params.max_cell.floor() + 2.0;
    if spec.edge_units_y > 0.0 {
        cell = cell.min((1.0 + window.height as f64 / spec.edge_units_y).floor());
    }
    if spec.edge_units_x > 0.0 {
        cell = cell.min((1.0 + window.width as f64 / spec.edge_units_x).floor());
    }

    let mut share = 0.0;
    let mut accepted: Option<f64> = None;
    let (mut reserved_w, mut reserved_h) = (0.0, 0.0);
    loop {
        cell -= 1.0;
        let fits = match board_share(spec, cell, window, params) {
            Some(next) if next <= share => break,
            Some(next) => {
                share = next;
                accepted = Some(cell);
                reserved_w = (units.width * cell).ceil();
                reserved_h = (units.height * cell).ceil();
                true
            }
            None => false,
        };
        trace!(cell, share, fits, "size step");
        let keep_going = (!fits && cell > params.min_cell / 2.0)
            || (cell > params.min_cell && share < params.min_board_share);
        if !keep_going {
            break;
        }
    }

    let mut cell_size = accepted.map(|c| c as i32).filter(|c| *c > 0);
    while let Some(cell) = cell_size {
        let rendered = panel.panel_size(cell);
        if rendered.width as f64 <= reserved_w && rendered.height as f64 <= reserved_h {
            break;
        }
        trace!(cell, %rendered, "panel too large, shrinking cell");
        cell_size = Some(cell - 1).filter(|c| *c > 0);
    }

    TemplateSizing {
        cell_size,
        board_share: share,
    }
}

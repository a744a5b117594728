//! Sizing formulas and panel measurement

use serde::Serialize;

use crate::geometry::Size;

/// Sizing formula of a seating template for one player count.
///
/// At cell size `c` the player panels use `units_x * c + fixed_margin_w`
/// by `units_y * c + fixed_margin_h` pixels, and take `edge_units_x * c` by
/// `edge_units_y * c` pixels away from the board.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TemplateSpec {
    pub units_x: f64,
    pub units_y: f64,
    pub edge_units_x: f64,
    pub edge_units_y: f64,
    pub fixed_margin_w: f64,
    pub fixed_margin_h: f64,
}

/// Reports the pixel size a player panel actually renders at for a cell size
pub trait PanelSizer {
    fn panel_size(&self, cell: i32) -> Size;
}

impl<F> PanelSizer for F
where
    F: Fn(i32) -> Size,
{
    fn panel_size(&self, cell: i32) -> Size {
        self(cell)
    }
}

/// A panel that scales linearly with the cell size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPanel {
    pub width_units: f64,
    pub height_units: f64,
}

impl LinearPanel {
    pub fn new(width_units: f64, height_units: f64) -> Self {
        Self {
            width_units,
            height_units,
        }
    }
}

impl PanelSizer for LinearPanel {
    fn panel_size(&self, cell: i32) -> Size {
        let cell = cell as f64;
        Size::new(
            (self.width_units * cell).round() as i32,
            (self.height_units * cell).round() as i32,
        )
    }
}

/// Panel size in whole cell units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelUnits {
    pub width: f64,
    pub height: f64,
}

impl PanelUnits {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Render the panel at `unit` pixels per cell and round each side up to
    /// whole cells
    pub fn measure(panel: &dyn PanelSizer, unit: f64) -> Self {
        if !(unit >= 1.0) {
            return Self::new(0.0, 0.0);
        }
        let size = panel.panel_size(unit as i32);
        Self::new(
            (size.width as f64 / unit).ceil(),
            (size.height as f64 / unit).ceil(),
        )
    }
}

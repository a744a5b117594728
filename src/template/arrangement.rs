//! Where player panels sit around the board

use std::ops::Range;

use serde::Serialize;

use crate::allocator::{Allocator, StripLayout};
use crate::geometry::{Axis, Edge, Rect, Size};

use super::spec::{PanelUnits, TemplateSpec};

/// Geometric family of a seating template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Panels in a grid along one window edge, `columns` wide.
    /// `None` puts every player in a single row.
    Strip { edge: Edge, columns: Option<usize> },
    /// Players split between the two edges that face each other across
    /// `axis`: bottom and top for [`Axis::Vertical`], left and right for
    /// [`Axis::Horizontal`]. The first half (rounded up) takes the bottom or
    /// left edge. Side panels are turned a quarter so they face the board.
    Opposed { axis: Axis },
}

/// A player's panel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub player: usize,
    /// Panel rectangle
    pub rect: Rect,
    /// Cell reserved for the panel, margin included
    pub cell: Rect,
    /// Clockwise quarter turns to draw the panel with
    pub quarter_turns: u8,
}

/// Columns and rows of a grid holding `players` cells
fn grid(players: usize, columns: Option<usize>) -> (usize, usize) {
    let players = players.max(1);
    let columns = columns.unwrap_or(players).clamp(1, players);
    (columns, players.div_ceil(columns))
}

impl Arrangement {
    /// Sizing formula for `players` panels measuring `units` cells each,
    /// with `margin` pixels between panels and around the group
    pub fn spec(&self, players: usize, units: PanelUnits, margin: i32) -> TemplateSpec {
        let m = margin as f64;
        let (pw, ph) = (units.width, units.height);
        match *self {
            Arrangement::Strip { edge, columns } => {
                let (columns, rows) = grid(players, columns);
                let (c, r) = (columns as f64, rows as f64);
                let units_x = pw * c;
                let units_y = ph * r;
                let (edge_units_x, edge_units_y) = match edge.axis() {
                    Axis::Vertical => (0.0, units_y),
                    Axis::Horizontal => (units_x, 0.0),
                };
                TemplateSpec {
                    units_x,
                    units_y,
                    edge_units_x,
                    edge_units_y,
                    fixed_margin_w: c * m + m,
                    fixed_margin_h: r * m + m,
                }
            }
            Arrangement::Opposed { axis: Axis::Vertical } => {
                let k = players.max(1).div_ceil(2) as f64;
                TemplateSpec {
                    units_x: pw * k,
                    units_y: ph * 2.0,
                    edge_units_x: 0.0,
                    edge_units_y: ph * 2.0,
                    fixed_margin_w: k * m + m,
                    fixed_margin_h: 2.0 * m,
                }
            }
            Arrangement::Opposed {
                axis: Axis::Horizontal,
            } => {
                let k = players.max(1).div_ceil(2) as f64;
                TemplateSpec {
                    units_x: ph * 2.0,
                    units_y: pw * k,
                    edge_units_x: ph * 2.0,
                    edge_units_y: 0.0,
                    fixed_margin_w: 2.0 * m,
                    fixed_margin_h: k * m + m,
                }
            }
        }
    }

    /// Carve the seats for `players` panels of size `panel` out of the
    /// allocator's main rectangle. Cells are logged as allocated and the
    /// unused parts of each strip go back to the free list. Returns `None`
    /// if the main rectangle cannot hold them.
    pub fn seat(&self, alloc: &mut Allocator, players: usize, panel: Size) -> Option<Vec<Seat>> {
        match *self {
            Arrangement::Strip { edge, columns } => {
                let (columns, _) = grid(players, columns);
                seat_edge(alloc, edge, 0..players, columns, panel, 0)
            }
            Arrangement::Opposed { axis } => {
                let half = players.div_ceil(2);
                let (near, far, near_turns, far_turns, along) = match axis {
                    Axis::Vertical => (Edge::Bottom, Edge::Top, 0, 2, panel),
                    Axis::Horizontal => (Edge::Left, Edge::Right, 1, 3, panel.transposed()),
                };
                let columns = match axis {
                    Axis::Vertical => half,
                    Axis::Horizontal => 1,
                };
                let mut seats = seat_edge(alloc, near, 0..half, columns, along, near_turns)?;
                seats.extend(seat_edge(alloc, far, half..players, columns, along, far_turns)?);
                Some(seats)
            }
        }
    }
}

/// Seat `players` in a grid packed into the low corner of a strip cut
/// from `edge` of the main rectangle
fn seat_edge(
    alloc: &mut Allocator,
    edge: Edge,
    players: Range<usize>,
    columns: usize,
    panel: Size,
    quarter_turns: u8,
) -> Option<Vec<Seat>> {
    let count = players.len();
    if count == 0 {
        return Some(Vec::new());
    }
    let margin = alloc.margin();
    let columns = columns.clamp(1, count);
    let rows = count.div_ceil(columns);
    let cell = panel.grown(margin);
    let block = Size::new(cell.width * columns as i32, cell.height * rows as i32);
    let main = alloc.main();
    if block.width > main.width || block.height > main.height {
        return None;
    }

    // the margin goes on the sides away from the board
    let (dx, dy) = match edge {
        Edge::Bottom => (margin, 0),
        Edge::Right => (0, margin),
        Edge::Top | Edge::Left => (margin, margin),
    };
    let mut seats = Vec::with_capacity(count);
    alloc.carve_main(edge, block.extent(edge.axis()), |strip| {
        let mut layout = StripLayout::default();
        for (i, player) in players.enumerate() {
            let column = (i % columns) as i32;
            let row = (i / columns) as i32;
            let cell_rect = Rect::at(
                strip.left + column * cell.width,
                strip.top + row * cell.height,
                cell,
            );
            layout.claimed.push(cell_rect);
            seats.push(Seat {
                player,
                rect: Rect::at(cell_rect.left + dx, cell_rect.top + dy, panel),
                cell: cell_rect,
                quarter_turns,
            });
        }

        let missing = (rows * columns - count) as i32;
        if missing > 0 {
            layout.spare.push(Rect::new(
                strip.left + (columns as i32 - missing) * cell.width,
                strip.top + (rows as i32 - 1) * cell.height,
                missing * cell.width,
                cell.height,
            ));
        }
        layout.spare.push(match edge.axis() {
            Axis::Vertical => Rect::new(
                strip.left + block.width,
                strip.top,
                strip.width - block.width,
                strip.height,
            ),
            Axis::Horizontal => Rect::new(
                strip.left,
                strip.top + block.height,
                strip.width,
                strip.height - block.height,
            ),
        });
        layout
    })?;
    Some(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{check, AllocatorConfig};
    use pretty_assertions::assert_eq;

    fn allocator(width: i32, height: i32) -> Allocator {
        Allocator::new(
            Rect::new(0, 0, width, height),
            AllocatorConfig::new().with_margin(4),
        )
    }

    #[test]
    fn test_bottom_strip_spec() {
        let spec = Arrangement::Strip {
            edge: Edge::Bottom,
            columns: Some(2),
        }
        .spec(3, PanelUnits::new(5.0, 2.0), 4);
        assert_eq!(
            spec,
            TemplateSpec {
                units_x: 10.0,
                units_y: 4.0,
                edge_units_x: 0.0,
                edge_units_y: 4.0,
                fixed_margin_w: 12.0,
                fixed_margin_h: 12.0,
            }
        );
    }

    #[test]
    fn test_right_strip_spec() {
        let spec = Arrangement::Strip {
            edge: Edge::Right,
            columns: Some(1),
        }
        .spec(4, PanelUnits::new(5.0, 2.0), 4);
        assert_eq!(spec.units_x, 5.0);
        assert_eq!(spec.units_y, 8.0);
        assert_eq!(spec.edge_units_x, 5.0);
        assert_eq!(spec.edge_units_y, 0.0);
        assert_eq!(spec.fixed_margin_h, 20.0);
    }

    #[test]
    fn test_opposed_sides_spec_is_rotated() {
        let spec = Arrangement::Opposed {
            axis: Axis::Horizontal,
        }
        .spec(4, PanelUnits::new(5.0, 2.0), 4);
        assert_eq!(spec.units_x, 4.0);
        assert_eq!(spec.units_y, 10.0);
        assert_eq!(spec.edge_units_x, 4.0);
    }

    #[test]
    fn test_across_puts_everyone_in_one_row() {
        let spec = Arrangement::Strip {
            edge: Edge::Bottom,
            columns: None,
        }
        .spec(4, PanelUnits::new(3.0, 2.0), 0);
        assert_eq!(spec.units_x, 12.0);
        assert_eq!(spec.units_y, 2.0);
    }

    #[test]
    fn test_seat_bottom_grid() {
        let mut alloc = allocator(1000, 800);
        let seats = Arrangement::Strip {
            edge: Edge::Bottom,
            columns: Some(2),
        }
        .seat(&mut alloc, 3, Size::new(100, 50))
        .unwrap();

        assert_eq!(seats.len(), 3);
        assert_eq!(seats[0].cell, Rect::new(0, 692, 104, 54));
        assert_eq!(seats[0].rect, Rect::new(4, 692, 100, 50));
        assert_eq!(seats[1].cell, Rect::new(104, 692, 104, 54));
        assert_eq!(seats[2].cell, Rect::new(0, 746, 104, 54));
        assert_eq!(alloc.main(), Rect::new(0, 0, 1000, 692));
        assert!(alloc.spares().contains(&Rect::new(208, 692, 792, 108)));
        assert!(alloc.spares().contains(&Rect::new(104, 746, 104, 54)));
        assert!(check(&alloc).is_empty());
    }

    #[test]
    fn test_seat_opposed_faces() {
        let mut alloc = allocator(1000, 800);
        let seats = Arrangement::Opposed {
            axis: Axis::Vertical,
        }
        .seat(&mut alloc, 3, Size::new(100, 50))
        .unwrap();
        let turns: Vec<u8> = seats.iter().map(|s| s.quarter_turns).collect();
        assert_eq!(turns, vec![0, 0, 2]);
        assert_eq!(seats[2].cell.top, 0);
        assert_eq!(alloc.main(), Rect::new(0, 54, 1000, 692));
        assert!(check(&alloc).is_empty());
    }

    #[test]
    fn test_seat_sides_are_transposed() {
        let mut alloc = allocator(1000, 800);
        let seats = Arrangement::Opposed {
            axis: Axis::Horizontal,
        }
        .seat(&mut alloc, 2, Size::new(100, 50))
        .unwrap();
        assert_eq!(seats[0].rect.width, 50);
        assert_eq!(seats[0].rect.height, 100);
        assert_eq!(seats[0].quarter_turns, 1);
        assert_eq!(seats[1].cell.right(), 1000);
        assert!(check(&alloc).is_empty());
    }

    #[test]
    fn test_seat_too_big() {
        let mut alloc = allocator(200, 100);
        let seat = Arrangement::Strip {
            edge: Edge::Bottom,
            columns: None,
        }
        .seat(&mut alloc, 4, Size::new(100, 50));
        assert_eq!(seat, None);
        assert_eq!(alloc.main(), Rect::new(0, 0, 200, 100));
    }
}

//! Turning the winning candidate into a placed rectangle

use crate::geometry::{Axis, Edge, Rect, Size};

use super::request::{Alignment, Pin, Shape};
use super::score::{Chip, Cut};
use super::{Allocator, Slot};

/// Largest size within `avail` and the shape's maximum. With `preserve`,
/// both dimensions grow from the minimum in the minimum's proportions.
pub(crate) fn fit_size(avail: Size, shape: Shape, preserve: bool) -> Size {
    let width = shape.max.width.min(avail.width);
    let height = shape.max.height.min(avail.height);
    if !preserve || shape.min.height <= 0 {
        return Size::new(width, height);
    }
    let aspect = shape.min.width as f64 / shape.min.height as f64;
    let height = shape
        .min
        .height
        .max((height as f64).min(width as f64 / aspect) as i32);
    let width = shape
        .min
        .width
        .max((height as f64 * aspect).min(width as f64) as i32);
    Size::new(width, height)
}

/// Start coordinate along `axis` for something `extent` long inside `span`
fn pin_offset(pin: Pin, axis: Axis, span: Rect, extent: i32, focus: Rect) -> i32 {
    let lo = span.start(axis);
    let hi = (span.end(axis) - extent).max(lo);
    let at = match pin {
        Pin::Low => lo,
        Pin::High => hi,
        Pin::Middle => lo + (span.extent(axis) - extent) / 2,
        Pin::NearCenter => {
            let center = focus.mid(axis);
            if center - span.start(axis) <= span.end(axis) - center {
                lo
            } else {
                hi
            }
        }
    };
    at.clamp(lo, hi)
}

/// Side of the candidate the first strip comes off. Explicit sides are
/// taken as given; `Center` faces the focus rectangle and `Edge` faces away.
fn first_cut_edge(align: Alignment, cut: Cut, from: Rect, focus: Rect) -> Edge {
    match align {
        Alignment::Left => Edge::Left,
        Alignment::Right => Edge::Right,
        Alignment::Top => Edge::Top,
        Alignment::Bottom => Edge::Bottom,
        Alignment::Center | Alignment::Edge => {
            let axis = match cut {
                Cut::LeftOrRight => Axis::Horizontal,
                Cut::TopOrBottom => Axis::Vertical,
            };
            let facing = if from.mid(axis) < focus.mid(axis) {
                axis.high_edge()
            } else {
                axis.low_edge()
            };
            if align == Alignment::Center {
                facing
            } else {
                facing.opposite()
            }
        }
    }
}

/// Result of carving one box straight out of a free rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DirectCut {
    pub placed: Rect,
    /// What stays in the candidate's slot
    pub rest: Rect,
    /// Trimmed off the strip, to be released
    pub leftovers: [Rect; 2],
}

pub(crate) fn cut_direct(from: Rect, size: Size, cut: Cut, align: Alignment, focus: Rect) -> DirectCut {
    let edge = first_cut_edge(align, cut, from, focus);
    let (strip, rest) = from.take_edge(edge, size.extent(edge.axis()));
    let trim = edge.axis().cross();
    let at = pin_offset(align.pin(), trim, strip, size.extent(trim), focus);
    let (before, placed, after) = strip.cut3(trim, at, size.extent(trim));
    DirectCut {
        placed,
        rest,
        leftovers: [before, after],
    }
}

impl Allocator {
    pub(crate) fn place_direct(
        &mut self,
        slot: Slot,
        cut: Cut,
        shape: Shape,
        align: Alignment,
        preserve: bool,
    ) -> Rect {
        let from = self.rect_at(slot);
        let size = fit_size(from.size(), shape, preserve);
        let DirectCut {
            placed,
            rest,
            leftovers,
        } = cut_direct(from, size, cut, align, self.focus());
        self.replace_slot(slot, rest);
        self.prune();
        for piece in leftovers {
            self.release(piece);
        }
        placed
    }

    /// Place a box that spans the candidate and a chip. The candidate gives
    /// up a strip on the side facing the chip, the chip gives up its whole
    /// extent along the chip axis, and the two pieces are joined.
    pub(crate) fn place_with_chip(
        &mut self,
        slot: Slot,
        chip: Chip,
        shape: Shape,
        align: Alignment,
        preserve: bool,
    ) -> Rect {
        let from = self.rect_at(slot);
        let lender = self.rect_at(chip.slot);
        let axis = chip.axis;
        let cross = axis.cross();

        let overlap_lo = from.start(cross).max(lender.start(cross));
        let overlap_hi = from.end(cross).min(lender.end(cross));
        let min_across = shape.min.extent(cross);
        let across = if preserve {
            min_across
        } else {
            (overlap_hi - overlap_lo)
                .min(shape.max.extent(cross))
                .max(min_across)
        };

        let edge = if lender.end(axis) == from.start(axis) {
            axis.low_edge()
        } else {
            axis.high_edge()
        };
        let (strip, rest) = from.take_edge(edge, shape.min.extent(axis) - lender.extent(axis));

        let span = strip.with_span(cross, overlap_lo, overlap_hi - overlap_lo);
        let at = pin_offset(align.pin(), cross, span, across, self.focus());
        let (lender_before, lender_taken, lender_rest) = lender.cut3(cross, at, across);
        let (strip_before, strip_taken, strip_after) = strip.cut3(cross, at, across);

        self.replace_slot(slot, rest);
        self.replace_slot(chip.slot, lender_rest);
        self.prune();
        for piece in [lender_before, strip_before, strip_after] {
            self.release(piece);
        }
        strip_taken.union(&lender_taken)
    }
}

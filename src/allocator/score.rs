//! Candidate scoring and chip search

use tracing::trace;

use crate::geometry::{aspect_efficiency, Axis, Rect, Size};

use super::{Allocator, Slot};

/// Which way a direct split takes its strip off the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cut {
    /// A full-height column from the left or right side
    LeftOrRight,
    /// A full-width band from the top or bottom
    TopOrBottom,
}

/// An adjacent free rectangle lending its extent along `axis`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chip {
    pub slot: Slot,
    pub axis: Axis,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub slot: Slot,
    pub chip: Option<Chip>,
    pub cut: Cut,
    pub alternate: bool,
    pub score: f64,
}

/// Which free rectangles may lend a chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lenders {
    Spares,
    SparesAndMain,
}

/// Running best candidate of one placement search. The first offer always
/// wins; later offers must score strictly higher.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    best: Option<Candidate>,
}

impl Scan {
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        match self.best {
            Some(best) if candidate.score <= best.score => false,
            _ => {
                self.best = Some(candidate);
                true
            }
        }
    }

    pub fn best(&self) -> Option<Candidate> {
        self.best
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }
}

/// Value of leaving `size` as the main rectangle: its area, discounted by
/// how far its aspect ratio strays from `preferred`
fn residual_score(size: Size, preferred: f64) -> f64 {
    let aspect = size.width as f64 / size.height as f64;
    size.area() as f64 * aspect_efficiency(aspect, preferred)
}

impl Allocator {
    /// Look for a free rectangle that supplies the extent along `axis` that
    /// `from` lacks for a box of size `need`. Nothing is lent to a `from`
    /// that is already long enough along `axis`.
    ///
    /// A chip must be shorter than `need` along `axis`, at least as long as
    /// `need` across it, start no earlier than `from` across the axis with
    /// room for `need` before `from` ends, and touch `from` on one side.
    /// Among qualifying chips the widest wins, later ones on ties.
    pub fn find_chip(&self, axis: Axis, from: Rect, need: Size) -> Option<Rect> {
        self.find_chip_slot(axis, from, need, Lenders::SparesAndMain)
            .map(|slot| self.rect_at(slot))
    }

    pub(crate) fn find_chip_slot(
        &self,
        axis: Axis,
        from: Rect,
        need: Size,
        lenders: Lenders,
    ) -> Option<Slot> {
        let need_along = need.extent(axis);
        if !self.config.allow_chips || from.extent(axis) >= need_along {
            return None;
        }
        let cross = axis.cross();
        let need_across = need.extent(cross);
        let mut widest = need_along - from.extent(axis);
        let mut found = None;
        for (slot, chip) in self.slots() {
            let extent = chip.extent(axis);
            if chip.is_empty() || (slot == Slot::Main && lenders == Lenders::Spares) {
                continue;
            }
            let fits = chip.extent(cross) >= need_across
                && extent < need_along
                && chip.start(cross) >= from.start(cross)
                && chip.start(cross) + need_across <= from.end(cross);
            let touches = chip.end(axis) == from.start(axis) || chip.start(axis) == from.end(axis);
            if fits && touches && extent >= widest {
                widest = extent;
                found = Some(slot);
            }
        }
        found
    }

    /// Offer every way `slot` could hold a box of footprint `need` to `scan`:
    /// a horizontal chip, a vertical chip, then a direct split. Chips only
    /// come from `lenders`. Returns true if any of them became the new best.
    ///
    /// The main rectangle scores by what it keeps: residual area weighted by
    /// aspect efficiency. A spare scores by the negated area it wastes.
    pub(crate) fn score(
        &self,
        slot: Slot,
        need: Size,
        preferred: f64,
        alternate: bool,
        lenders: Lenders,
        scan: &mut Scan,
    ) -> bool {
        let from = self.rect_at(slot);
        let is_main = slot == Slot::Main;
        let mut improved = false;

        for axis in [Axis::Horizontal, Axis::Vertical] {
            let cross = axis.cross();
            if from.extent(cross) < need.extent(cross) || from.extent(axis) >= need.extent(axis) {
                continue;
            }
            let Some(chip_slot) = self.find_chip_slot(axis, from, need, lenders) else {
                continue;
            };
            let chip = self.rect_at(chip_slot);
            let score = if is_main {
                let residual = from.extent(axis) - need.extent(axis) + chip.extent(axis);
                residual_score(Size::along(axis, residual, from.extent(cross)), preferred)
            } else {
                let missing = (need.extent(axis) - chip.extent(axis)) as f64;
                -(missing * (from.extent(cross) - need.extent(cross)) as f64)
            };
            let cut = match axis {
                Axis::Horizontal => Cut::LeftOrRight,
                Axis::Vertical => Cut::TopOrBottom,
            };
            improved |= scan.offer(Candidate {
                slot,
                chip: Some(Chip {
                    slot: chip_slot,
                    axis,
                }),
                cut,
                alternate,
                score,
            });
        }

        if from.width >= need.width && from.height >= need.height {
            let (score, cut) = if is_main {
                let keep_columns = residual_score(
                    Size::new(from.width - need.width, from.height),
                    preferred,
                );
                let keep_rows = residual_score(
                    Size::new(from.width, from.height - need.height),
                    preferred,
                );
                let cut = if keep_columns < keep_rows {
                    Cut::TopOrBottom
                } else {
                    Cut::LeftOrRight
                };
                (keep_columns.max(keep_rows), cut)
            } else {
                let waste_rows = need.height as i64 * (from.width - need.width) as i64;
                let waste_columns = need.width as i64 * (from.height - need.height) as i64;
                let cut = if waste_rows < waste_columns {
                    Cut::TopOrBottom
                } else {
                    Cut::LeftOrRight
                };
                (-(waste_rows.min(waste_columns) as f64), cut)
            };
            improved |= scan.offer(Candidate {
                slot,
                chip: None,
                cut,
                alternate,
                score,
            });
        }

        if improved {
            trace!(?slot, %from, %need, "new best candidate");
        }
        improved
    }
}
